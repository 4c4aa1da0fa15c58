use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;

pub const DEFAULT_CORS_ORIGINS: &[&str] =
    &["http://localhost:57666", "http://localhost:1234", "http://movies.com", "http://midu.dev"];

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    /// Seed dataset; `None` means the bundled `data/movies.json`.
    pub movies_file: Option<PathBuf>,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").unwrap_or_else(|| "1234".to_string()).parse().context("PORT")?;

        let movies_file = var("MOVIES_FILE").filter(|s| !s.is_empty()).map(PathBuf::from);

        let cors_origins = match var("CORS_ORIGINS") {
            Some(raw) => parse_origins(&raw),
            None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            movies_file,
            cors_origins,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}
