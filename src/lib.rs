pub mod config;
pub mod cors;
pub mod error;
pub mod models;
pub mod router;
pub mod routes;
pub mod store;
pub mod validation;

use anyhow::Context;

use crate::{config::Config, cors::OriginAllowList, store::MovieStore};

pub use router::build_router;

/// Dataset used when `MOVIES_FILE` is not set.
pub const BUNDLED_MOVIES: &str = include_str!("../data/movies.json");

pub struct AppState {
    pub store: MovieStore,
    pub origins: OriginAllowList,
}

impl AppState {
    pub fn new(store: MovieStore, origins: OriginAllowList) -> Self {
        Self { store, origins }
    }

    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = match &config.movies_file {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("reading {}", path.display()))?;
                MovieStore::from_json(&raw)?
            }
            None => MovieStore::from_json(BUNDLED_MOVIES)?,
        };

        Ok(Self::new(store, OriginAllowList::new(config.cors_origins.iter().cloned())))
    }
}
