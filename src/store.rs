use std::collections::HashSet;

use anyhow::Context;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{Movie, MoviePatch, NewMovie};

/// In-memory movie collection. Every read and write goes through one mutex,
/// so mutations never interleave.
pub struct MovieStore {
    movies: Mutex<Vec<Movie>>,
}

impl MovieStore {
    pub fn new(movies: Vec<Movie>) -> anyhow::Result<Self> {
        {
            let mut seen = HashSet::with_capacity(movies.len());
            for movie in &movies {
                if !seen.insert(movie.id.as_str()) {
                    anyhow::bail!("duplicate movie id in dataset: {}", movie.id);
                }
            }
        }
        Ok(Self { movies: Mutex::new(movies) })
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let movies: Vec<Movie> = serde_json::from_str(raw).context("parsing movie dataset")?;
        Self::new(movies)
    }

    pub async fn len(&self) -> usize {
        self.movies.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.movies.lock().await.is_empty()
    }

    /// All movies, or only those with a genre matching `genre` case-insensitively.
    pub async fn list(&self, genre: Option<&str>) -> Vec<Movie> {
        let movies = self.movies.lock().await;
        match genre {
            Some(genre) => movies
                .iter()
                .filter(|m| m.genre.iter().any(|g| g.matches(genre)))
                .cloned()
                .collect(),
            None => movies.clone(),
        }
    }

    pub async fn get(&self, id: &str) -> Option<Movie> {
        self.movies.lock().await.iter().find(|m| m.id == id).cloned()
    }

    pub async fn insert(&self, new: NewMovie) -> Movie {
        let movie = Movie::from_new(Uuid::new_v4().to_string(), new);
        self.movies.lock().await.push(movie.clone());
        movie
    }

    pub async fn update(&self, id: &str, patch: MoviePatch) -> Option<Movie> {
        let mut movies = self.movies.lock().await;
        let movie = movies.iter_mut().find(|m| m.id == id)?;
        movie.apply(patch);
        Some(movie.clone())
    }

    pub async fn remove(&self, id: &str) -> bool {
        let mut movies = self.movies.lock().await;
        match movies.iter().position(|m| m.id == id) {
            Some(idx) => {
                movies.remove(idx);
                true
            }
            None => false,
        }
    }
}
