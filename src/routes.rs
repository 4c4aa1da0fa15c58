use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::Value;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{MessageBody, Movie},
    validation::{validate_movie, validate_partial_movie},
};

/// Never fails: a query string that cannot be decoded lists everything, and
/// repeated `genre` keys use the first non-empty value.
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Json<Vec<Movie>> {
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "ignoring undecodable query string");
            Vec::new()
        }
    };
    let genre = genre_filter(&params);
    let movies = state.store.list(genre).await;
    tracing::debug!(genre = ?genre, count = movies.len(), "listing movies");
    Json(movies)
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Movie>> {
    state.store.get(&id).await.map(Json).ok_or(AppError::NotFound)
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let Json(body) = body?;
    let new = validate_movie(&body)?;

    let movie = state.store.insert(new).await;
    tracing::info!(id = %movie.id, title = %movie.title, "movie created");

    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Movie>> {
    let Json(body) = body?;
    let patch = validate_partial_movie(&body)?;

    let movie = state.store.update(&id, patch).await.ok_or(AppError::NotFound)?;
    tracing::info!(id = %movie.id, "movie updated");

    Ok(Json(movie))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageBody>> {
    if !state.store.remove(&id).await {
        return Err(AppError::NotFound);
    }
    tracing::info!(%id, "movie deleted");
    Ok(Json(MessageBody { message: "deleted" }))
}

fn genre_filter(params: &[(String, String)]) -> Option<&str> {
    params.iter().find(|(k, v)| k == "genre" && !v.is_empty()).map(|(_, v)| v.as_str())
}
