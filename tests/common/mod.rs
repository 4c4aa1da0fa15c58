#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, header},
};
use http_body_util::BodyExt;
use moviedb::{
    AppState, BUNDLED_MOVIES, build_router, config::DEFAULT_CORS_ORIGINS, cors::OriginAllowList,
    store::MovieStore,
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Router over a fresh copy of the bundled dataset and the default allow-list.
pub fn build_test_app() -> Router {
    let store = MovieStore::from_json(BUNDLED_MOVIES).unwrap();
    let origins = OriginAllowList::new(DEFAULT_CORS_ORIGINS.iter().copied());
    build_router(Arc::new(AppState::new(store, origins)))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Request::builder().method(Method::DELETE).uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PATCH, uri, body).await
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn valid_movie() -> Value {
    json!({
        "title": "Dune: Part Two",
        "year": 2024,
        "director": "Denis Villeneuve",
        "duration": 166,
        "rate": 8.6,
        "poster": "https://example.com/dune-part-two.jpg",
        "genre": ["Sci-Fi", "Adventure"]
    })
}

/// Field names referenced by a 400 response body.
pub fn error_fields(body: &Value) -> Vec<String> {
    body["error"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect()
}
