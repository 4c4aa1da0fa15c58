//! Origin allow-list enforcement and CORS response headers.

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use common::*;
use serde_json::json;

fn with_origin(method: Method, uri: &str, origin: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ORIGIN, origin)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn disallowed_origin_is_rejected() {
    let app = build_test_app();
    let response = send(&app, with_origin(Method::GET, "/movies", "http://evil.com")).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    // no movie data leaks to the blocked origin
    assert_eq!(body_json(response).await, json!({ "message": "Not allowed by CORS" }));
}

#[tokio::test]
async fn disallowed_origin_cannot_mutate() {
    let app = build_test_app();
    let uri = "/movies/dcdd0fad-a94c-4810-8acc-5f108d3b18c3";

    let response = send(&app, with_origin(Method::DELETE, uri, "http://evil.com")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(get(&app, uri).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_origin_is_permitted() {
    let app = build_test_app();
    let response = get(&app, "/movies").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn allowed_origin_gets_cors_headers() {
    let app = build_test_app();
    let response = send(&app, with_origin(Method::GET, "/movies", "http://localhost:1234")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:1234"
    );
}

#[tokio::test]
async fn preflight_from_allowed_origin_lists_methods() {
    let app = build_test_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/movies/dcdd0fad-a94c-4810-8acc-5f108d3b18c3")
        .header(header::ORIGIN, "http://movies.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://movies.com"
    );

    let methods = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    for method in ["GET", "POST", "PATCH", "DELETE"] {
        assert!(methods.contains(method), "{method} missing from {methods}");
    }
}

#[tokio::test]
async fn preflight_from_disallowed_origin_is_rejected() {
    let app = build_test_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/movies/dcdd0fad-a94c-4810-8acc-5f108d3b18c3")
        .header(header::ORIGIN, "http://evil.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_METHODS).is_none());
}

#[tokio::test]
async fn allowed_origin_can_create() {
    let app = build_test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/movies")
        .header(header::ORIGIN, "http://midu.dev")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(valid_movie().to_string()))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://midu.dev"
    );
}
