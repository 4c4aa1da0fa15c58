use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{AppState, cors, routes};

/// The full application, shared by the binary and the integration tests.
///
/// Layers run top to bottom: tracing, the origin gate, then CORS headers.
/// The CORS layer answers every `OPTIONS` request itself, pre-flights included.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors_layer = cors::layer(&state.origins);

    Router::new()
        .route("/movies", get(routes::list_movies).post(routes::create_movie))
        .route(
            "/movies/{id}",
            get(routes::get_movie).patch(routes::update_movie).delete(routes::delete_movie),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(state.clone(), cors::gate))
                .layer(cors_layer),
        )
        .with_state(state)
}
