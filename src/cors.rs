use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{AppState, error::AppError};

/// Exact-match list of browser origins allowed to call the API.
#[derive(Clone, Debug)]
pub struct OriginAllowList {
    origins: Vec<String>,
}

impl OriginAllowList {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { origins: origins.into_iter().map(Into::into).collect() }
    }

    /// A missing origin means a same-origin or non-browser client.
    pub fn permits(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(origin) => self.origins.iter().any(|o| o == origin),
        }
    }

    fn header_values(&self) -> Vec<HeaderValue> {
        self.origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "ignoring unparsable CORS origin");
                    None
                }
            })
            .collect()
    }
}

/// Rejects requests from origins outside the allow-list before any handler runs.
pub async fn gate(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let origin = match req.headers().get(header::ORIGIN) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(s) => Some(s.to_string()),
            Err(_) => return Err(AppError::CorsRejected("<non-ascii>".to_string())),
        },
    };

    if !state.origins.permits(origin.as_deref()) {
        let origin = origin.unwrap_or_default();
        tracing::warn!(%origin, method = %req.method(), path = %req.uri().path(), "blocked by CORS");
        return Err(AppError::CorsRejected(origin));
    }

    Ok(next.run(req).await)
}

/// Response headers for allowed origins, and answers to real pre-flight requests.
pub fn layer(origins: &OriginAllowList) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins.header_values()))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(600))
}
