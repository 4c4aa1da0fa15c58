use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid movie: {0}")]
    Validation(FieldErrors),

    #[error("movie not found")]
    NotFound,

    #[error("origin {0} not allowed by CORS")]
    CorsRejected(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

/// A body that is not JSON at all fails validation like any other bad input.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(FieldErrors::single("body", "invalid_json", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": errors }))).into_response()
            }
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": "Movie not found" }))).into_response()
            }
            AppError::CorsRejected(_) => {
                (StatusCode::FORBIDDEN, Json(json!({ "message": "Not allowed by CORS" })))
                    .into_response()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "Internal server error" })))
                    .into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
