//! API error taxonomy, collapsed to HTTP responses at the boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Input failed validation; carries the violated rules.
    #[error("validation failed")]
    Validation(Vec<String>),
    #[error("link not found")]
    NotFound,
    #[error("rate limit exceeded")]
    RateLimited,
    /// Store or serialization failure. Logged server-side; callers get
    /// a generic message.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(issues) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": issues }))).into_response()
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Link not found" })),
            )
                .into_response(),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": "Rate limit exceeded" })),
            )
                .into_response(),
            ApiError::Internal(err) => {
                tracing::error!("internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
