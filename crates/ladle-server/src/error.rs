//! Handler-boundary error type.
//!
//! Storage and auth failures are recovered here and rendered as JSON
//! bodies; internal detail is logged, never echoed to the client. Cache
//! failures never reach this type - the caching layer degrades to the
//! store instead (see `cache::recipes`).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use ladle_storage::StorageError;

/// Errors surfaced by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Recipe absent, or the identifier was malformed.
    #[error("Recipe not found")]
    NotFound,

    /// Tag search matched nothing. Rendered with a `message` field rather
    /// than `error`, matching the search endpoint's contract.
    #[error("Recipes not found")]
    SearchEmpty,

    /// Malformed request body.
    #[error("Bad input: {0}")]
    BadInput(String),

    /// Missing, invalid, or expired session token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Source-of-truth failure.
    #[error(transparent)]
    Store(#[from] StorageError),
}

impl ApiError {
    pub fn bad_input(message: impl Into<String>) -> Self {
        Self::BadInput(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::SearchEmpty => StatusCode::NOT_FOUND,
            Self::BadInput(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::NotFound => json!({ "error": "Recipe not found" }),
            Self::SearchEmpty => json!({ "message": "Recipes not found" }),
            Self::BadInput(message) => json!({ "error": message }),
            Self::Unauthorized(message) => json!({ "error": message }),
            Self::Store(err) => {
                tracing::error!(error = %err, category = %err.category(), "storage failure");
                json!({ "error": "Error while accessing the recipe store" })
            }
        };
        (status, Json(body)).into_response()
    }
}
