//! Error types for the cache core
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache core.
///
/// Backend and serialization failures are normally absorbed at the store
/// adapter boundary (converted to false/None/0 and logged); the variants
/// surface only at construction time and on the admin API.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend unreachable or a backend operation failed
    #[error("Backend error: {0}")]
    Backend(String),

    /// Value could not be encoded or stored bytes could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::Backend(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            CacheError::Serialization(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache core.
pub type Result<T> = std::result::Result<T, CacheError>;
