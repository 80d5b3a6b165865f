//! Response DTOs for the cache admin API
//!
//! Defines the structure of outgoing HTTP response bodies. Stats and health
//! responses serialize the core report types directly.

use serde::Serialize;

/// Response body for the invalidation operations
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Success message
    pub message: String,
    /// Number of keys removed
    pub removed: usize,
}

impl InvalidateResponse {
    /// Creates a new InvalidateResponse
    pub fn new(scope: impl Into<String>, removed: usize) -> Self {
        Self {
            message: format!("Cache cleared for {}", scope.into()),
            removed,
        }
    }
}

/// Response body for the flush operation (POST /flush)
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    /// Success message
    pub message: String,
    /// Whether the backend acknowledged the flush
    pub flushed: bool,
}

impl FlushResponse {
    /// Creates a new FlushResponse
    pub fn new(flushed: bool) -> Self {
        Self {
            message: if flushed {
                "All cache entries removed".to_string()
            } else {
                "Flush was not acknowledged by the backend".to_string()
            },
            flushed,
        }
    }
}
