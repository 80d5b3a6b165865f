//! Request DTOs for the cache admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for gateway invalidation (POST /invalidate/gateway)
///
/// # Fields
/// - `workspace_id`: The workspace whose gateway caches to clear
/// - `gateway_id`: With a value, clears only that gateway's keys; omitted,
///   clears the gateway categories for all gateways of the workspace
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateGatewayRequest {
    /// The workspace to clear
    pub workspace_id: i64,
    /// Optional gateway to narrow the invalidation to
    #[serde(default)]
    pub gateway_id: Option<i64>,
}

impl InvalidateGatewayRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.workspace_id <= 0 {
            return Some("workspace_id must be positive".to_string());
        }
        if matches!(self.gateway_id, Some(id) if id <= 0) {
            return Some("gateway_id must be positive when given".to_string());
        }
        None
    }
}

/// Request body for category group clearing (POST /invalidate/group)
#[derive(Debug, Clone, Deserialize)]
pub struct ClearGroupRequest {
    /// Named category group, e.g. "microtendencias"
    pub group: String,
    /// Optional workspace to scope the clear to
    #[serde(default)]
    pub workspace_id: Option<i64>,
}

impl ClearGroupRequest {
    /// Validates the request data
    pub fn validate(&self) -> Option<String> {
        if self.group.is_empty() {
            return Some("group cannot be empty".to_string());
        }
        if matches!(self.workspace_id, Some(id) if id <= 0) {
            return Some("workspace_id must be positive when given".to_string());
        }
        None
    }
}
