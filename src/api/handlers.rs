//! API Handlers
//!
//! HTTP request handlers for each cache admin endpoint.

use axum::extract::{Path, State};
use axum::Json;

use crate::cache::{CacheService, CacheStatsReport, CategoryGroup, HealthReport, Invalidator};
use crate::error::{CacheError, Result};
use crate::models::{ClearGroupRequest, FlushResponse, InvalidateGatewayRequest, InvalidateResponse};

/// Application state shared across all handlers.
///
/// The service and invalidator are cheap clones over the same shared
/// backend.
#[derive(Clone)]
pub struct AppState {
    /// Cache facade
    pub cache: CacheService,
    /// Invalidation planner
    pub invalidator: Invalidator,
}

impl AppState {
    /// Creates a new AppState over a cache service.
    pub fn new(cache: CacheService) -> Self {
        let invalidator = Invalidator::new(cache.store().clone());
        Self { cache, invalidator }
    }
}

/// Handler for GET /health
///
/// Runs the synthetic write/read/delete probe against the backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.cache.health_check())
}

/// Handler for GET /stats
///
/// Returns best-effort cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStatsReport> {
    Json(state.cache.stats())
}

/// Handler for POST /invalidate/workspace/:workspace_id
///
/// Clears every tenant-scoped category for the workspace.
pub async fn invalidate_workspace_handler(
    State(state): State<AppState>,
    Path(workspace_id): Path<i64>,
) -> Result<Json<InvalidateResponse>> {
    if workspace_id <= 0 {
        return Err(CacheError::InvalidRequest(
            "workspace_id must be positive".to_string(),
        ));
    }

    let removed = state.invalidator.invalidate_workspace(workspace_id);
    Ok(Json(InvalidateResponse::new(
        format!("workspace {workspace_id}"),
        removed,
    )))
}

/// Handler for POST /invalidate/gateway
///
/// Two explicit modes: with `gateway_id` only that gateway's keys are
/// cleared; without it the gateway categories are cleared for all gateways
/// of the workspace.
pub async fn invalidate_gateway_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateGatewayRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let removed = state
        .invalidator
        .invalidate_gateway(req.workspace_id, req.gateway_id);

    let scope = match req.gateway_id {
        Some(gateway_id) => format!("workspace {} gateway {}", req.workspace_id, gateway_id),
        None => format!("workspace {} all gateways", req.workspace_id),
    };
    Ok(Json(InvalidateResponse::new(scope, removed)))
}

/// Handler for POST /invalidate/group
///
/// Clears a named category group, globally or scoped to one workspace.
pub async fn clear_group_handler(
    State(state): State<AppState>,
    Json(req): Json<ClearGroupRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }
    let group: CategoryGroup = req.group.parse()?;

    let removed = state
        .invalidator
        .clear_category_group(group, req.workspace_id);
    Ok(Json(InvalidateResponse::new(
        format!("group {}", req.group),
        removed,
    )))
}

/// Handler for POST /flush
///
/// Empties the entire namespace, all categories and all tenants.
pub async fn flush_handler(State(state): State<AppState>) -> Json<FlushResponse> {
    Json(FlushResponse::new(state.invalidator.flush_everything()))
}
