//! API Module
//!
//! HTTP handlers and routing for the cache admin/diagnostics API.
//!
//! # Endpoints
//! - `GET /health` - Backend health probe
//! - `GET /stats` - Cache statistics
//! - `POST /invalidate/workspace/:workspace_id` - Clear one workspace's caches
//! - `POST /invalidate/gateway` - Clear gateway caches (targeted or workspace-wide)
//! - `POST /invalidate/group` - Clear a category group
//! - `POST /flush` - Empty the entire namespace

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
