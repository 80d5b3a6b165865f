//! Cache Module
//!
//! Read-through caching with computed keys, category TTLs, and
//! pattern-based invalidation.

mod batch;
mod invalidate;
mod keys;
mod service;
mod store;
mod ttl;


// Re-export public types
pub use batch::{TimelineAssembler, TimelineSource, TIMELINE_CATEGORY};
pub use invalidate::{CategoryGroup, Invalidator};
pub use keys::{derive_key, CacheParams};
pub use service::{cached, Cached, CacheService};
pub use store::{CacheStatsReport, HealthReport, Store};
pub use ttl::TtlPolicy;

// == Public Constants ==
/// Parameter name identifying the tenant (workspace) in a key derivation
pub const WORKSPACE_PARAM: &str = "workspace_id";

/// Parameter name identifying the sub-resource (gateway) in a key derivation
pub const GATEWAY_PARAM: &str = "gateway_id";

/// Reserved key used by the health-check write/read probe
pub const PROBE_KEY: &str = "health_check_probe";

/// Global default TTL in seconds for categories without a configured TTL
pub const GLOBAL_DEFAULT_TTL: u64 = 300;
