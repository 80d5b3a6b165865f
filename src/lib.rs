//! Retain Cache - a read-through cache for analytics/ML workloads
//!
//! Derives deterministic cache keys from named parameters, serves cached
//! results with category-specific TTLs, and supports wildcard pattern
//! invalidation scoped by workspace and gateway.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use backend::{KeyValueBackend, MemoryBackend};
pub use cache::{
    derive_key, CacheParams, CacheService, Invalidator, Store, TimelineAssembler, TtlPolicy,
};
pub use config::Config;
pub use tasks::spawn_sweep_task;
