//! Key-Value Backend Module
//!
//! Defines the minimal primitives the cache requires from a key-value store
//! and provides an in-memory implementation with TTL expiration and glob
//! key scanning.

mod glob;
mod memory;

// Re-export public types
pub use glob::glob_match;
pub use memory::MemoryBackend;

use serde::Serialize;

use crate::error::Result;

/// Server-side metrics reported by [`KeyValueBackend::info`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct BackendInfo {
    /// Approximate memory held by live entries, in bytes
    pub used_memory_bytes: u64,
    /// Number of live (unexpired) keys
    pub total_keys: usize,
    /// Number of successful key lookups
    pub keyspace_hits: u64,
    /// Number of failed key lookups
    pub keyspace_misses: u64,
    /// Seconds since the backend was started
    pub uptime_seconds: u64,
}

/// Minimal contract required from a key-value backend.
///
/// Mirrors the SETEX / GET / KEYS / DEL / FLUSHDB / INFO primitives of a
/// Redis-class store. Implementations must be safe to share across threads;
/// each individual operation is atomic, sequences of operations are not.
pub trait KeyValueBackend: Send + Sync {
    /// Stores bytes under a key with an expiration, overwriting unconditionally.
    fn set_ex(&self, key: &str, ttl_seconds: u64, value: Vec<u8>) -> Result<()>;

    /// Returns the stored bytes, or None if the key is missing or expired.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Returns all live keys matching a glob pattern (`*` = any run of characters).
    fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// Deletes the given keys, returning how many existed and were removed.
    fn del(&self, keys: &[String]) -> Result<usize>;

    /// Empties the entire namespace.
    fn flush_db(&self) -> Result<()>;

    /// Returns server metrics.
    fn info(&self) -> Result<BackendInfo>;
}
