//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// The backend connection fields are consumed by networked backend
/// implementations; the bundled in-memory backend ignores them.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key-value backend host
    pub backend_host: String,
    /// Key-value backend port
    pub backend_port: u16,
    /// Optional backend credential
    pub backend_password: Option<String>,
    /// Logical database index on the backend
    pub backend_db: u8,
    /// Whether caching is enabled at all
    pub cache_enabled: bool,
    /// Global default TTL in seconds for categories without a configured TTL
    pub default_ttl: u64,
    /// Maximum number of entries the in-memory backend can hold
    pub max_entries: usize,
    /// Admin/diagnostics HTTP server port
    pub admin_port: u16,
    /// Background expired-entry sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `BACKEND_HOST` - Key-value backend host (default: "localhost")
    /// - `BACKEND_PORT` - Key-value backend port (default: 6379)
    /// - `BACKEND_PASSWORD` - Backend credential (default: none)
    /// - `BACKEND_DB` - Logical database index (default: 0)
    /// - `CACHE_ENABLED` - Enable caching (default: true)
    /// - `DEFAULT_TTL` - Global default TTL in seconds (default: 300)
    /// - `MAX_ENTRIES` - In-memory backend capacity (default: 100000)
    /// - `ADMIN_PORT` - Admin HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Expired-entry sweep frequency in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            backend_host: env::var("BACKEND_HOST").unwrap_or_else(|_| "localhost".to_string()),
            backend_port: env::var("BACKEND_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(6379),
            backend_password: env::var("BACKEND_PASSWORD").ok().filter(|v| !v.is_empty()),
            backend_db: env::var("BACKEND_DB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            cache_enabled: env::var("CACHE_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            default_ttl: env::var("DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            max_entries: env::var("MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100_000),
            admin_port: env::var("ADMIN_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_host: "localhost".to_string(),
            backend_port: 6379,
            backend_password: None,
            backend_db: 0,
            cache_enabled: true,
            default_ttl: 300,
            max_entries: 100_000,
            admin_port: 3000,
            sweep_interval: 30,
        }
    }
}
