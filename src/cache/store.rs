//! Store Adapter Module
//!
//! Thin contract over a [`KeyValueBackend`]: serialization, graceful
//! degradation, stats, and the health probe. Backend failures never escape
//! this boundary after construction; they degrade to false/None/0 and a log
//! line, so cache trouble can never fail a read path end-to-end.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::backend::KeyValueBackend;
use crate::cache::PROBE_KEY;
use crate::error::{CacheError, Result};

/// TTL for the health probe entry, generous enough to survive a slow probe.
const PROBE_TTL: u64 = 60;

// == Stats Report ==
/// Best-effort cache introspection.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsReport {
    /// Whether the backend answered the stats query
    pub connected: bool,
    /// Approximate memory held by live entries, in bytes
    pub used_memory_bytes: u64,
    /// Number of live keys across all categories
    pub total_keys: usize,
    /// Live key count per known category
    pub key_counts: BTreeMap<String, usize>,
    /// hits / (hits + misses), 0.0 when no lookups have happened
    pub hit_rate: f64,
    /// Seconds since the backend was started
    pub uptime_seconds: u64,
    /// Failure description when `connected` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CacheStatsReport {
    fn unavailable(err: impl ToString) -> Self {
        Self {
            connected: false,
            used_memory_bytes: 0,
            total_keys: 0,
            key_counts: BTreeMap::new(),
            hit_rate: 0.0,
            uptime_seconds: 0,
            error: Some(err.to_string()),
        }
    }
}

// == Health Report ==
/// Outcome of the synthetic write/read/delete health probe.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// "healthy" only when the write and the matching read both succeeded
    pub status: String,
    /// Whether the backend was reachable at all
    pub backend_connected: bool,
    /// Whether the probe write was acknowledged
    pub write_ok: bool,
    /// Whether the probe read returned the written value
    pub read_ok: bool,
    /// Failure description for unhealthy outcomes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Probe timestamp in ISO 8601 format
    pub timestamp: String,
}

/// Value written and read back by the health probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct HealthProbe {
    timestamp: String,
    probe: bool,
}

// == Store ==
/// Store adapter over a shared key-value backend.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValueBackend>,
}

impl Store {
    // == Constructor ==
    /// Connects the adapter to a backend.
    ///
    /// Performs an initial reachability probe. This is the one place a
    /// backend failure is fatal: a cache that cannot reach its store at
    /// startup must not come up.
    pub fn connect(backend: Arc<dyn KeyValueBackend>) -> Result<Self> {
        let info = backend
            .info()
            .map_err(|err| CacheError::Backend(format!("initial backend probe failed: {err}")))?;
        info!(
            total_keys = info.total_keys,
            uptime_seconds = info.uptime_seconds,
            "store connected"
        );
        Ok(Self { backend })
    }

    // == Set ==
    /// Serializes a value and stores it with the given TTL.
    ///
    /// Returns whether the store confirmed the write. Serialization and
    /// backend failures are logged, never raised.
    pub fn set_with_ttl<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) -> bool {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(%key, error = %err, "cache set failed: value not serializable");
                return false;
            }
        };

        match self.backend.set_ex(key, ttl_seconds, bytes) {
            Ok(()) => {
                debug!(%key, ttl_seconds, "cache set");
                true
            }
            Err(err) => {
                error!(%key, error = %err, "cache set failed");
                false
            }
        }
    }

    // == Get ==
    /// Fetches and deserializes a value.
    ///
    /// Returns None both when the key is absent and when the stored bytes
    /// fail to decode; the decode failure is logged. Keeping the read path
    /// total is intentional.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.backend.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(%key, "cache miss");
                return None;
            }
            Err(err) => {
                error!(%key, error = %err, "cache get failed");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                debug!(%key, "cache hit");
                Some(value)
            }
            Err(err) => {
                error!(%key, error = %err, "cache get failed: stored bytes not decodable");
                None
            }
        }
    }

    // == Delete ==
    /// Removes a single key; returns whether it existed.
    pub fn delete(&self, key: &str) -> bool {
        match self.backend.del(std::slice::from_ref(&key.to_string())) {
            Ok(removed) => removed > 0,
            Err(err) => {
                error!(%key, error = %err, "cache delete failed");
                false
            }
        }
    }

    // == Delete Matching ==
    /// Deletes all keys matching a glob pattern; returns how many were removed.
    /// Returns 0 on backend error.
    pub fn delete_matching(&self, pattern: &str) -> usize {
        let keys = match self.backend.keys(pattern) {
            Ok(keys) => keys,
            Err(err) => {
                error!(%pattern, error = %err, "pattern scan failed");
                return 0;
            }
        };
        if keys.is_empty() {
            return 0;
        }

        match self.backend.del(&keys) {
            Ok(removed) => {
                info!(%pattern, removed, "cache invalidated");
                removed
            }
            Err(err) => {
                error!(%pattern, error = %err, "pattern delete failed");
                0
            }
        }
    }

    // == Flush All ==
    /// Unconditionally empties the entire namespace, all categories and all
    /// tenants. Administrative and irreversible.
    pub fn flush_all(&self) -> bool {
        match self.backend.flush_db() {
            Ok(()) => {
                warn!("cache flushed: all entries removed");
                true
            }
            Err(err) => {
                error!(error = %err, "cache flush failed");
                false
            }
        }
    }

    // == Stats ==
    /// Best-effort introspection. On any failure reports `connected: false`
    /// with the error instead of raising.
    pub fn stats(&self, categories: &[String]) -> CacheStatsReport {
        let info = match self.backend.info() {
            Ok(info) => info,
            Err(err) => {
                error!(error = %err, "cache stats failed");
                return CacheStatsReport::unavailable(err);
            }
        };

        let mut key_counts = BTreeMap::new();
        for category in categories {
            match self.backend.keys(&format!("{category}:*")) {
                Ok(keys) => {
                    key_counts.insert(category.clone(), keys.len());
                }
                Err(err) => {
                    error!(error = %err, "cache stats failed");
                    return CacheStatsReport::unavailable(err);
                }
            }
        }

        let lookups = info.keyspace_hits + info.keyspace_misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            info.keyspace_hits as f64 / lookups as f64
        };

        CacheStatsReport {
            connected: true,
            used_memory_bytes: info.used_memory_bytes,
            total_keys: info.total_keys,
            key_counts,
            hit_rate,
            uptime_seconds: info.uptime_seconds,
            error: None,
        }
    }

    // == Health Check ==
    /// Write/read/delete round trip against the reserved probe key.
    ///
    /// Healthy only when the write is acknowledged and the read returns a
    /// value structurally equal to the one written. Probe failures yield an
    /// unhealthy report, never a panic or an error.
    pub fn health_check(&self) -> HealthReport {
        let timestamp = chrono::Utc::now().to_rfc3339();
        let probe = HealthProbe {
            timestamp: timestamp.clone(),
            probe: true,
        };

        let write_ok = self.set_with_ttl(PROBE_KEY, &probe, PROBE_TTL);
        let read_back: Option<HealthProbe> = if write_ok { self.get(PROBE_KEY) } else { None };
        let read_ok = read_back.as_ref() == Some(&probe);
        self.delete(PROBE_KEY);

        let healthy = write_ok && read_ok;
        if !healthy {
            warn!(write_ok, read_ok, "cache health check failed");
        }

        HealthReport {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            backend_connected: write_ok || read_back.is_some(),
            write_ok,
            read_ok,
            error: if healthy {
                None
            } else {
                Some("health probe round trip failed".to_string())
            },
            timestamp,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendInfo, MemoryBackend};
    use serde_json::json;

    /// Backend that connects but fails every data operation.
    struct FailingBackend;

    impl KeyValueBackend for FailingBackend {
        fn set_ex(&self, _key: &str, _ttl: u64, _value: Vec<u8>) -> Result<()> {
            Err(CacheError::Backend("connection reset".to_string()))
        }
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(CacheError::Backend("connection reset".to_string()))
        }
        fn keys(&self, _pattern: &str) -> Result<Vec<String>> {
            Err(CacheError::Backend("connection reset".to_string()))
        }
        fn del(&self, _keys: &[String]) -> Result<usize> {
            Err(CacheError::Backend("connection reset".to_string()))
        }
        fn flush_db(&self) -> Result<()> {
            Err(CacheError::Backend("connection reset".to_string()))
        }
        fn info(&self) -> Result<BackendInfo> {
            Ok(BackendInfo::default())
        }
    }

    /// Backend that is unreachable from the first probe.
    struct DeadBackend;

    impl KeyValueBackend for DeadBackend {
        fn set_ex(&self, _key: &str, _ttl: u64, _value: Vec<u8>) -> Result<()> {
            Err(CacheError::Backend("no route to host".to_string()))
        }
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(CacheError::Backend("no route to host".to_string()))
        }
        fn keys(&self, _pattern: &str) -> Result<Vec<String>> {
            Err(CacheError::Backend("no route to host".to_string()))
        }
        fn del(&self, _keys: &[String]) -> Result<usize> {
            Err(CacheError::Backend("no route to host".to_string()))
        }
        fn flush_db(&self) -> Result<()> {
            Err(CacheError::Backend("no route to host".to_string()))
        }
        fn info(&self) -> Result<BackendInfo> {
            Err(CacheError::Backend("no route to host".to_string()))
        }
    }

    fn memory_store() -> Store {
        Store::connect(Arc::new(MemoryBackend::new(1000))).unwrap()
    }

    #[test]
    fn test_connect_fails_on_dead_backend() {
        let result = Store::connect(Arc::new(DeadBackend));
        assert!(matches!(result, Err(CacheError::Backend(_))));
    }

    #[test]
    fn test_round_trip_scalar() {
        let store = memory_store();
        assert!(store.set_with_ttl("k", &42i64, 60));
        assert_eq!(store.get::<i64>("k"), Some(42));
    }

    #[test]
    fn test_round_trip_nested_mapping() {
        let store = memory_store();
        let value = json!({"metrics": {"deposits": 10, "avg_ticket": 52.5}, "segment": "top_20"});
        assert!(store.set_with_ttl("k", &value, 60));
        assert_eq!(store.get::<serde_json::Value>("k"), Some(value));
    }

    #[test]
    fn test_round_trip_tabular() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Row {
            player_id: String,
            deposits: u32,
        }

        let store = memory_store();
        let rows = vec![
            Row { player_id: "p1".to_string(), deposits: 3 },
            Row { player_id: "p2".to_string(), deposits: 7 },
        ];
        assert!(store.set_with_ttl("k", &rows, 60));
        assert_eq!(store.get::<Vec<Row>>("k"), Some(rows));
    }

    #[test]
    fn test_get_absent_key() {
        let store = memory_store();
        assert_eq!(store.get::<i64>("missing"), None);
    }

    #[test]
    fn test_get_undecodable_bytes_is_a_miss() {
        let backend = Arc::new(MemoryBackend::new(1000));
        backend.set_ex("k", 60, b"not json".to_vec()).unwrap();

        let store = Store::connect(backend).unwrap();
        assert_eq!(store.get::<i64>("k"), None);
    }

    #[test]
    fn test_set_on_failing_backend_returns_false() {
        let store = Store::connect(Arc::new(FailingBackend)).unwrap();
        assert!(!store.set_with_ttl("k", &1i64, 60));
    }

    #[test]
    fn test_delete_matching_counts() {
        let store = memory_store();
        store.set_with_ttl("cat:workspace_id=1:aaa", &1i64, 60);
        store.set_with_ttl("cat:workspace_id=1:bbb", &2i64, 60);
        store.set_with_ttl("cat:workspace_id=2:ccc", &3i64, 60);

        assert_eq!(store.delete_matching("cat:*workspace_id=1:*"), 2);
        assert_eq!(store.delete_matching("cat:*workspace_id=1:*"), 0);
        assert_eq!(store.get::<i64>("cat:workspace_id=2:ccc"), Some(3));
    }

    #[test]
    fn test_delete_matching_on_failing_backend_returns_zero() {
        let store = Store::connect(Arc::new(FailingBackend)).unwrap();
        assert_eq!(store.delete_matching("cat:*"), 0);
    }

    #[test]
    fn test_flush_all() {
        let store = memory_store();
        store.set_with_ttl("a", &1i64, 60);
        store.set_with_ttl("b", &2i64, 60);

        assert!(store.flush_all());
        assert_eq!(store.get::<i64>("a"), None);
        assert_eq!(store.get::<i64>("b"), None);
    }

    #[test]
    fn test_stats_reports_key_counts() {
        let store = memory_store();
        store.set_with_ttl("player_features:aaa", &1i64, 60);
        store.set_with_ttl("player_features:bbb", &2i64, 60);
        store.set_with_ttl("dashboard_metrics:ccc", &3i64, 60);

        let categories = vec![
            "player_features".to_string(),
            "dashboard_metrics".to_string(),
            "churn_predictions".to_string(),
        ];
        let stats = store.stats(&categories);

        assert!(stats.connected);
        assert_eq!(stats.total_keys, 3);
        assert_eq!(stats.key_counts["player_features"], 2);
        assert_eq!(stats.key_counts["dashboard_metrics"], 1);
        assert_eq!(stats.key_counts["churn_predictions"], 0);
    }

    #[test]
    fn test_stats_unavailable_on_dead_backend() {
        let store = Store {
            backend: Arc::new(DeadBackend),
        };
        let stats = store.stats(&[]);
        assert!(!stats.connected);
        assert!(stats.error.is_some());
    }

    #[test]
    fn test_health_check_healthy() {
        let store = memory_store();
        let report = store.health_check();

        assert_eq!(report.status, "healthy");
        assert!(report.write_ok);
        assert!(report.read_ok);
        assert!(report.error.is_none());
        // Probe key must not linger
        assert_eq!(store.get::<serde_json::Value>(PROBE_KEY), None);
    }

    #[test]
    fn test_health_check_unhealthy_does_not_panic() {
        let store = Store::connect(Arc::new(FailingBackend)).unwrap();
        let report = store.health_check();

        assert_eq!(report.status, "unhealthy");
        assert!(!report.write_ok);
        assert!(!report.read_ok);
        assert!(report.error.is_some());
    }
}
