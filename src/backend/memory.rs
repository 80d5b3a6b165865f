//! In-Memory Backend Module
//!
//! A thread-safe byte store with TTL expiration, glob key scanning, and
//! INFO-style counters. Serves as the default [`KeyValueBackend`] and as the
//! reference implementation for networked backends.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::backend::{glob_match, BackendInfo, KeyValueBackend};
use crate::error::{CacheError, Result};

// == Stored Entry ==
/// A single stored value with its expiration instant.
#[derive(Debug, Clone)]
struct StoredEntry {
    /// Opaque serialized value
    value: Vec<u8>,
    /// Expiration timestamp (Unix milliseconds)
    expires_at: u64,
}

impl StoredEntry {
    fn new(value: Vec<u8>, ttl_seconds: u64) -> Self {
        Self {
            value,
            expires_at: current_timestamp_ms() + ttl_seconds * 1000,
        }
    }

    /// An entry is expired once the current time reaches its expiration instant.
    fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }
}

// == Memory Backend ==
/// In-memory key-value backend.
///
/// Expired entries are dropped lazily on read and in bulk by
/// [`MemoryBackend::sweep_expired`] (driven by the background sweep task).
/// All tenants and categories share the single namespace.
#[derive(Debug)]
pub struct MemoryBackend {
    inner: RwLock<Inner>,
    /// Maximum number of entries held at once
    max_entries: usize,
    started_at: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, StoredEntry>,
    hits: u64,
    misses: u64,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates a new backend holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            max_entries,
            started_at: Instant::now(),
        }
    }

    // == Sweep Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        let mut inner = self.inner.write().expect("backend lock poisoned");
        Self::drop_expired(&mut inner)
    }

    /// Returns the current number of live entries.
    pub fn len(&self) -> usize {
        let inner = self.inner.read().expect("backend lock poisoned");
        inner
            .entries
            .values()
            .filter(|entry| !entry.is_expired())
            .count()
    }

    /// Returns true if the backend holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn drop_expired(inner: &mut Inner) -> usize {
        let expired_keys: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        for key in expired_keys {
            inner.entries.remove(&key);
        }
        count
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(100_000)
    }
}

impl KeyValueBackend for MemoryBackend {
    fn set_ex(&self, key: &str, ttl_seconds: u64, value: Vec<u8>) -> Result<()> {
        if ttl_seconds == 0 {
            return Err(CacheError::InvalidRequest(
                "TTL must be a positive number of seconds".to_string(),
            ));
        }

        let mut inner = self.inner.write().expect("backend lock poisoned");

        // At capacity: reclaim expired entries before rejecting the write
        let is_overwrite = inner.entries.contains_key(key);
        if !is_overwrite && inner.entries.len() >= self.max_entries {
            Self::drop_expired(&mut inner);
            if inner.entries.len() >= self.max_entries {
                return Err(CacheError::Backend(format!(
                    "backend at capacity ({} entries)",
                    self.max_entries
                )));
            }
        }

        inner
            .entries
            .insert(key.to_string(), StoredEntry::new(value, ttl_seconds));
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut inner = self.inner.write().expect("backend lock poisoned");

        if let Some(entry) = inner.entries.get(key) {
            if entry.is_expired() {
                inner.entries.remove(key);
                inner.misses += 1;
                return Ok(None);
            }
            let value = entry.value.clone();
            inner.hits += 1;
            Ok(Some(value))
        } else {
            inner.misses += 1;
            Ok(None)
        }
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let inner = self.inner.read().expect("backend lock poisoned");
        Ok(inner
            .entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired() && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect())
    }

    fn del(&self, keys: &[String]) -> Result<usize> {
        let mut inner = self.inner.write().expect("backend lock poisoned");
        let mut removed = 0;
        for key in keys {
            if inner.entries.remove(key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn flush_db(&self) -> Result<()> {
        let mut inner = self.inner.write().expect("backend lock poisoned");
        inner.entries.clear();
        Ok(())
    }

    fn info(&self) -> Result<BackendInfo> {
        let inner = self.inner.read().expect("backend lock poisoned");
        let live: Vec<(&String, &StoredEntry)> = inner
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .collect();

        let used_memory_bytes = live
            .iter()
            .map(|(key, entry)| (key.len() + entry.value.len()) as u64)
            .sum();

        Ok(BackendInfo {
            used_memory_bytes,
            total_keys: live.len(),
            keyspace_hits: inner.hits,
            keyspace_misses: inner.misses,
            uptime_seconds: self.started_at.elapsed().as_secs(),
        })
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_backend_new() {
        let backend = MemoryBackend::new(100);
        assert!(backend.is_empty());
        assert_eq!(backend.len(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let backend = MemoryBackend::new(100);

        backend.set_ex("key1", 60, b"value1".to_vec()).unwrap();
        let value = backend.get("key1").unwrap();

        assert_eq!(value, Some(b"value1".to_vec()));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let backend = MemoryBackend::new(100);
        assert_eq!(backend.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_overwrite_replaces_full_entry() {
        let backend = MemoryBackend::new(100);

        backend.set_ex("key1", 60, b"value1".to_vec()).unwrap();
        backend.set_ex("key1", 60, b"value2".to_vec()).unwrap();

        assert_eq!(backend.get("key1").unwrap(), Some(b"value2".to_vec()));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let backend = MemoryBackend::new(100);
        let result = backend.set_ex("key1", 0, b"value".to_vec());
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[test]
    fn test_ttl_expiration() {
        let backend = MemoryBackend::new(100);

        backend.set_ex("key1", 1, b"value1".to_vec()).unwrap();
        assert!(backend.get("key1").unwrap().is_some());

        sleep(Duration::from_millis(1100));

        assert_eq!(backend.get("key1").unwrap(), None);
    }

    #[test]
    fn test_keys_pattern() {
        let backend = MemoryBackend::new(100);

        backend.set_ex("player_features:aaa", 60, b"1".to_vec()).unwrap();
        backend.set_ex("player_features:bbb", 60, b"2".to_vec()).unwrap();
        backend.set_ex("dashboard_metrics:ccc", 60, b"3".to_vec()).unwrap();

        let mut matched = backend.keys("player_features:*").unwrap();
        matched.sort();
        assert_eq!(matched, vec!["player_features:aaa", "player_features:bbb"]);
    }

    #[test]
    fn test_keys_excludes_expired() {
        let backend = MemoryBackend::new(100);

        backend.set_ex("short:aaa", 1, b"1".to_vec()).unwrap();
        backend.set_ex("short:bbb", 60, b"2".to_vec()).unwrap();

        sleep(Duration::from_millis(1100));

        let matched = backend.keys("short:*").unwrap();
        assert_eq!(matched, vec!["short:bbb"]);
    }

    #[test]
    fn test_del_returns_removed_count() {
        let backend = MemoryBackend::new(100);

        backend.set_ex("key1", 60, b"1".to_vec()).unwrap();
        backend.set_ex("key2", 60, b"2".to_vec()).unwrap();

        let removed = backend
            .del(&["key1".to_string(), "key2".to_string(), "ghost".to_string()])
            .unwrap();

        assert_eq!(removed, 2);
        assert!(backend.is_empty());
    }

    #[test]
    fn test_flush_db() {
        let backend = MemoryBackend::new(100);

        backend.set_ex("key1", 60, b"1".to_vec()).unwrap();
        backend.set_ex("key2", 60, b"2".to_vec()).unwrap();
        backend.flush_db().unwrap();

        assert!(backend.is_empty());
    }

    #[test]
    fn test_info_counters() {
        let backend = MemoryBackend::new(100);

        backend.set_ex("key1", 60, b"value1".to_vec()).unwrap();
        backend.get("key1").unwrap(); // hit
        backend.get("ghost").unwrap(); // miss

        let info = backend.info().unwrap();
        assert_eq!(info.keyspace_hits, 1);
        assert_eq!(info.keyspace_misses, 1);
        assert_eq!(info.total_keys, 1);
        assert!(info.used_memory_bytes >= "key1value1".len() as u64);
    }

    #[test]
    fn test_sweep_expired() {
        let backend = MemoryBackend::new(100);

        backend.set_ex("key1", 1, b"1".to_vec()).unwrap();
        backend.set_ex("key2", 60, b"2".to_vec()).unwrap();

        sleep(Duration::from_millis(1100));

        let removed = backend.sweep_expired();
        assert_eq!(removed, 1);
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_capacity_reclaims_expired() {
        let backend = MemoryBackend::new(2);

        backend.set_ex("key1", 1, b"1".to_vec()).unwrap();
        backend.set_ex("key2", 60, b"2".to_vec()).unwrap();

        sleep(Duration::from_millis(1100));

        // key1 is expired; the insert reclaims it instead of failing
        backend.set_ex("key3", 60, b"3".to_vec()).unwrap();
        assert_eq!(backend.len(), 2);
    }

    #[test]
    fn test_capacity_exceeded() {
        let backend = MemoryBackend::new(1);

        backend.set_ex("key1", 60, b"1".to_vec()).unwrap();
        let result = backend.set_ex("key2", 60, b"2".to_vec());
        assert!(matches!(result, Err(CacheError::Backend(_))));

        // Overwriting an existing key is always allowed
        backend.set_ex("key1", 60, b"new".to_vec()).unwrap();
    }
}
