//! Cache Facade Module
//!
//! Composes the key codec, store adapter, and TTL policy into the
//! get / set / get-or-compute operations, plus the explicit cached-function
//! wrapper.
//!
//! Construct one `CacheService` per process at startup and hand clones to
//! consumers; clones share the underlying backend.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{derive_key, CacheParams, CacheStatsReport, HealthReport, Store, TtlPolicy};

// == Cache Service ==
/// Read-through cache facade.
#[derive(Clone)]
pub struct CacheService {
    store: Store,
    ttl: TtlPolicy,
    enabled: bool,
}

impl CacheService {
    // == Constructor ==
    pub fn new(store: Store, ttl: TtlPolicy) -> Self {
        Self {
            store,
            ttl,
            enabled: true,
        }
    }

    /// Enables or disables caching wholesale.
    ///
    /// With caching disabled every lookup misses, writes are dropped, and
    /// get_or_compute always computes. Development and test environments run
    /// with caching off.
    pub fn set_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The underlying store adapter.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The TTL policy in effect.
    pub fn ttl_policy(&self) -> &TtlPolicy {
        &self.ttl
    }

    // == Get ==
    /// Direct passthrough to the store adapter.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }
        self.store.get(key)
    }

    // == Set ==
    /// Stores a value; with `ttl` omitted, uses the global default TTL.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<u64>) -> bool {
        if !self.enabled {
            return false;
        }
        self.store
            .set_with_ttl(key, value, ttl.unwrap_or_else(|| self.ttl.default_ttl()))
    }

    // == Get Or Compute ==
    /// Serves the cached value for (category, params), or computes, stores,
    /// and returns it.
    ///
    /// On a hit the compute function is never invoked. On a miss a compute
    /// failure propagates unchanged and nothing is stored; a failed cache
    /// write degrades to "computed but not cached" and still returns the
    /// value.
    ///
    /// No single-flight protection: concurrent callers that miss the same
    /// key will each run the computation, and the last write wins. Accepted
    /// trade-off for this cache.
    pub fn get_or_compute<T, F>(
        &self,
        category: &str,
        params: &CacheParams,
        ttl: Option<u64>,
        compute: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&CacheParams) -> anyhow::Result<T>,
    {
        if !self.enabled {
            return compute(params);
        }

        let key = derive_key(category, params);

        if let Some(cached) = self.store.get::<T>(&key) {
            debug!(category, key = %key, outcome = "hit", "cache lookup");
            return Ok(cached);
        }
        debug!(category, key = %key, outcome = "miss", "cache lookup");

        let value = compute(params)?;

        let ttl_seconds = ttl.unwrap_or_else(|| self.ttl.ttl_for(category));
        if !self.store.set_with_ttl(&key, &value, ttl_seconds) {
            warn!(category, key = %key, "computed value could not be cached");
        }

        Ok(value)
    }

    // == Stats ==
    /// Best-effort stats over the known categories.
    pub fn stats(&self) -> CacheStatsReport {
        self.store.stats(&self.ttl.categories())
    }

    // == Health Check ==
    pub fn health_check(&self) -> HealthReport {
        self.store.health_check()
    }
}

// == Cached Function Wrapper ==
/// A function bound to a cache category and optional TTL.
///
/// The explicit replacement for transparent caching decorators: the category
/// is named, the TTL is visible, and parameters are passed as a named
/// mapping rather than recovered from the wrapped function's signature.
pub struct Cached<F> {
    service: CacheService,
    category: String,
    ttl: Option<u64>,
    func: F,
}

/// Wraps a computation in read-through caching.
///
/// ```ignore
/// let features = cached(service.clone(), "player_features", None, |params| {
///     compute_player_features(params)
/// });
/// let result = features.call(&CacheParams::new().with("workspace_id", 42))?;
/// ```
pub fn cached<F, T>(
    service: CacheService,
    category: impl Into<String>,
    ttl: Option<u64>,
    func: F,
) -> Cached<F>
where
    T: Serialize + DeserializeOwned,
    F: Fn(&CacheParams) -> anyhow::Result<T>,
{
    Cached {
        service,
        category: category.into(),
        ttl,
        func,
    }
}

impl<F> Cached<F> {
    /// Invokes the wrapped function through the cache.
    pub fn call<T>(&self, params: &CacheParams) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(&CacheParams) -> anyhow::Result<T>,
    {
        self.service
            .get_or_compute(&self.category, params, self.ttl, |p| (self.func)(p))
    }
}
