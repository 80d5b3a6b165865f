//! Batch Timeline Assembler Module
//!
//! Serves many player timelines at once: partitions the requested ids into
//! cache hits and misses, fetches all misses from the data source in a
//! single batch call, caches the fetched timelines, and returns the merged
//! set keyed by player id.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::cache::{derive_key, CacheParams, CacheService};

/// Category under which per-player timelines are cached.
pub const TIMELINE_CATEGORY: &str = "player_timeline";

// == Timeline Source ==
/// External source of timeline data.
///
/// Must answer one call for the whole batch of missing ids; the assembler
/// never issues per-id calls.
pub trait TimelineSource: Send + Sync {
    /// Fetches timeline data for the given players of a workspace,
    /// keyed by player id.
    fn fetch_batch(
        &self,
        workspace_id: i64,
        player_ids: &[String],
    ) -> anyhow::Result<HashMap<String, Value>>;
}

// == Timeline Assembler ==
/// Batch read-through over per-player timeline entries.
#[derive(Clone)]
pub struct TimelineAssembler {
    cache: CacheService,
    source: Arc<dyn TimelineSource>,
}

impl TimelineAssembler {
    // == Constructor ==
    pub fn new(cache: CacheService, source: Arc<dyn TimelineSource>) -> Self {
        Self { cache, source }
    }

    // == Assemble ==
    /// Returns the timeline for every requested player id, serving cached
    /// entries where possible and batch-fetching the rest.
    ///
    /// A source failure propagates unchanged (compute failures are loud).
    /// Ids the source omits are logged and absent from the result; ids it
    /// returns unrequested are ignored.
    pub fn assemble(
        &self,
        workspace_id: i64,
        player_ids: &[String],
    ) -> anyhow::Result<HashMap<String, Value>> {
        let mut results: HashMap<String, Value> = HashMap::new();
        let mut missing: Vec<String> = Vec::new();
        let mut keys: HashMap<String, String> = HashMap::new();

        for player_id in player_ids {
            if results.contains_key(player_id) {
                continue; // duplicate id in the request
            }
            let params = CacheParams::new()
                .with("workspace_id", workspace_id)
                .with("player_id", player_id);
            let key = derive_key(TIMELINE_CATEGORY, &params);

            match self.cache.get::<Value>(&key) {
                Some(timeline) => {
                    results.insert(player_id.clone(), timeline);
                }
                None => {
                    if !missing.contains(player_id) {
                        missing.push(player_id.clone());
                    }
                    keys.insert(player_id.clone(), key);
                }
            }
        }

        info!(
            workspace_id,
            hits = results.len(),
            misses = missing.len(),
            "batch timeline cache"
        );

        if missing.is_empty() {
            return Ok(results);
        }

        let fetched = self.source.fetch_batch(workspace_id, &missing)?;

        let ttl = self.cache.ttl_policy().ttl_for(TIMELINE_CATEGORY);
        for player_id in &missing {
            match fetched.get(player_id) {
                Some(timeline) => {
                    let key = &keys[player_id];
                    self.cache.set(key, timeline, Some(ttl));
                    results.insert(player_id.clone(), timeline.clone());
                }
                None => {
                    warn!(workspace_id, player_id = %player_id, "source returned no timeline");
                }
            }
        }

        Ok(results)
    }
}
