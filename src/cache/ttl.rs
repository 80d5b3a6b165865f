//! TTL Policy Module
//!
//! Maps cache categories to their default expiration durations.

use std::collections::HashMap;

use crate::cache::GLOBAL_DEFAULT_TTL;

/// Default per-category TTLs in seconds.
///
/// Short-lived dashboards refresh often; model artifacts and timelines are
/// expensive to recompute and live longer.
const CATEGORY_TTLS: &[(&str, u64)] = &[
    ("player_features", 900),
    ("dashboard_metrics", 600),
    ("churn_predictions", 1800),
    ("player_timeline", 3600),
    ("aggregated_data", 1800),
    ("ml_models", 7200),
    ("churn_metrics_data", 900),
    ("risk_alerts_data", 600),
    ("segmentation_data", 1800),
    ("microtendencias_dashboard", 300),
];

// == TTL Policy ==
/// Category-to-TTL lookup table with a global fallback.
///
/// Immutable after construction; a policy must not change mid-request.
#[derive(Debug, Clone)]
pub struct TtlPolicy {
    table: HashMap<String, u64>,
    default_ttl: u64,
}

impl TtlPolicy {
    // == Constructor ==
    /// Creates the policy with the standard category table and the given
    /// global default.
    pub fn new(default_ttl: u64) -> Self {
        let table = CATEGORY_TTLS
            .iter()
            .map(|(category, ttl)| (category.to_string(), *ttl))
            .collect();
        Self { table, default_ttl }
    }

    // == Lookup ==
    /// Returns the category's configured TTL, else the global default.
    pub fn ttl_for(&self, category: &str) -> u64 {
        self.table.get(category).copied().unwrap_or(self.default_ttl)
    }

    /// Returns the global default TTL.
    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// Known category names, used for per-category key counts in stats.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.table.keys().cloned().collect();
        categories.sort();
        categories
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::new(GLOBAL_DEFAULT_TTL)
    }
}
