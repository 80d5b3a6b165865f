//! Invalidation Planner Module
//!
//! Expands coarse-grained invalidation intent (workspace, gateway, category
//! group, flush) into concrete key patterns and drives them through the
//! store adapter. The fixed category lists live here and nowhere else, and
//! the invalidation scope is explicit in the method signature, never
//! inferred from which arguments happen to be null.

use std::str::FromStr;

use tracing::info;

use crate::cache::{Store, GATEWAY_PARAM, WORKSPACE_PARAM};
use crate::error::CacheError;

/// Tenant-scoped categories cleared by a workspace invalidation.
pub const WORKSPACE_CATEGORIES: &[&str] = &[
    "player_features",
    "dashboard_metrics",
    "churn_predictions",
    "player_timeline",
    "aggregated_data",
    "microtendencias_dashboard",
    "dashboard_summary",
];

/// Gateway-related categories cleared by a gateway invalidation.
pub const GATEWAY_CATEGORIES: &[&str] = &[
    "dashboard_summary",
    "microtendencias_dashboard",
    "gateway_performance",
];

/// The microtendencias dashboard family.
const MICROTENDENCIAS_CATEGORIES: &[&str] = &[
    "microtendencias_dashboard",
    "dashboard_summary",
    "microtendencias_trends",
    "microtendencias_gateway_performance",
];

// == Category Group ==
/// Named group of related categories cleared together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryGroup {
    /// All microtendencias-family dashboard categories
    Microtendencias,
}

impl CategoryGroup {
    /// The categories belonging to this group.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            CategoryGroup::Microtendencias => MICROTENDENCIAS_CATEGORIES,
        }
    }
}

impl FromStr for CategoryGroup {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "microtendencias" => Ok(CategoryGroup::Microtendencias),
            other => Err(CacheError::InvalidRequest(format!(
                "Unknown category group: {other}"
            ))),
        }
    }
}

// == Pattern Builders ==
/// Pattern selecting every key of a category for one workspace.
fn workspace_pattern(category: &str, workspace_id: i64) -> String {
    format!("{category}:*{WORKSPACE_PARAM}={workspace_id}:*")
}

/// Pattern selecting every key of a category for one gateway of a workspace.
/// Relies on the codec embedding the scope tokens in fixed order.
fn gateway_pattern(category: &str, workspace_id: i64, gateway_id: i64) -> String {
    format!("{category}:*{WORKSPACE_PARAM}={workspace_id}:{GATEWAY_PARAM}={gateway_id}:*")
}

// == Invalidator ==
/// Pattern-based bulk invalidation over the store adapter.
#[derive(Clone)]
pub struct Invalidator {
    store: Store,
}

impl Invalidator {
    // == Constructor ==
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    // == Invalidate Pattern ==
    /// Deletes all keys matching the pattern; 0 on backend error, never raises.
    pub fn invalidate_pattern(&self, pattern: &str) -> usize {
        self.store.delete_matching(pattern)
    }

    // == Invalidate Workspace ==
    /// Clears every tenant-scoped category for one workspace.
    ///
    /// A failing pattern does not abort the remaining deletions; the count
    /// reflects successful removals only.
    pub fn invalidate_workspace(&self, workspace_id: i64) -> usize {
        let mut total = 0;
        for category in WORKSPACE_CATEGORIES {
            total += self.invalidate_pattern(&workspace_pattern(category, workspace_id));
        }
        info!(workspace_id, removed = total, "workspace cache cleared");
        total
    }

    // == Invalidate Gateway ==
    /// Clears gateway-related categories for a workspace.
    ///
    /// Two explicit modes: with `gateway_id`, only that gateway's keys are
    /// removed; without it, the categories are cleared for all gateways of
    /// the workspace.
    pub fn invalidate_gateway(&self, workspace_id: i64, gateway_id: Option<i64>) -> usize {
        let patterns: Vec<String> = match gateway_id {
            Some(gateway_id) => GATEWAY_CATEGORIES
                .iter()
                .map(|category| gateway_pattern(category, workspace_id, gateway_id))
                .collect(),
            None => GATEWAY_CATEGORIES
                .iter()
                .map(|category| workspace_pattern(category, workspace_id))
                .collect(),
        };

        let mut total = 0;
        for pattern in &patterns {
            total += self.invalidate_pattern(pattern);
        }
        info!(
            workspace_id,
            gateway_id, removed = total, "gateway cache cleared"
        );
        total
    }

    // == Clear Category Group ==
    /// Clears a fixed set of related categories, globally or for one tenant.
    pub fn clear_category_group(&self, group: CategoryGroup, workspace_id: Option<i64>) -> usize {
        let mut total = 0;
        for category in group.categories() {
            let pattern = match workspace_id {
                Some(workspace_id) => workspace_pattern(category, workspace_id),
                None => format!("{category}:*"),
            };
            total += self.invalidate_pattern(&pattern);
        }
        info!(group = ?group, workspace_id, removed = total, "category group cleared");
        total
    }

    // == Flush Everything ==
    /// Empties the entire namespace, all categories and all tenants.
    /// Administrative, irreversible, unscoped.
    pub fn flush_everything(&self) -> bool {
        self.store.flush_all()
    }
}
