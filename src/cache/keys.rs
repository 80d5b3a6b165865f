//! Key Codec Module
//!
//! Deterministically maps (category, named parameters) to a cache key.
//!
//! Keys have the form `<category>:<scope tokens><digest>`. The digest is a
//! CRC32 of the canonical JSON rendering of the non-null parameters with
//! names sorted, truncated to 8 hex characters. When the parameters contain
//! the workspace (and optionally gateway) identifier, those pairs are also
//! embedded literally as `name=value:` tokens so that glob patterns can
//! select keys by tenant and sub-resource.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{GATEWAY_PARAM, WORKSPACE_PARAM};

// == Cache Params ==
/// Explicit named-parameter mapping for key derivation.
///
/// Parameters are held in a sorted map, so insertion order never affects the
/// derived key. Null values are kept but ignored by the codec: passing a
/// parameter as null and omitting it yield the same key.
#[derive(Debug, Clone, Default)]
pub struct CacheParams {
    values: BTreeMap<String, Value>,
}

impl CacheParams {
    // == Constructor ==
    /// Creates an empty parameter mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Serialize) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a named parameter.
    ///
    /// Values are converted to their canonical JSON form up front. A value
    /// with no canonical encoding is dropped like a null, with a warning.
    pub fn insert(&mut self, name: &str, value: impl Serialize) {
        match serde_json::to_value(value) {
            Ok(v) => {
                self.values.insert(name.to_string(), v);
            }
            Err(err) => {
                warn!(param = name, error = %err, "parameter has no canonical encoding, dropped");
            }
        }
    }

    /// Returns the value of a parameter, treating nulls as absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    /// Returns true if no non-null parameters are present.
    pub fn is_empty(&self) -> bool {
        self.values.values().all(|v| v.is_null())
    }

    /// Canonical text over the non-null parameters: JSON with names sorted
    /// lexicographically. Same parameters always produce the same text.
    fn canonical_text(&self) -> String {
        let filtered: BTreeMap<&String, &Value> = self
            .values
            .iter()
            .filter(|(_, v)| !v.is_null())
            .collect();
        serde_json::to_string(&filtered).expect("JSON value serialization cannot fail")
    }
}

// == Derive Key ==
/// Derives the cache key for a category and parameter mapping.
///
/// Pure function of its inputs: identical across calls, processes, and time.
/// Emits a diagnostic event distinguishing gateway-scoped, workspace-scoped,
/// and global keys; the event never affects the derived key.
pub fn derive_key(category: &str, params: &CacheParams) -> String {
    let canonical = params.canonical_text();
    let digest = crc32fast::hash(canonical.as_bytes());
    let key = format!("{}:{}{:08x}", category, scope_segment(params), digest);

    if params.get(GATEWAY_PARAM).is_some() {
        debug!(category, key = %key, scope = "gateway", "derived cache key");
    } else if params.get(WORKSPACE_PARAM).is_some() {
        debug!(category, key = %key, scope = "workspace", "derived cache key");
    } else {
        debug!(category, key = %key, scope = "global", "derived cache key");
    }

    key
}

/// Literal scope tokens embedded into the key, in fixed order:
/// `workspace_id=<v>:` then `gateway_id=<v>:`. Empty for global keys.
fn scope_segment(params: &CacheParams) -> String {
    let mut out = String::new();
    for name in [WORKSPACE_PARAM, GATEWAY_PARAM] {
        if let Some(value) = params.get(name) {
            out.push_str(name);
            out.push('=');
            out.push_str(&scope_value(value));
            out.push(':');
        }
    }
    out
}

/// Renders a scope parameter value for literal embedding.
///
/// The `=`/`:` token delimiters terminate every value, so workspace `1`
/// never pattern-matches workspace `12`; delimiter characters inside string
/// values are replaced to keep that guarantee.
fn scope_value(value: &Value) -> String {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    raw.replace([':', '*', '='], "_")
}
