//! Per-category redaction counters
//!
//! One accumulator is shared across every redacted field of a pipeline
//! run and never reset mid-run. Accumulators must not be shared across
//! concurrent runs; each call owns its own.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary text used when nothing was redacted.
pub const NO_REDACTIONS_SUMMARY: &str = "no redactions";

/// Ordered category → count map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedactionCounts(BTreeMap<String, u64>);

impl RedactionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one redaction under a category.
    pub fn increment(&mut self, category: &str) {
        *self.0.entry(category.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, category: &str) -> u64 {
        self.0.get(category).copied().unwrap_or(0)
    }

    /// Sum over all categories.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Categories with at least one redaction.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Human-readable audit line: `"CARD:1, EMAIL:2"`, or the fixed
    /// sentinel when nothing was redacted.
    pub fn summary(&self) -> String {
        if self.0.is_empty() {
            return NO_REDACTIONS_SUMMARY.to_string();
        }
        self.0
            .iter()
            .map(|(category, count)| format!("{category}:{count}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
