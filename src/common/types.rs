use std::collections::BTreeMap;

use serde::Serialize;

/// Statistics from the check step
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckStats {
    pub total_documents: usize,
    pub round_tripped: usize,
    /// Loaded, but dumping again gave a different structure
    pub changed: usize,
    pub failed: usize,
    /// Top-level `_type` → count, over documents that loaded
    pub by_type: BTreeMap<String, usize>,
}

impl CheckStats {
    pub fn record_type(&mut self, tag: &str) {
        *self.by_type.entry(tag.to_string()).or_insert(0) += 1;
    }
}

/// Statistics from segmenting a batch of keyword strings
#[derive(Debug, Clone, Default, Serialize)]
pub struct SegmentStats {
    pub total_strings: usize,
    pub fully_resolved: usize,
    pub codes_found: usize,
    pub leftover_phrases: usize,
}
