use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::Value;

/// Canonical PACS phrase → code lookup, read-only once built
#[derive(Debug, Clone, Default)]
pub struct PacsVocabulary {
    codes: HashMap<String, String>,
}

impl PacsVocabulary {
    /// Build from the PACS tree shape: `{"42.50": {"name": "Quantum optics"}, ...}`.
    /// Nodes without a string `name` are skipped.
    pub fn from_tree(tree: &Value) -> Result<Self> {
        let nodes = tree
            .as_object()
            .context("PACS vocabulary must be an object keyed by code")?;

        let mut codes = HashMap::with_capacity(nodes.len());
        let mut skipped = 0usize;
        for (code, node) in nodes {
            match node.get("name").and_then(Value::as_str) {
                Some(name) => {
                    codes.insert(name.to_string(), code.clone());
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("Skipped {} PACS nodes without a name", skipped);
        }
        Ok(Self { codes })
    }

    pub fn from_pairs<I, N, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        Self {
            codes: pairs
                .into_iter()
                .map(|(name, code)| (name.into(), code.into()))
                .collect(),
        }
    }

    /// Read a vocabulary file in the tree shape
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read PACS vocabulary: {}", path.display()))?;
        let tree: Value = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse PACS vocabulary: {}", path.display()))?;
        let vocabulary = Self::from_tree(&tree)?;
        if vocabulary.is_empty() {
            warn!("PACS vocabulary {} has no named entries", path.display());
        }
        Ok(vocabulary)
    }

    pub fn code_for(&self, phrase: &str) -> Option<&str> {
        self.codes.get(phrase).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
