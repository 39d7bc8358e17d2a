//! Storage for dumped documents.
//!
//! Stores hold plain structures only; typing them is the registry's job.
//! Lookups are by `_id` or by field equality, where a filter key may be a
//! dotted path into nested mappings (`"name.last"`).

pub mod alias;
pub mod jsonl;

pub use alias::{resolve_alias, AliasCandidate, AliasResolution};
pub use jsonl::JsonlStore;

use serde_json::Value;

use crate::document::Result;

pub trait DocumentStore {
    /// Store a dumped document, assigning an `_id` when it has none; returns the id
    fn insert(&mut self, document: Value) -> Result<Value>;

    fn get(&self, id: &Value) -> Option<&Value>;

    /// All documents whose value at `path` equals `expected`
    fn find(&self, path: &str, expected: &Value) -> Vec<&Value>;

    /// First document matching every entry of `filter`
    fn find_one(&self, filter: &Value) -> Option<&Value>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Follow a dotted path through nested mappings
pub fn lookup_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, key| current.as_object()?.get(key))
}

/// Does `document` agree with every key of `filter`?
///
/// A non-object filter matches nothing; an empty object matches everything.
pub fn matches_filter(document: &Value, filter: &Value) -> bool {
    match filter.as_object() {
        Some(entries) => entries
            .iter()
            .all(|(path, expected)| lookup_path(document, path) == Some(expected)),
        None => false,
    }
}
