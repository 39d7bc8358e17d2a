//! The record types stored for people and publications.
//!
//! Every concrete type is registered by [`build_registry`]; [`registry`]
//! hands out the process-wide table, built on first use.

pub mod history;
pub mod name;
pub mod person;
pub mod publication;
pub mod snapshot;
pub mod text;

pub use history::{HistoricalEntry, HistoricalProperty};
pub use name::Name;
pub use person::{Alias, Person, PersonLink};
pub use publication::{ArxivEntry, Publication};
pub use snapshot::{ArxivSnapshot, JournalSnapshot, MonthYear, Snapshot, SnapshotCore};
pub use text::{HtmlString, LatexString};

use lazy_static::lazy_static;
use log::debug;
use serde_json::Value;

use crate::document::{Node, Result, TypeRegistry};

lazy_static! {
    static ref REGISTRY: TypeRegistry =
        build_registry().expect("built-in document types must register cleanly");
}

/// Register every catalog type and check that nested field types resolve
pub fn build_registry() -> Result<TypeRegistry> {
    let mut registry = TypeRegistry::new();

    registry.register(&text::LATEX_STRING, || Box::new(LatexString::default()))?;
    registry.register(&text::HTML_STRING, || Box::new(HtmlString::default()))?;
    registry.register(&name::NAME, || Box::new(Name::default()))?;
    registry.register(&snapshot::MONTH_YEAR, || Box::new(MonthYear::default()))?;
    registry.register(&history::HISTORICAL_PROPERTY, || {
        Box::new(HistoricalProperty::default())
    })?;
    registry.register(&person::PERSON, || Box::new(Person::default()))?;
    registry.register(&person::ALIAS, || Box::new(Alias::default()))?;
    registry.register(&snapshot::SNAPSHOT, || Box::new(Snapshot::default()))?;
    registry.register(&snapshot::JOURNAL_SNAPSHOT, || {
        Box::new(JournalSnapshot::default())
    })?;
    registry.register(&snapshot::ARXIV_SNAPSHOT, || Box::new(ArxivSnapshot::default()))?;
    registry.register(&publication::ARXIV_ENTRY, || Box::new(ArxivEntry::default()))?;
    registry.register(&publication::PUBLICATION, || Box::new(Publication::default()))?;

    registry.validate()?;
    debug!("Document registry ready: {} types", registry.len());
    Ok(registry)
}

pub fn registry() -> &'static TypeRegistry {
    &REGISTRY
}

/// Plain form of any loaded tree, using the shared registry
pub fn dump(node: &Node) -> Result<Value> {
    registry().dump(node)
}

/// Rebuild typed documents from a plain value, using the shared registry
pub fn load(value: &Value) -> Result<Node> {
    registry().load(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentError;
    use serde_json::json;

    #[test]
    fn test_every_catalog_type_is_registered() {
        assert_eq!(
            registry().tags(),
            vec![
                "Alias",
                "ArxivEntry",
                "ArxivSnapshot",
                "HTMLString",
                "HistoricalProperty",
                "JournalSnapshot",
                "LatexString",
                "MonthYear",
                "Name",
                "Person",
                "Publication",
                "Snapshot",
            ]
        );
    }

    #[test]
    fn test_fresh_registry_matches_shared_one() {
        let fresh = build_registry().unwrap();
        assert_eq!(fresh.tags(), registry().tags());
    }

    #[test]
    fn test_round_trip_of_plain_structure() {
        let value = json!({
            "_type": "Publication",
            "_id": "pub-1",
            "title": "On $\\alpha$",
            "authors": [["p1", "a1"], ["p2", "a2"]],
            "published_snapshots": [
                {"_type": "JournalSnapshot", "journal": "PRL", "date": {"_type": "MonthYear", "year": 2001, "month": 2}}
            ],
            "arxiv_entry": {"_type": "ArxivEntry", "arxiv_id": "0101.0001", "categories": []},
        });
        let once = dump(&load(&value).unwrap()).unwrap();
        let twice = dump(&load(&once).unwrap()).unwrap();
        assert_eq!(once, value);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_loaded_tags_match_declared_tags() {
        let loaded = load(&json!([
            {"_type": "ArxivSnapshot", "version": 1},
            {"_type": "Person", "display_name": "E. Noether"},
        ]))
        .unwrap();
        let tags: Vec<_> = loaded.as_list().unwrap().iter().filter_map(Node::type_tag).collect();
        assert_eq!(tags, vec!["ArxivSnapshot", "Person"]);
    }

    #[test]
    fn test_dump_includes_mixed_in_fields() {
        let mut snapshot = ArxivSnapshot::new(4, MonthYear::new(2012, 6));
        snapshot.core.versions = Some(vec![Node::from("v1")]);
        let dumped = dump(&Node::doc(snapshot)).unwrap();
        let keys: Vec<_> = dumped.as_object().unwrap().keys().cloned().collect();
        for key in ["_type", "date", "versions", "version"] {
            assert!(keys.iter().any(|k| k == key), "missing {}", key);
        }
    }

    #[test]
    fn test_unknown_tag_anywhere_fails_the_load() {
        let err = load(&json!({"outer": [{"_type": "Journal"}]})).unwrap_err();
        assert!(matches!(err, DocumentError::UnknownType { ref tag } if tag == "Journal"));
    }
}
