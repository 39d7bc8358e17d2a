//! Dated versions of a publication: the journal printing and each arXiv posting.

use serde_json::Value;

use crate::document::{scalar, Document, FieldKind, FieldSpec, Node, Result, SchemaDef, TypeRegistry};

pub static MONTH_YEAR: SchemaDef = SchemaDef {
    name: "MonthYear",
    tag: Some("MonthYear"),
    fields: &[
        FieldSpec::new("year", FieldKind::Int),
        FieldSpec::new("month", FieldKind::Int),
    ],
    mixins: &[],
    string_like: false,
};

pub static SNAPSHOT: SchemaDef = SchemaDef {
    name: "Snapshot",
    tag: Some("Snapshot"),
    fields: &[
        FieldSpec::new("date", FieldKind::Document("MonthYear")),
        FieldSpec::new("versions", FieldKind::List),
    ],
    mixins: &[],
    string_like: false,
};

pub static JOURNAL_SNAPSHOT: SchemaDef = SchemaDef {
    name: "JournalSnapshot",
    tag: Some("JournalSnapshot"),
    fields: &[
        FieldSpec::new("journal", FieldKind::Str),
        FieldSpec::new("volume", FieldKind::Str),
        FieldSpec::new("number", FieldKind::Str),
        FieldSpec::new("pages", FieldKind::Str),
    ],
    mixins: &[&SNAPSHOT],
    string_like: false,
};

pub static ARXIV_SNAPSHOT: SchemaDef = SchemaDef {
    name: "ArxivSnapshot",
    tag: Some("ArxivSnapshot"),
    fields: &[
        FieldSpec::new("comment", FieldKind::Str),
        FieldSpec::new("version", FieldKind::Int),
    ],
    mixins: &[&SNAPSHOT],
    string_like: false,
};

/// Month-resolution date, as bibliographic records give it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthYear {
    pub id: Option<Value>,
    pub year: Option<i64>,
    pub month: Option<i64>,
}

impl MonthYear {
    pub fn new(year: i64, month: i64) -> Self {
        Self {
            id: None,
            year: Some(year),
            month: Some(month),
        }
    }
}

impl Document for MonthYear {
    fn schema_def(&self) -> &'static SchemaDef {
        &MONTH_YEAR
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Value) {
        self.id = Some(id);
    }

    fn dump_field(&self, _registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
        Ok(match field {
            "year" => scalar(&self.year),
            "month" => scalar(&self.month),
            _ => None,
        })
    }

    fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
        match field {
            "year" => self.year = Some(node.into_int(field)?),
            "month" => self.month = Some(node.into_int(field)?),
            _ => {}
        }
        Ok(())
    }
}

/// Fields every snapshot variant carries
#[derive(Debug, Clone, Default)]
pub struct SnapshotCore {
    pub date: Option<MonthYear>,
    pub versions: Option<Vec<Node>>,
}

impl SnapshotCore {
    fn dump_field(&self, registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
        match field {
            "date" => registry.dump_nested(&self.date),
            "versions" => registry.dump_list(&self.versions),
            _ => Ok(None),
        }
    }

    fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
        match field {
            "date" => self.date = Some(node.into_document(field)?),
            "versions" => self.versions = Some(node.into_list(field)?),
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub id: Option<Value>,
    pub core: SnapshotCore,
}

#[derive(Debug, Clone, Default)]
pub struct JournalSnapshot {
    pub id: Option<Value>,
    pub core: SnapshotCore,
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub number: Option<String>,
    pub pages: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ArxivSnapshot {
    pub id: Option<Value>,
    pub core: SnapshotCore,
    pub comment: Option<String>,
    pub version: Option<i64>,
}

impl Snapshot {
    pub fn dated(date: MonthYear) -> Self {
        Self {
            id: None,
            core: SnapshotCore {
                date: Some(date),
                versions: None,
            },
        }
    }
}

impl JournalSnapshot {
    pub fn dated(date: MonthYear) -> Self {
        Self {
            core: SnapshotCore {
                date: Some(date),
                versions: None,
            },
            ..Self::default()
        }
    }

    /// Field names that share their name with a BibTeX entry key
    pub fn bibtex_names() -> Vec<&'static str> {
        JOURNAL_SNAPSHOT.fields.iter().map(|f| f.name).collect()
    }

    /// Fill the journal fields from a BibTeX-style key lookup; absent keys stay unset
    pub fn fill_from<'a, F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let owned = |key: &str| lookup(key).map(str::to_string);
        self.journal = owned("journal").or(self.journal.take());
        self.volume = owned("volume").or(self.volume.take());
        self.number = owned("number").or(self.number.take());
        self.pages = owned("pages").or(self.pages.take());
    }
}

impl ArxivSnapshot {
    pub fn new(version: i64, date: MonthYear) -> Self {
        Self {
            core: SnapshotCore {
                date: Some(date),
                versions: None,
            },
            version: Some(version),
            ..Self::default()
        }
    }
}

impl Document for Snapshot {
    fn schema_def(&self) -> &'static SchemaDef {
        &SNAPSHOT
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Value) {
        self.id = Some(id);
    }

    fn dump_field(&self, registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
        self.core.dump_field(registry, field)
    }

    fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
        self.core.load_field(field, node)
    }
}

impl Document for JournalSnapshot {
    fn schema_def(&self) -> &'static SchemaDef {
        &JOURNAL_SNAPSHOT
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Value) {
        self.id = Some(id);
    }

    fn dump_field(&self, registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
        match field {
            "journal" => Ok(scalar(&self.journal)),
            "volume" => Ok(scalar(&self.volume)),
            "number" => Ok(scalar(&self.number)),
            "pages" => Ok(scalar(&self.pages)),
            _ => self.core.dump_field(registry, field),
        }
    }

    fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
        match field {
            "journal" => self.journal = Some(node.into_string(field)?),
            "volume" => self.volume = Some(node.into_string(field)?),
            "number" => self.number = Some(node.into_string(field)?),
            "pages" => self.pages = Some(node.into_string(field)?),
            _ => return self.core.load_field(field, node),
        }
        Ok(())
    }
}

impl Document for ArxivSnapshot {
    fn schema_def(&self) -> &'static SchemaDef {
        &ARXIV_SNAPSHOT
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Value) {
        self.id = Some(id);
    }

    fn dump_field(&self, registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
        match field {
            "comment" => Ok(scalar(&self.comment)),
            "version" => Ok(scalar(&self.version)),
            _ => self.core.dump_field(registry, field),
        }
    }

    fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
        match field {
            "comment" => self.comment = Some(node.into_string(field)?),
            "version" => self.version = Some(node.into_int(field)?),
            _ => return self.core.load_field(field, node),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::registry;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_journal_snapshot_aggregates_snapshot_fields() {
        let schema = registry().schema("JournalSnapshot").unwrap();
        let mut names = schema.field_names();
        names.sort_unstable();
        assert_eq!(
            names,
            vec!["date", "journal", "number", "pages", "versions", "volume"]
        );
    }

    #[test]
    fn test_journal_snapshot_dump() {
        let mut snapshot = JournalSnapshot::dated(MonthYear::new(2008, 3));
        snapshot.journal = Some("Phys. Rev. Lett.".to_string());
        snapshot.volume = Some("100".to_string());
        snapshot.pages = Some("093601".to_string());

        let dumped = registry().dump(&Node::doc(snapshot)).unwrap();
        assert_eq!(
            dumped,
            json!({
                "_type": "JournalSnapshot",
                "date": {"_type": "MonthYear", "year": 2008, "month": 3},
                "journal": "Phys. Rev. Lett.",
                "volume": "100",
                "pages": "093601",
            })
        );
    }

    #[test]
    fn test_arxiv_snapshot_round_trip() {
        let registry = registry();
        let mut snapshot = ArxivSnapshot::new(2, MonthYear::new(2011, 7));
        snapshot.comment = Some("5 pages, 3 figures".to_string());
        let dumped = registry.dump(&Node::doc(snapshot)).unwrap();

        let loaded: ArxivSnapshot = registry.load_as(&dumped).unwrap();
        assert_eq!(loaded.version, Some(2));
        assert_eq!(loaded.core.date, Some(MonthYear::new(2011, 7)));
        assert_eq!(registry.dump(&Node::doc(loaded)).unwrap(), dumped);
    }

    #[test]
    fn test_untagged_date_loads_as_month_year() {
        let snapshot: Snapshot = registry()
            .load_as(&json!({"_type": "Snapshot", "date": {"year": 1995, "month": 12}}))
            .unwrap();
        assert_eq!(snapshot.core.date, Some(MonthYear::new(1995, 12)));
    }

    #[test]
    fn test_bibtex_names_are_own_fields() {
        assert_eq!(
            JournalSnapshot::bibtex_names(),
            vec!["journal", "volume", "number", "pages"]
        );
    }

    #[test]
    fn test_fill_from_bibtex_lookup() {
        let entry: HashMap<&str, &str> =
            [("journal", "Nature"), ("pages", "1--4")].into_iter().collect();
        let mut snapshot = JournalSnapshot::default();
        snapshot.volume = Some("7".to_string());
        snapshot.fill_from(|key| entry.get(key).copied());

        assert_eq!(snapshot.journal.as_deref(), Some("Nature"));
        assert_eq!(snapshot.volume.as_deref(), Some("7"));
        assert!(snapshot.number.is_none());
        assert_eq!(snapshot.pages.as_deref(), Some("1--4"));
    }
}
