use serde_json::Value;

use super::person::Person;
use super::snapshot::{ArxivSnapshot, JournalSnapshot};
use super::text::{HtmlString, LatexString};
use crate::document::{scalar, Document, FieldKind, FieldSpec, Node, Result, SchemaDef, TypeRegistry};

pub static PUBLICATION: SchemaDef = SchemaDef {
    name: "Publication",
    tag: Some("Publication"),
    fields: &[
        FieldSpec::new("publication_type", FieldKind::Str),
        FieldSpec::new("ads_bibcode", FieldKind::Str),
        FieldSpec::new("authors", FieldKind::List),
        FieldSpec::new("pacs_codes", FieldKind::List),
        FieldSpec::new("keywords", FieldKind::List),
        FieldSpec::new("title", FieldKind::Document("LatexString")),
        FieldSpec::new("abstract", FieldKind::Document("HTMLString")),
        FieldSpec::new("doi", FieldKind::Str),
        FieldSpec::new("arxiv_entry", FieldKind::Document("ArxivEntry")),
        FieldSpec::new("published_snapshots", FieldKind::List),
    ],
    mixins: &[],
    string_like: false,
};

pub static ARXIV_ENTRY: SchemaDef = SchemaDef {
    name: "ArxivEntry",
    tag: Some("ArxivEntry"),
    fields: &[
        FieldSpec::new("primary_category", FieldKind::Str),
        // Non-primary categories
        FieldSpec::new("categories", FieldKind::List),
        FieldSpec::new("submitter", FieldKind::Document("Person")),
        FieldSpec::new("arxiv_id", FieldKind::Str),
        FieldSpec::new("snapshots", FieldKind::List),
    ],
    mixins: &[],
    string_like: false,
};

/// A paper as assembled from the abstract service and the preprint server
#[derive(Debug, Clone, Default)]
pub struct Publication {
    pub id: Option<Value>,
    pub publication_type: Option<String>,
    pub ads_bibcode: Option<String>,
    /// `[person or alias id, alias]` pairs
    pub authors: Option<Vec<Node>>,
    pub pacs_codes: Option<Vec<Node>>,
    pub keywords: Option<Vec<Node>>,
    pub title: Option<LatexString>,
    pub abstract_text: Option<HtmlString>,
    pub doi: Option<String>,
    pub arxiv_entry: Option<ArxivEntry>,
    pub published_snapshots: Option<Vec<Node>>,
}

impl Publication {
    pub fn new(ads_bibcode: impl Into<String>) -> Self {
        Self {
            ads_bibcode: Some(ads_bibcode.into()),
            ..Self::default()
        }
    }

    /// Store PACS segmentation output: resolved codes and the leftover phrases as keywords
    pub fn add_subjects(&mut self, codes: &[String], keywords: &[String]) {
        extend_unique(self.pacs_codes.get_or_insert_with(Vec::new), codes);
        extend_unique(self.keywords.get_or_insert_with(Vec::new), keywords);
    }

    pub fn add_snapshot<D: Document>(&mut self, snapshot: D) {
        self.published_snapshots
            .get_or_insert_with(Vec::new)
            .push(Node::doc(snapshot));
    }

    /// Journal printings among the published snapshots
    pub fn journal_snapshots(&self) -> impl Iterator<Item = &JournalSnapshot> {
        self.published_snapshots
            .iter()
            .flatten()
            .filter_map(Node::as_document::<JournalSnapshot>)
    }
}

fn extend_unique(list: &mut Vec<Node>, items: &[String]) {
    for item in items {
        if !list.iter().any(|existing| existing.as_str() == Some(item.as_str())) {
            list.push(Node::from(item.as_str()));
        }
    }
}

impl Document for Publication {
    fn schema_def(&self) -> &'static SchemaDef {
        &PUBLICATION
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Value) {
        self.id = Some(id);
    }

    fn dump_field(&self, registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
        match field {
            "publication_type" => Ok(scalar(&self.publication_type)),
            "ads_bibcode" => Ok(scalar(&self.ads_bibcode)),
            "authors" => registry.dump_list(&self.authors),
            "pacs_codes" => registry.dump_list(&self.pacs_codes),
            "keywords" => registry.dump_list(&self.keywords),
            "title" => registry.dump_nested(&self.title),
            "abstract" => registry.dump_nested(&self.abstract_text),
            "doi" => Ok(scalar(&self.doi)),
            "arxiv_entry" => registry.dump_nested(&self.arxiv_entry),
            "published_snapshots" => registry.dump_list(&self.published_snapshots),
            _ => Ok(None),
        }
    }

    fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
        match field {
            "publication_type" => self.publication_type = Some(node.into_string(field)?),
            "ads_bibcode" => self.ads_bibcode = Some(node.into_string(field)?),
            "authors" => self.authors = Some(node.into_list(field)?),
            "pacs_codes" => self.pacs_codes = Some(node.into_list(field)?),
            "keywords" => self.keywords = Some(node.into_list(field)?),
            "title" => self.title = Some(node.into_document(field)?),
            "abstract" => self.abstract_text = Some(node.into_document(field)?),
            "doi" => self.doi = Some(node.into_string(field)?),
            "arxiv_entry" => self.arxiv_entry = Some(node.into_document(field)?),
            "published_snapshots" => self.published_snapshots = Some(node.into_list(field)?),
            _ => {}
        }
        Ok(())
    }
}

/// Preprint-server metadata for a publication
#[derive(Debug, Clone, Default)]
pub struct ArxivEntry {
    pub id: Option<Value>,
    pub primary_category: Option<String>,
    pub categories: Option<Vec<Node>>,
    pub submitter: Option<Person>,
    pub arxiv_id: Option<String>,
    pub snapshots: Option<Vec<Node>>,
}

impl ArxivEntry {
    pub fn new(arxiv_id: impl Into<String>) -> Self {
        Self {
            arxiv_id: Some(arxiv_id.into()),
            ..Self::default()
        }
    }

    /// Set the primary category and the other categories, dropping the primary from the rest
    pub fn set_categories(&mut self, primary: &str, all: &[&str]) {
        self.primary_category = Some(primary.to_string());
        self.categories = Some(
            all.iter()
                .filter(|category| **category != primary)
                .map(|category| Node::from(*category))
                .collect(),
        );
    }

    /// Append a posted version; versions are kept ordered by version number
    pub fn add_version(&mut self, snapshot: ArxivSnapshot) {
        let snapshots = self.snapshots.get_or_insert_with(Vec::new);
        let version = snapshot.version.unwrap_or(i64::MAX);
        let position = snapshots
            .iter()
            .position(|existing| {
                existing
                    .as_document::<ArxivSnapshot>()
                    .and_then(|s| s.version)
                    .is_some_and(|v| v > version)
            })
            .unwrap_or(snapshots.len());
        snapshots.insert(position, Node::doc(snapshot));
    }

    pub fn versions(&self) -> impl Iterator<Item = &ArxivSnapshot> {
        self.snapshots
            .iter()
            .flatten()
            .filter_map(Node::as_document::<ArxivSnapshot>)
    }
}

impl Document for ArxivEntry {
    fn schema_def(&self) -> &'static SchemaDef {
        &ARXIV_ENTRY
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Value) {
        self.id = Some(id);
    }

    fn dump_field(&self, registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
        match field {
            "primary_category" => Ok(scalar(&self.primary_category)),
            "categories" => registry.dump_list(&self.categories),
            "submitter" => registry.dump_nested(&self.submitter),
            "arxiv_id" => Ok(scalar(&self.arxiv_id)),
            "snapshots" => registry.dump_list(&self.snapshots),
            _ => Ok(None),
        }
    }

    fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
        match field {
            "primary_category" => self.primary_category = Some(node.into_string(field)?),
            "categories" => self.categories = Some(node.into_list(field)?),
            "submitter" => self.submitter = Some(node.into_document(field)?),
            "arxiv_id" => self.arxiv_id = Some(node.into_string(field)?),
            "snapshots" => self.snapshots = Some(node.into_list(field)?),
            _ => {}
        }
        Ok(())
    }
}
