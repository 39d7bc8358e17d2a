use std::fmt;

use serde_json::Value;

use super::text::{HtmlString, LatexString};
use crate::document::{scalar, Document, DocumentError, FieldKind, FieldSpec, Node, Result, SchemaDef, TypeRegistry};

pub static NAME: SchemaDef = SchemaDef {
    name: "Name",
    tag: Some("Name"),
    fields: &[
        FieldSpec::new("names", FieldKind::List),
        FieldSpec::new("last", FieldKind::Document("LatexString")),
        FieldSpec::new("lineage", FieldKind::Str),
    ],
    mixins: &[],
    string_like: false,
};

/// A personal name split for abbreviation-tolerant comparison.
///
/// A surname must always be present; the given names may be empty.
#[derive(Debug, Clone, Default)]
pub struct Name {
    pub id: Option<Value>,
    pub names: Option<Vec<String>>,
    pub last: Option<LatexString>,
    pub lineage: Option<String>,
}

impl Name {
    pub fn new<S: Into<String>>(given: Vec<S>, last: impl Into<String>) -> Self {
        Self {
            id: None,
            names: Some(given.into_iter().map(Into::into).collect()),
            last: Some(LatexString::new(last)),
            lineage: None,
        }
    }

    pub fn with_lineage(mut self, lineage: impl Into<String>) -> Self {
        self.lineage = Some(lineage.into());
        self
    }

    /// Parse the "Last, Given Given[, Lineage]" form author listings use,
    /// e.g. `Kozlenko, D. P.` or `Smith, John, Jr.`.
    ///
    /// Returns `None` when there is no surname.
    pub fn parse_listing(listing: &str) -> Option<Self> {
        let cleaned = listing.replace("&#160;", " ").replace('\u{a0}', " ");
        let mut parts = cleaned.split(',').map(str::trim);

        let last = parts.next().filter(|last| !last.is_empty())?;
        let given: Vec<&str> = parts
            .next()
            .map(|given| given.split_whitespace().collect())
            .unwrap_or_default();
        let mut name = Name::new(given, last);
        if let Some(lineage) = parts.next().filter(|lineage| !lineage.is_empty()) {
            name.lineage = Some(lineage.to_string());
        }
        Some(name)
    }

    pub fn given(&self) -> &[String] {
        self.names.as_deref().unwrap_or(&[])
    }

    pub fn surname(&self) -> &str {
        self.last.as_ref().map(LatexString::as_str).unwrap_or("")
    }

    pub fn lineage(&self) -> Option<&str> {
        self.lineage.as_deref()
    }

    /// Given names followed by the surname
    pub fn full_name(&self) -> String {
        let mut parts: Vec<&str> = self.given().iter().map(String::as_str).collect();
        parts.push(self.surname());
        let full = parts.join(" ");
        match self.lineage() {
            Some(lineage) => format!("{}, {}", full, lineage),
            None => full,
        }
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.surname() == other.surname()
            && self.given() == other.given()
            && self.lineage() == other.lineage()
    }
}

impl Eq for Name {}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// A given name stored either as a bare string or as a typed string document
fn given_name(node: Node, field: &str) -> Result<String> {
    if let Some(text) = node.as_document::<LatexString>() {
        return Ok(text.as_str().to_string());
    }
    if let Some(text) = node.as_document::<HtmlString>() {
        return Ok(text.as_str().to_string());
    }
    node.into_string(field)
        .map_err(|_| DocumentError::invalid_field(field, "list of strings"))
}

impl Document for Name {
    fn schema_def(&self) -> &'static SchemaDef {
        &NAME
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Value) {
        self.id = Some(id);
    }

    fn dump_field(&self, registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
        match field {
            "names" => Ok(self
                .names
                .as_ref()
                .map(|names| Value::Array(names.iter().cloned().map(Value::String).collect()))),
            "last" => registry.dump_nested(&self.last),
            "lineage" => Ok(scalar(&self.lineage)),
            _ => Ok(None),
        }
    }

    fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
        match field {
            "names" => {
                self.names = Some(
                    node.into_list(field)?
                        .into_iter()
                        .map(|item| given_name(item, field))
                        .collect::<Result<Vec<_>>>()?,
                )
            }
            "last" => self.last = Some(node.into_document(field)?),
            "lineage" => self.lineage = Some(node.into_string(field)?),
            _ => {}
        }
        Ok(())
    }
}
