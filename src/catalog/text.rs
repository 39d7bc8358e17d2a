//! Strings tagged with the markup dialect they are written in.
//!
//! Both variants dump to the bare string and load back from it, so a title or
//! abstract reads as plain text in the stored document.

use std::fmt;

use serde_json::Value;

use crate::document::{scalar, Document, FieldKind, FieldSpec, Node, Result, SchemaDef, TypeRegistry};

pub static TYPED_STRING: SchemaDef = SchemaDef {
    name: "TypedString",
    tag: None,
    fields: &[FieldSpec::new("contents", FieldKind::Str)],
    mixins: &[],
    string_like: true,
};

pub static LATEX_STRING: SchemaDef = SchemaDef {
    name: "LatexString",
    tag: Some("LatexString"),
    fields: &[],
    mixins: &[&TYPED_STRING],
    string_like: true,
};

pub static HTML_STRING: SchemaDef = SchemaDef {
    name: "HTMLString",
    tag: Some("HTMLString"),
    fields: &[],
    mixins: &[&TYPED_STRING],
    string_like: true,
};

/// LaTeX-flavoured text, e.g. a title with inline math
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatexString {
    pub id: Option<Value>,
    pub contents: Option<String>,
}

/// HTML-flavoured text, e.g. an abstract with sub/superscript markup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlString {
    pub id: Option<Value>,
    pub contents: Option<String>,
}

impl LatexString {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            id: None,
            contents: Some(contents.into()),
        }
    }

    /// The text, empty when unset
    pub fn as_str(&self) -> &str {
        self.contents.as_deref().unwrap_or("")
    }
}

impl HtmlString {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            id: None,
            contents: Some(contents.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        self.contents.as_deref().unwrap_or("")
    }
}

impl fmt::Display for LatexString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for HtmlString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn load_contents(contents: &mut Option<String>, field: &str, node: Node) -> Result<()> {
    if field == "contents" {
        *contents = Some(node.into_string(field)?);
    }
    Ok(())
}

impl Document for LatexString {
    fn schema_def(&self) -> &'static SchemaDef {
        &LATEX_STRING
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Value) {
        self.id = Some(id);
    }

    fn dump_field(&self, _registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
        Ok(match field {
            "contents" => scalar(&self.contents),
            _ => None,
        })
    }

    fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
        load_contents(&mut self.contents, field, node)
    }
}

impl Document for HtmlString {
    fn schema_def(&self) -> &'static SchemaDef {
        &HTML_STRING
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Value) {
        self.id = Some(id);
    }

    fn dump_field(&self, _registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
        Ok(match field {
            "contents" => scalar(&self.contents),
            _ => None,
        })
    }

    fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
        load_contents(&mut self.contents, field, node)
    }
}
