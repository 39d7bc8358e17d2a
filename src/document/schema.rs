use std::collections::{HashMap, HashSet};
use std::ptr;

use super::error::{DocumentError, Result};

/// Declared type of a document field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Int,
    Bool,
    /// Heterogeneous sequence; elements carry their own `_type` when they are documents
    List,
    /// Nested document of the type registered under this tag
    Document(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Static declaration of a document type: its own fields plus the schemas it mixes in.
///
/// Abstract schemas (used only as mixins) have no tag.
#[derive(Debug)]
pub struct SchemaDef {
    pub name: &'static str,
    pub tag: Option<&'static str>,
    pub fields: &'static [FieldSpec],
    pub mixins: &'static [&'static SchemaDef],
    /// Dumps to a bare string rather than a tagged mapping
    pub string_like: bool,
}

/// A schema with its mixins flattened into one field list
#[derive(Debug, Clone)]
pub struct Schema {
    name: &'static str,
    tag: Option<&'static str>,
    fields: Vec<FieldSpec>,
    string_like: bool,
}

impl Schema {
    /// Flatten a declaration: own fields first, then each mixin depth-first.
    ///
    /// A mixin reachable along several paths contributes its fields once. Any
    /// field name seen twice is a schema definition error, as are two distinct
    /// declarations sharing a name. The schema is string-like when any
    /// declaration in the mixin graph is.
    pub fn flatten(def: &'static SchemaDef) -> Result<Self> {
        let mut walk = Walk {
            root: def,
            fields: Vec::new(),
            names: HashSet::new(),
            visited: HashMap::new(),
            string_like: false,
        };
        walk.collect(def)?;

        Ok(Self {
            name: def.name,
            tag: def.tag,
            fields: walk.fields,
            string_like: walk.string_like,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tag(&self) -> Option<&'static str> {
        self.tag
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn is_string_like(&self) -> bool {
        self.string_like
    }
}

struct Walk {
    root: &'static SchemaDef,
    fields: Vec<FieldSpec>,
    names: HashSet<&'static str>,
    /// Declarations already flattened, by name
    visited: HashMap<&'static str, &'static SchemaDef>,
    string_like: bool,
}

impl Walk {
    fn collect(&mut self, def: &'static SchemaDef) -> Result<()> {
        match self.visited.get(def.name) {
            Some(seen) if ptr::eq(*seen, def) => return Ok(()),
            Some(_) => {
                return Err(DocumentError::SchemaDefinition {
                    type_name: self.root.name.to_string(),
                    field: def.name.to_string(),
                })
            }
            None => {
                self.visited.insert(def.name, def);
            }
        }
        self.string_like |= def.string_like;

        for field in def.fields {
            if !self.names.insert(field.name) {
                return Err(DocumentError::SchemaDefinition {
                    type_name: self.root.name.to_string(),
                    field: field.name.to_string(),
                });
            }
            self.fields.push(*field);
        }

        for mixin in def.mixins {
            self.collect(mixin)?;
        }

        Ok(())
    }
}
