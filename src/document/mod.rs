//! Typed documents and their plain (JSON) representation.
//!
//! A document type declares its own fields in a static [`SchemaDef`] and mixes
//! in the schemas of the types it extends. The [`TypeRegistry`] flattens those
//! declarations once, at registration, and then drives both directions:
//! `dump` turns a [`Node`] tree into a `serde_json::Value`, and `load` rebuilds
//! typed documents from any mapping carrying a `_type` tag.

pub mod error;
pub mod node;
pub mod registry;
pub mod schema;

pub use error::{DocumentError, Result};
pub use node::Node;
pub use registry::TypeRegistry;
pub use schema::{FieldKind, FieldSpec, Schema, SchemaDef};

use std::any::Any;
use std::fmt;

use serde_json::{Map, Value};

/// Reserved key carrying a document's registered tag
pub const TYPE_KEY: &str = "_type";

/// Reserved key carrying a storage-assigned identifier
pub const ID_KEY: &str = "_id";

/// A record type that takes part in dump/load.
///
/// Implementors expose their fields by name; the registry decides which names
/// exist (own plus mixed-in fields) and in which order they are written.
pub trait Document: DocumentBase + fmt::Debug + Send + Sync + 'static {
    fn schema_def(&self) -> &'static SchemaDef;

    fn type_tag(&self) -> &'static str {
        let def = self.schema_def();
        def.tag.unwrap_or(def.name)
    }

    fn id(&self) -> Option<&Value>;

    fn set_id(&mut self, id: Value);

    /// Plain form of one field, or `None` while the field is unset
    fn dump_field(&self, registry: &TypeRegistry, field: &str) -> Result<Option<Value>>;

    /// Assign a loaded value to one field
    fn load_field(&mut self, field: &str, node: Node) -> Result<()>;

    /// Tagged mapping with one entry per set field.
    ///
    /// String-like schemas are written as the bare string of their single field.
    fn dump(&self, registry: &TypeRegistry) -> Result<Value> {
        let schema = registry.schema(self.type_tag())?;

        if schema.is_string_like() {
            let text = match schema.fields().first() {
                Some(field) => self.dump_field(registry, field.name)?,
                None => None,
            };
            return Ok(text.unwrap_or_else(|| Value::String(String::new())));
        }

        let mut out = Map::new();
        out.insert(TYPE_KEY.to_string(), Value::String(self.type_tag().to_string()));
        if let Some(id) = self.id() {
            out.insert(ID_KEY.to_string(), id.clone());
        }
        for field in schema.fields() {
            if let Some(value) = self.dump_field(registry, field.name)? {
                out.insert(field.name.to_string(), value);
            }
        }
        Ok(Value::Object(out))
    }
}

/// Object-safe plumbing every `Document` gets for free
pub trait DocumentBase {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn clone_box(&self) -> Box<dyn Document>;
}

impl<T: Document + Clone> DocumentBase for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_box(&self) -> Box<dyn Document> {
        Box::new(self.clone())
    }
}

/// Plain form of an optional scalar field
pub fn scalar<T: Clone + Into<Value>>(value: &Option<T>) -> Option<Value> {
    value.clone().map(Into::into)
}
