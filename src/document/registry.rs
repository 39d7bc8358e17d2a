use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use log::debug;
use serde_json::{Map, Value};

use super::error::{DocumentError, Result};
use super::schema::{FieldKind, Schema, SchemaDef};
use super::{Document, Node, ID_KEY, TYPE_KEY};

/// Builds an empty instance of a registered type
pub type Constructor = fn() -> Box<dyn Document>;

#[derive(Debug)]
struct TypeEntry {
    schema: Schema,
    construct: Constructor,
}

/// Tag → type table used by load, and the flattened schemas used by dump.
///
/// Built once before any document is loaded and read-only afterwards.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: HashMap<&'static str, TypeEntry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a concrete type under its declared tag.
    ///
    /// # Errors
    ///
    /// Fails when the declaration has no tag, collides with a registered tag,
    /// repeats a field across its mixins, or is string-like without exactly one
    /// string field.
    pub fn register(&mut self, def: &'static SchemaDef, construct: Constructor) -> Result<()> {
        let tag = def.tag.ok_or_else(|| DocumentError::SchemaDefinition {
            type_name: def.name.to_string(),
            field: TYPE_KEY.to_string(),
        })?;
        let schema = Schema::flatten(def)?;

        if schema.is_string_like()
            && !matches!(schema.fields(), [field] if field.kind == FieldKind::Str)
        {
            return Err(DocumentError::SchemaDefinition {
                type_name: def.name.to_string(),
                field: schema.field_names().join(","),
            });
        }

        match self.entries.entry(tag) {
            Entry::Occupied(_) => Err(DocumentError::DuplicateTag(tag.to_string())),
            Entry::Vacant(slot) => {
                debug!("Registered document type {} with {} fields", tag, schema.fields().len());
                slot.insert(TypeEntry { schema, construct });
                Ok(())
            }
        }
    }

    /// Check that every nested document field names a registered tag
    pub fn validate(&self) -> Result<()> {
        for entry in self.entries.values() {
            for field in entry.schema.fields() {
                if let FieldKind::Document(tag) = field.kind {
                    if !self.entries.contains_key(tag) {
                        return Err(DocumentError::UnknownType { tag: tag.to_string() });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.entries.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn schema(&self, tag: &str) -> Result<&Schema> {
        self.entry(tag).map(|entry| &entry.schema)
    }

    fn entry(&self, tag: &str) -> Result<&TypeEntry> {
        self.entries
            .get(tag)
            .ok_or_else(|| DocumentError::UnknownType { tag: tag.to_string() })
    }

    /// Turn a loaded tree back into its plain form
    pub fn dump(&self, node: &Node) -> Result<Value> {
        match node {
            Node::Plain(value) => Ok(value.clone()),
            Node::List(items) => items
                .iter()
                .map(|item| self.dump(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Node::Map(map) => {
                let mut out = Map::new();
                for (key, value) in map {
                    out.insert(key.clone(), self.dump(value)?);
                }
                Ok(Value::Object(out))
            }
            Node::Doc(doc) => doc.dump(self),
        }
    }

    pub fn dump_document(&self, doc: &dyn Document) -> Result<Value> {
        doc.dump(self)
    }

    /// Plain form of an optional list field
    pub fn dump_list(&self, items: &Option<Vec<Node>>) -> Result<Option<Value>> {
        items
            .as_ref()
            .map(|items| {
                items
                    .iter()
                    .map(|item| self.dump(item))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            })
            .transpose()
    }

    /// Plain form of an optional nested document field
    pub fn dump_nested<D: Document>(&self, doc: &Option<D>) -> Result<Option<Value>> {
        doc.as_ref().map(|doc| doc.dump(self)).transpose()
    }

    /// Expand a plain value, rebuilding every tagged mapping into its registered type.
    ///
    /// # Errors
    ///
    /// `UnknownType` for a tag nobody registered; the whole load fails rather
    /// than substituting a placeholder.
    pub fn load(&self, value: &Value) -> Result<Node> {
        match value {
            Value::Object(map) => match map.get(TYPE_KEY) {
                Some(Value::String(tag)) => self.construct(tag, map).map(Node::Doc),
                Some(_) => Err(DocumentError::MissingTypeTag),
                None => {
                    let mut out = BTreeMap::new();
                    for (key, item) in map {
                        out.insert(key.clone(), self.load(item)?);
                    }
                    Ok(Node::Map(out))
                }
            },
            Value::Array(items) => items
                .iter()
                .map(|item| self.load(item))
                .collect::<Result<Vec<_>>>()
                .map(Node::List),
            other => Ok(Node::Plain(other.clone())),
        }
    }

    /// Load a document and take it out as its concrete type
    pub fn load_as<D: Document>(&self, value: &Value) -> Result<D> {
        self.load(value)?.into_document::<D>(TYPE_KEY)
    }

    /// Build an instance of `tag` from a mapping.
    ///
    /// Fields missing from the mapping, or null in it, stay unset. The `_id`
    /// entry is kept whatever the schema declares.
    pub fn construct(&self, tag: &str, map: &Map<String, Value>) -> Result<Box<dyn Document>> {
        let entry = self.entry(tag)?;
        let mut doc = (entry.construct)();

        if let Some(id) = map.get(ID_KEY).filter(|id| !id.is_null()) {
            doc.set_id(id.clone());
        }

        for field in entry.schema.fields() {
            let value = match map.get(field.name) {
                Some(value) if !value.is_null() => value,
                _ => continue,
            };
            let node = self.load_field_value(field.kind, value)?;
            doc.load_field(field.name, node)?;
        }

        Ok(doc)
    }

    /// Load a value sitting in a field of the given kind.
    ///
    /// A bare string in a string-like document field becomes that document, and
    /// an untagged mapping in a document field is built as the declared type.
    fn load_field_value(&self, kind: FieldKind, value: &Value) -> Result<Node> {
        if let FieldKind::Document(tag) = kind {
            let entry = self.entry(tag)?;
            match value {
                Value::String(text) if entry.schema.is_string_like() => {
                    let mut doc = (entry.construct)();
                    if let Some(field) = entry.schema.fields().first() {
                        doc.load_field(field.name, Node::from(text.as_str()))?;
                    }
                    return Ok(Node::Doc(doc));
                }
                Value::Object(map) if !map.contains_key(TYPE_KEY) => {
                    return self.construct(tag, map).map(Node::Doc);
                }
                _ => {}
            }
        }
        self.load(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{scalar, FieldSpec};
    use serde_json::json;

    static LABEL: SchemaDef = SchemaDef {
        name: "Label",
        tag: Some("Label"),
        fields: &[FieldSpec::new("text", FieldKind::Str)],
        mixins: &[],
        string_like: true,
    };

    static BASE: SchemaDef = SchemaDef {
        name: "Base",
        tag: None,
        fields: &[
            FieldSpec::new("c", FieldKind::Str),
            FieldSpec::new("d", FieldKind::Int),
        ],
        mixins: &[],
        string_like: false,
    };

    static WIDGET: SchemaDef = SchemaDef {
        name: "Widget",
        tag: Some("Widget"),
        fields: &[
            FieldSpec::new("a", FieldKind::Document("Label")),
            FieldSpec::new("b", FieldKind::List),
        ],
        mixins: &[&BASE],
        string_like: false,
    };

    #[derive(Debug, Clone, Default)]
    struct Label {
        id: Option<Value>,
        text: Option<String>,
    }

    impl Document for Label {
        fn schema_def(&self) -> &'static SchemaDef {
            &LABEL
        }
        fn id(&self) -> Option<&Value> {
            self.id.as_ref()
        }
        fn set_id(&mut self, id: Value) {
            self.id = Some(id);
        }
        fn dump_field(&self, _registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
            Ok(match field {
                "text" => scalar(&self.text),
                _ => None,
            })
        }
        fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
            if field == "text" {
                self.text = Some(node.into_string(field)?);
            }
            Ok(())
        }
    }

    #[derive(Debug, Clone, Default)]
    struct Widget {
        id: Option<Value>,
        a: Option<Label>,
        b: Option<Vec<Node>>,
        c: Option<String>,
        d: Option<i64>,
    }

    impl Document for Widget {
        fn schema_def(&self) -> &'static SchemaDef {
            &WIDGET
        }
        fn id(&self) -> Option<&Value> {
            self.id.as_ref()
        }
        fn set_id(&mut self, id: Value) {
            self.id = Some(id);
        }
        fn dump_field(&self, registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
            match field {
                "a" => registry.dump_nested(&self.a),
                "b" => registry.dump_list(&self.b),
                "c" => Ok(scalar(&self.c)),
                "d" => Ok(scalar(&self.d)),
                _ => Ok(None),
            }
        }
        fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
            match field {
                "a" => self.a = Some(node.into_document(field)?),
                "b" => self.b = Some(node.into_list(field)?),
                "c" => self.c = Some(node.into_string(field)?),
                "d" => self.d = Some(node.into_int(field)?),
                _ => {}
            }
            Ok(())
        }
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .register(&LABEL, || Box::new(Label::default()))
            .unwrap();
        registry
            .register(&WIDGET, || Box::new(Widget::default()))
            .unwrap();
        registry.validate().unwrap();
        registry
    }

    #[test]
    fn test_dump_aggregates_all_fields() {
        let registry = registry();
        let widget = Widget {
            id: None,
            a: Some(Label { id: None, text: Some("hello".to_string()) }),
            b: Some(vec![Node::from(1i64), Node::from("x")]),
            c: Some("see".to_string()),
            d: Some(4),
        };
        let dumped = registry.dump(&Node::doc(widget)).unwrap();
        assert_eq!(
            dumped,
            json!({"_type": "Widget", "a": "hello", "b": [1, "x"], "c": "see", "d": 4})
        );
        assert_eq!(dumped.as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let registry = registry();
        let dumped = registry.dump(&Node::doc(Widget::default())).unwrap();
        assert_eq!(dumped, json!({"_type": "Widget"}));
    }

    #[test]
    fn test_load_rebuilds_registered_type() {
        let registry = registry();
        let value = json!({"_type": "Widget", "_id": "w1", "a": "hi", "d": 7, "c": null});
        let widget: Widget = registry.load_as(&value).unwrap();
        assert_eq!(widget.id, Some(json!("w1")));
        assert_eq!(widget.a.unwrap().text.as_deref(), Some("hi"));
        assert_eq!(widget.d, Some(7));
        assert!(widget.c.is_none());
        assert!(widget.b.is_none());
    }

    #[test]
    fn test_round_trip_is_stable() {
        let registry = registry();
        let value = json!({
            "_type": "Widget",
            "_id": 12,
            "a": "label",
            "b": [{"_type": "Label", "text": "inner"}, {"plain": [1, 2]}, 3.5, null],
            "c": "text",
        });
        let loaded = registry.load(&value).unwrap();
        let dumped = registry.dump(&loaded).unwrap();
        let again = registry.dump(&registry.load(&dumped).unwrap()).unwrap();
        assert_eq!(dumped, again);
        assert_eq!(dumped["b"][0], json!("inner"));
        assert_eq!(dumped["b"][1], json!({"plain": [1, 2]}));
        assert_eq!(dumped["_id"], json!(12));
    }

    #[test]
    fn test_untagged_mapping_keeps_every_key() {
        let registry = registry();
        let value = json!({"one": 1, "two": {"_type": "Widget", "d": 2}, "three": [true]});
        let node = registry.load(&value).unwrap();
        match &node {
            Node::Map(map) => {
                assert_eq!(map.len(), 3);
                assert_eq!(map["two"].type_tag(), Some("Widget"));
            }
            other => panic!("expected map, got {other:?}"),
        }
        assert_eq!(registry.dump(&node).unwrap(), value);
    }

    #[test]
    fn test_unknown_type_fails() {
        let registry = registry();
        let err = registry
            .load(&json!({"_type": "NoSuchType", "x": 1}))
            .unwrap_err();
        assert!(matches!(err, DocumentError::UnknownType { ref tag } if tag == "NoSuchType"));

        // Nested occurrences propagate too
        let err = registry
            .load(&json!({"_type": "Widget", "b": [{"_type": "NoSuchType"}]}))
            .unwrap_err();
        assert!(matches!(err, DocumentError::UnknownType { .. }));
    }

    #[test]
    fn test_non_string_tag_is_rejected() {
        let registry = registry();
        let err = registry.load(&json!({"_type": 5})).unwrap_err();
        assert!(matches!(err, DocumentError::MissingTypeTag));
    }

    #[test]
    fn test_duplicate_tag_is_rejected() {
        let mut registry = registry();
        let err = registry
            .register(&LABEL, || Box::new(Label::default()))
            .unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateTag(ref tag) if tag == "Label"));
    }

    #[test]
    fn test_abstract_schema_cannot_be_registered() {
        let mut registry = TypeRegistry::new();
        let err = registry
            .register(&BASE, || Box::new(Widget::default()))
            .unwrap_err();
        assert!(matches!(err, DocumentError::SchemaDefinition { .. }));
    }

    #[test]
    fn test_validate_reports_unregistered_field_type() {
        let mut registry = TypeRegistry::new();
        registry
            .register(&WIDGET, || Box::new(Widget::default()))
            .unwrap();
        let err = registry.validate().unwrap_err();
        assert!(matches!(err, DocumentError::UnknownType { ref tag } if tag == "Label"));
    }

    #[test]
    fn test_mismatched_field_shape_is_reported() {
        let registry = registry();
        let err = registry
            .load(&json!({"_type": "Widget", "d": "four"}))
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidField { ref field, .. } if field == "d"));
    }
}
