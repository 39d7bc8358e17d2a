use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::error::{DocumentError, Result};
use super::Document;

/// A loaded value: plain scalars, containers, or typed documents.
///
/// This is what `TypeRegistry::load` produces and `TypeRegistry::dump` consumes.
pub enum Node {
    /// Null, boolean, number or string
    Plain(Value),
    List(Vec<Node>),
    Map(BTreeMap<String, Node>),
    Doc(Box<dyn Document>),
}

impl Node {
    pub fn doc<D: Document>(doc: D) -> Self {
        Node::Doc(Box::new(doc))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Plain(Value::Null))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Plain(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Plain(v) => v.as_i64(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the document inside this node if it is exactly a `D`
    pub fn as_document<D: Document>(&self) -> Option<&D> {
        match self {
            Node::Doc(doc) => doc.as_any().downcast_ref::<D>(),
            _ => None,
        }
    }

    pub fn type_tag(&self) -> Option<&'static str> {
        match self {
            Node::Doc(doc) => Some(doc.type_tag()),
            _ => None,
        }
    }

    pub fn into_string(self, field: &str) -> Result<String> {
        match self {
            Node::Plain(Value::String(s)) => Ok(s),
            _ => Err(DocumentError::invalid_field(field, "string")),
        }
    }

    pub fn into_int(self, field: &str) -> Result<i64> {
        match self {
            Node::Plain(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| DocumentError::invalid_field(field, "integer")),
            _ => Err(DocumentError::invalid_field(field, "integer")),
        }
    }

    pub fn into_bool(self, field: &str) -> Result<bool> {
        match self {
            Node::Plain(Value::Bool(b)) => Ok(b),
            _ => Err(DocumentError::invalid_field(field, "boolean")),
        }
    }

    pub fn into_list(self, field: &str) -> Result<Vec<Node>> {
        match self {
            Node::List(items) => Ok(items),
            _ => Err(DocumentError::invalid_field(field, "list")),
        }
    }

    pub fn into_document<D: Document>(self, field: &str) -> Result<D> {
        match self {
            Node::Doc(doc) => doc
                .into_any()
                .downcast::<D>()
                .map(|boxed| *boxed)
                .map_err(|_| DocumentError::invalid_field(field, "document of the declared type")),
            _ => Err(DocumentError::invalid_field(field, "document")),
        }
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        match self {
            Node::Plain(v) => Node::Plain(v.clone()),
            Node::List(items) => Node::List(items.clone()),
            Node::Map(map) => Node::Map(map.clone()),
            Node::Doc(doc) => Node::Doc(doc.clone_box()),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Plain(v) => write!(f, "{}", v),
            Node::List(items) => f.debug_list().entries(items).finish(),
            Node::Map(map) => f.debug_map().entries(map).finish(),
            Node::Doc(doc) => fmt::Debug::fmt(doc, f),
        }
    }
}

impl From<Value> for Node {
    /// Wrap a value without interpreting it; use `TypeRegistry::load` to expand documents
    fn from(value: Value) -> Self {
        Node::Plain(value)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Plain(Value::String(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Plain(Value::String(s))
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Plain(Value::from(n))
    }
}

impl From<f64> for Node {
    fn from(n: f64) -> Self {
        Node::Plain(Value::from(n))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Plain(Value::Bool(b))
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Node::from("abc").into_string("f").unwrap(), "abc");
        assert_eq!(Node::from(42i64).into_int("f").unwrap(), 42);
        assert!(Node::from(true).into_bool("f").unwrap());
        assert!(Node::from(Value::Null).is_null());
    }

    #[test]
    fn test_mismatched_conversion_names_field() {
        let err = Node::from("abc").into_int("year").unwrap_err();
        assert!(err.to_string().contains("'year'"));

        let err = Node::from(json!(1.5)).into_int("month").unwrap_err();
        assert!(err.to_string().contains("integer"));
    }

    #[test]
    fn test_list_accessors() {
        let node = Node::from(vec![Node::from("a"), Node::from(2i64)]);
        let items = node.as_list().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_str(), Some("a"));
        assert_eq!(items[1].as_i64(), Some(2));
    }
}
