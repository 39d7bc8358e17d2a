use thiserror::Error;

/// Errors raised while declaring, dumping or loading documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A `_type` tag that no registered type declares
    #[error("Unknown document type: {tag}")]
    UnknownType { tag: String },

    /// A field declared by a type and again by one of its mixins
    #[error("Schema error: field '{field}' of {type_name} is declared more than once")]
    SchemaDefinition { type_name: String, field: String },

    /// Two types registered under the same tag
    #[error("Duplicate document type tag: {0}")]
    DuplicateTag(String),

    /// A stored value whose shape does not fit the field it is assigned to
    #[error("Invalid value for field '{field}': expected {expected}")]
    InvalidField { field: String, expected: &'static str },

    /// A mapping whose `_type` entry is not a string
    #[error("Document type tag must be a string")]
    MissingTypeTag,

    /// Failure reported by a storage collaborator
    #[error("Store error: {0}")]
    Store(String),
}

impl DocumentError {
    pub fn invalid_field(field: &str, expected: &'static str) -> Self {
        DocumentError::InvalidField {
            field: field.to_string(),
            expected,
        }
    }
}

pub type Result<T> = std::result::Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DocumentError::UnknownType {
            tag: "NoSuchType".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown document type: NoSuchType");

        let err = DocumentError::invalid_field("year", "integer");
        assert_eq!(err.to_string(), "Invalid value for field 'year': expected integer");
    }
}
