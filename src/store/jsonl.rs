use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use log::{debug, info};
use serde_json::Value;
use uuid::Uuid;

use super::{matches_filter, lookup_path, DocumentStore};
use crate::document::{DocumentError, Result, ID_KEY};

/// In-memory collection persisted as one JSON document per line
#[derive(Debug, Default)]
pub struct JsonlStore {
    documents: Vec<Value>,
}

impl JsonlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a collection; blank lines are skipped and a missing file is an empty store
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("No store at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open store: {}", path.display()))?;
        let mut store = Self::new();
        for (line_number, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let document: Value = serde_json::from_str(&line).with_context(|| {
                format!("Invalid JSON at {}:{}", path.display(), line_number + 1)
            })?;
            store.insert(document)?;
        }

        info!("Loaded {} documents from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create store: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        for document in &self.documents {
            serde_json::to_writer(&mut writer, document)?;
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.documents.iter()
    }
}

impl DocumentStore for JsonlStore {
    fn insert(&mut self, mut document: Value) -> Result<Value> {
        let map = document
            .as_object_mut()
            .ok_or_else(|| DocumentError::Store("only mappings can be stored".to_string()))?;

        let id = match map.get(ID_KEY) {
            Some(id) if !id.is_null() => id.clone(),
            _ => {
                let id = Value::String(Uuid::new_v4().to_string());
                map.insert(ID_KEY.to_string(), id.clone());
                id
            }
        };

        if self.get(&id).is_some() {
            return Err(DocumentError::Store(format!("duplicate {}: {}", ID_KEY, id)));
        }
        self.documents.push(document);
        Ok(id)
    }

    fn get(&self, id: &Value) -> Option<&Value> {
        self.documents
            .iter()
            .find(|document| document.get(ID_KEY) == Some(id))
    }

    fn find(&self, path: &str, expected: &Value) -> Vec<&Value> {
        self.documents
            .iter()
            .filter(|document| lookup_path(document, path) == Some(expected))
            .collect()
    }

    fn find_one(&self, filter: &Value) -> Option<&Value> {
        self.documents
            .iter()
            .find(|document| matches_filter(document, filter))
    }

    fn len(&self) -> usize {
        self.documents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_insert_assigns_id() {
        let mut store = JsonlStore::new();
        let id = store.insert(json!({"_type": "Person", "display_name": "E. Noether"})).unwrap();
        assert!(id.is_string());
        assert_eq!(store.get(&id).unwrap()["display_name"], json!("E. Noether"));
    }

    #[test]
    fn test_insert_keeps_existing_id_and_rejects_duplicates() {
        let mut store = JsonlStore::new();
        let id = store.insert(json!({"_id": 7, "x": 1})).unwrap();
        assert_eq!(id, json!(7));
        assert!(matches!(
            store.insert(json!({"_id": 7})),
            Err(DocumentError::Store(_))
        ));
        assert!(store.insert(json!(["not", "a", "mapping"])).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_find_by_dotted_path() {
        let mut store = JsonlStore::new();
        store.insert(json!({"name": {"last": "Lukin", "names": ["M."]}})).unwrap();
        store.insert(json!({"name": {"last": "Lukin", "names": ["Mikhail"]}})).unwrap();
        store.insert(json!({"name": {"last": "Smith"}})).unwrap();

        assert_eq!(store.find("name.last", &json!("Lukin")).len(), 2);
        let found = store
            .find_one(&json!({"name.last": "Lukin", "name.names": ["Mikhail"]}))
            .unwrap();
        assert_eq!(found["name"]["names"], json!(["Mikhail"]));
        assert!(store.find_one(&json!({"name.last": "Bohr"})).is_none());
    }

    #[test]
    fn test_save_and_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aliases.jsonl");

        let mut store = JsonlStore::new();
        let id = store.insert(json!({"_type": "Alias", "persons": []})).unwrap();
        store.insert(json!({"_type": "Alias", "persons": [["p", 1]]})).unwrap();
        store.save(&path).unwrap();

        let reopened = JsonlStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get(&id).unwrap()["persons"], json!([]));
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonlStore::open(&dir.path().join("absent.jsonl")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_reports_bad_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.jsonl");
        std::fs::write(&path, "{\"_id\": 1}\n\nnot json\n").unwrap();
        let err = JsonlStore::open(&path).unwrap_err();
        assert!(err.to_string().contains(":3"));
    }
}
