//! Persistence and file delivery: the draft store behind the editor and the
//! directory sink used by export.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::export::deliver::{DeliverError, FileSink};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Key-value storage for the draft.
pub trait DraftStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// The stored form of the canonical snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDraft {
    pub content: String,
    pub timestamp: i64,
}

impl StoredDraft {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// In-memory store. Clones share the same map, so a test can keep a handle
/// while the editor owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl DraftStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.value(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl DraftStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, value)?;
        Ok(())
    }
}

/// Delivers exported files by writing them into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    delivered: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            delivered: Vec::new(),
        }
    }

    /// Paths written so far, oldest first
    pub fn delivered(&self) -> &[PathBuf] {
        &self.delivered
    }
}

impl FileSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, _mime_type: &str, bytes: &[u8]) -> Result<(), DeliverError> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(DeliverError::InvalidFileName(file_name.to_string()));
        }
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)?;
        log::info!("Wrote {}", path.display());
        self.delivered.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn stored_draft_json_shape() {
        let draft = StoredDraft {
            content: "<p>hi</p>".to_string(),
            timestamp: 42,
        };
        let json = draft.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["content"], "<p>hi</p>");
        assert_eq!(value["timestamp"], 42);
        assert_eq!(StoredDraft::from_json(&json).unwrap(), draft);
    }

    #[test]
    fn memory_store_clones_share_values() {
        let store = MemoryStore::new();
        let mut handle = store.clone();
        handle.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn file_store_round_trips_and_creates_dirs() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path().join("nested/store"));
        assert_eq!(store.get("draft").unwrap(), None);

        store.set("draft", "{}").unwrap();
        assert!(temp.path().join("nested/store/draft.json").exists());
        assert_eq!(store.get("draft").unwrap(), Some("{}".to_string()));
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path());
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn directory_sink_writes_file() {
        let temp = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp.path().join("out"));
        sink.deliver("draft-2024-01-31.docx", "application/x", b"PK")
            .unwrap();
        let path = temp.path().join("out/draft-2024-01-31.docx");
        assert_eq!(fs::read(&path).unwrap(), b"PK");
        assert_eq!(sink.delivered(), &[path]);
    }

    #[test]
    fn directory_sink_rejects_nested_names() {
        let temp = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp.path());
        assert!(sink.deliver("a/b.docx", "x", b"").is_err());
    }
}
