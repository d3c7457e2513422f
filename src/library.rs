//! Item storage.
//!
//! Citation retrieval never owns items; it commits each rewritten item through
//! an [`ItemStore`]. [`Library`] is the JSON-file implementation used by the
//! command-line tool, where every commit rewrites the file atomically.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::Item;

/// Errors raised by an item store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Write rejected: {0}")]
    Rejected(String),
}

/// Persists items one at a time.
///
/// Each call is a self-contained commit; there are no transactions spanning
/// several items.
pub trait ItemStore: Send {
    fn save_item(&mut self, item: &Item) -> Result<(), StoreError>;
}

/// A library of items, optionally backed by a JSON file
#[derive(Debug, Clone, Default)]
pub struct Library {
    path: Option<PathBuf>,
    items: Vec<Item>,
}

impl Library {
    /// A library that lives only in memory
    pub fn in_memory(items: Vec<Item>) -> Self {
        Self { path: None, items }
    }

    /// Open a library file, starting empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let items = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    StoreError::Parse(format!("{}: {}", path.display(), e))
                })?
            }
        } else {
            Vec::new()
        };

        tracing::debug!("Opened library {} with {} items", path.display(), items.len());

        Ok(Self {
            path: Some(path),
            items,
        })
    }

    /// `<data dir>/citation-counts/library.json`
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("citation-counts")
            .join("library.json")
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, key: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.key == key)
    }

    /// Clone the items with the given keys, in the given order.
    /// An empty key list selects every item.
    pub fn select(&self, keys: &[String]) -> Result<Vec<Item>, StoreError> {
        if keys.is_empty() {
            return Ok(self.items.clone());
        }

        keys.iter()
            .map(|key| {
                self.get(key)
                    .cloned()
                    .ok_or_else(|| StoreError::NotFound(key.clone()))
            })
            .collect()
    }

    /// Add new items, replacing existing items that share a key, and persist.
    pub fn add_items(&mut self, items: &[Item]) -> Result<(), StoreError> {
        let mut updated = self.items.clone();
        for item in items {
            match updated.iter_mut().find(|i| i.key == item.key) {
                Some(existing) => *existing = item.clone(),
                None => updated.push(item.clone()),
            }
        }
        self.commit(updated)
    }

    /// Write `items` and adopt them only once they are on disk
    fn commit(&mut self, items: Vec<Item>) -> Result<(), StoreError> {
        self.flush(&items)?;
        self.items = items;
        Ok(())
    }

    fn flush(&self, items: &[Item]) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let content = serde_json::to_string_pretty(items)
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        let mut file = tempfile::NamedTempFile::new_in(&dir)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        file.persist(path).map_err(|e| StoreError::Io(e.error))?;

        Ok(())
    }
}

impl ItemStore for Library {
    fn save_item(&mut self, item: &Item) -> Result<(), StoreError> {
        let idx = self
            .items
            .iter()
            .position(|i| i.key == item.key)
            .ok_or_else(|| StoreError::NotFound(item.key.clone()))?;

        let mut updated = self.items.clone();
        updated[idx] = item.clone();
        self.commit(updated)
    }
}
