//! Persistent key-value storage and the last-known-good cache slot.
//!
//! The widget never touches storage directly; it is handed a
//! [`KeyValueStore`] so tests can run against [`MemoryStore`] and the CLI
//! against [`FileStore`].

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use juanuru_core::StorageError;
use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::types::{LiveError, LiveReading};

/// String key-value storage that survives between sessions.
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                message: format!("{}: {}", path.display(), e),
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_failed = |e: std::io::Error| StorageError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        };

        fs::create_dir_all(&self.dir).map_err(|e| {
            StorageError::Unavailable(format!("{}: {}", self.dir.display(), e))
        })?;

        // Each write gets its own temp file; readers never see a half-written value.
        let path = self.path_for(key);
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(write_failed)?;
        tmp.write_all(value.as_bytes()).map_err(write_failed)?;
        tmp.persist(&path).map_err(|e| write_failed(e.error))?;

        tracing::debug!("Stored {} at {}", key, path.display());
        Ok(())
    }
}

/// In-process storage; contents are lost with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The single persisted slot holding the last successfully fetched reading.
#[derive(Clone)]
pub struct CacheSlot {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for CacheSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheSlot").field("key", &self.key).finish()
    }
}

impl CacheSlot {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The cached reading, if one was ever saved.
    ///
    /// # Errors
    /// `Storage` when the store cannot be read, `Parse` when the stored text
    /// is not a reading.
    pub fn load(&self) -> Result<Option<LiveReading>, LiveError> {
        match self.store.get_item(&self.key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Overwrite the slot with `reading`.
    ///
    /// # Errors
    /// `Storage` when the store rejects the write.
    pub fn save(&self, reading: &LiveReading) -> Result<(), LiveError> {
        let raw = serde_json::to_string(reading)?;
        self.store.set_item(&self.key, &raw)?;
        Ok(())
    }
}
