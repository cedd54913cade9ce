//! Key/value storage for small persisted strings
//!
//! The typeahead history is the only thing persisted. Stores are synchronous
//! and fallible; callers decide whether a failure matters.
//!
//! # Example
//!
//! ```rust,ignore
//! use pawsearch_core::storage::{FileStore, KeyValueStore};
//!
//! let store = FileStore::default_store()?;
//! store.set_item("pawsearch.history", "[\"pug\"]")?;
//! assert_eq!(store.get_item("pawsearch.history")?.as_deref(), Some("[\"pug\"]"));
//! ```

use crate::error::{Error, ErrorCode, Result};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Synchronous string storage addressed by key.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`; removing a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-memory store, mostly for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let guard = self
            .values
            .read()
            .map_err(|_| Error::new(ErrorCode::Internal, "Failed to acquire store read lock"))?;
        Ok(guard.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self
            .values
            .write()
            .map_err(|_| Error::new(ErrorCode::Internal, "Failed to acquire store write lock"))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut guard = self
            .values
            .write()
            .map_err(|_| Error::new(ErrorCode::Internal, "Failed to acquire store write lock"))?;
        guard.remove(key);
        Ok(())
    }
}

/// File-backed store: one file per key under a directory.
///
/// File names are the SHA-256 of the key so arbitrary keys are safe on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            Error::storage_unavailable(format!(
                "Cannot create storage directory {}: {}",
                dir.display(),
                e
            ))
            .with_source(e)
        })?;
        Ok(Self { dir })
    }

    /// Create a store in the platform data directory
    pub fn default_store() -> Result<Self> {
        Self::new(default_dir())
    }

    /// Root directory of this store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(hasher.finalize())))
    }
}

/// Platform data directory for pawsearch
pub fn default_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".data"))
        .join("pawsearch")
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.value_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(key);
        // Write-then-rename so readers never observe a half-written value
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.value_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::from(e)),
        }
    }
}
