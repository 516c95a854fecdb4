//! Best-effort key/value persistence for visitor preferences.
//!
//! [`Storage`] is the injected backend contract and may fail. [`PreferenceStore`]
//! wraps a backend and is total: failed reads look like missing keys and failed
//! writes are dropped. Nothing is retried or queued.
//!
//! Two pages open in different tabs share the same keys. Writes from either
//! tab simply overwrite each other (last write wins); the store does not try to
//! detect or reconcile that.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StorageError;

/// A string-keyed, string-valued persistence backend.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Total wrapper over a [`Storage`] backend.
pub struct PreferenceStore {
    backend: Box<dyn Storage>,
}

impl PreferenceStore {
    pub fn new(backend: impl Storage + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Read a key, treating any backend failure as "not set".
    pub fn get(&self, key: &str) -> Option<String> {
        match self.backend.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Preference read for '{}' failed, treating as unset: {}", key, e);
                None
            }
        }
    }

    /// Write a key. A backend failure drops the write.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.backend.set_item(key, value) {
            Ok(()) => debug!("Stored preference '{}' = '{}'", key, value),
            Err(e) => warn!("Preference write for '{}' dropped: {}", key, e),
        }
    }
}

/// In-memory backend, optionally configured to fail like a locked-down browser.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose every read and write fails, as in private browsing modes
    /// that block storage entirely.
    pub fn unavailable() -> Self {
        Self {
            items: HashMap::new(),
            fail_reads: true,
            fail_writes: true,
        }
    }

    /// Backend that reads fine but rejects writes, as when the quota is full.
    pub fn read_only(items: HashMap<String, String>) -> Self {
        Self {
            items,
            fail_reads: false,
            fail_writes: true,
        }
    }

    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Unavailable("reads are blocked".to_string()));
        }
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::QuotaExceeded(key.to_string()));
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Backend persisting all keys as one flat JSON object on disk.
///
/// A missing file is an empty store. Every write rewrites the whole file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        fs::write(&self.path, serde_json::to_string_pretty(&items)?)?;
        Ok(())
    }
}
