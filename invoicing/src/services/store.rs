//! Key-value persistence gateway.

use crate::error::StorageError;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// The four persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Customers,
    WorkLocations,
    Invoices,
    Settings,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        StorageKey::Customers,
        StorageKey::WorkLocations,
        StorageKey::Invoices,
        StorageKey::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Customers => "invoice_customers",
            StorageKey::WorkLocations => "invoice_locations",
            StorageKey::Invoices => "invoice_invoices",
            StorageKey::Settings => "invoice_settings",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String-keyed text storage.
///
/// `load` returns `Ok(None)` for a key that was never written.
pub trait KeyValueStore {
    fn load(&self, key: StorageKey) -> Result<Option<String>, StorageError>;
    fn save(&mut self, key: StorageKey, value: &str) -> Result<(), StorageError>;
    /// Delete a key. Removing a key that was never written is not an error.
    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError>;
}

/// In-memory store with an optional byte quota across all keys.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<StorageKey, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(bytes),
        }
    }

    pub fn set_quota(&mut self, bytes: Option<usize>) {
        self.quota = bytes;
    }

    /// Bytes currently held across all keys.
    pub fn used_bytes(&self) -> usize {
        self.entries.values().map(String::len).sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(&key).cloned())
    }

    fn save(&mut self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let others: usize = self
                .entries
                .iter()
                .filter(|(k, _)| **k != key)
                .map(|(_, v)| v.len())
                .sum();
            let available = quota.saturating_sub(others);
            if value.len() > available {
                warn!(key = %key, needed = value.len(), available, "Storage quota exceeded");
                return Err(StorageError::QuotaExceeded {
                    key,
                    needed: value.len(),
                    available,
                });
            }
        }
        self.entries.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError> {
        self.entries.remove(&key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a data directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn temp_path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", key))
    }
}

impl KeyValueStore for FileStore {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn load(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored data");
                Ok(None)
            }
            Err(source) => Err(StorageError::Io { key, source }),
        }
    }

    #[instrument(skip(self, value), fields(dir = %self.dir.display(), bytes = value.len()))]
    fn save(&mut self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let temp = self.temp_path(key);
        fs::write(&temp, value).map_err(|source| StorageError::Io { key, source })?;
        fs::rename(&temp, self.path(key)).map_err(|source| {
            let _ = fs::remove_file(&temp);
            StorageError::Io { key, source }
        })?;
        debug!("Stored");
        Ok(())
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { key, source }),
        }
    }
}
