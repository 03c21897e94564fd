//! Durable key-value storage for the session list
//!
//! The session store only needs `get`/`set` of string values under a
//! key, so storage is modeled as the [`KeyValueStore`] trait. The
//! production backend is an embedded `sled` database; [`MemoryStore`]
//! backs tests and throwaway runs.

use crate::error::{ChatkeepError, Result};
use directories::ProjectDirs;
use sled::Db;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// String key-value store used to persist the session list
///
/// Implementations must make a successful `set` durable before
/// returning.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` when absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Embedded `sled` database
pub struct SledStore {
    db: Db,
    path: PathBuf,
}

impl SledStore {
    /// Open or create a store at `path`
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::Storage` if the database cannot be opened
    ///
    /// # Examples
    ///
    /// ```
    /// use chatkeep::storage::{KeyValueStore, SledStore};
    ///
    /// # fn main() -> chatkeep::error::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let mut store = SledStore::open(dir.path().join("sessions.db"))?;
    /// store.set("k", "v")?;
    /// assert_eq!(store.get("k")?, Some("v".to_string()));
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChatkeepError::Storage(format!("Failed to create store directory: {}", e))
            })?;
        }

        let db = sled::open(&path)
            .map_err(|e| ChatkeepError::Storage(format!("Failed to open database: {}", e)))?;
        tracing::debug!("Opened session store at {}", path.display());

        Ok(Self { db, path })
    }

    /// Open the store at the configured path, or the platform default
    pub fn open_configured(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::open(p),
            None => Self::open(default_store_path()?),
        }
    }

    /// Location of the database directory
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| ChatkeepError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let value = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    ChatkeepError::Storage(format!("Stored value is not UTF-8: {}", e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| ChatkeepError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| ChatkeepError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }
}

/// In-memory store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Default database location in the user's data directory
///
/// # Errors
///
/// Returns `ChatkeepError::Storage` if no home directory can be resolved
pub fn default_store_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "chatkeep", "chatkeep")
        .ok_or_else(|| ChatkeepError::Storage("Could not determine data directory".into()))?;
    Ok(proj_dirs.data_dir().join("sessions.db"))
}
