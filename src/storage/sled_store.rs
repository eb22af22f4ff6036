use crate::error::{ClinchatError, Result};
use crate::storage::DurableStorage;
use sled::Db;
use std::path::{Path, PathBuf};

/// Durable storage on an embedded `sled` database
///
/// Every write is flushed before returning so that a crash right after a
/// mutation never loses the saved session array.
pub struct SledStorage {
    db: Db,
    path: PathBuf,
}

impl SledStorage {
    /// Open or create a sled database at `path`
    ///
    /// # Errors
    ///
    /// Returns `ClinchatError::Storage` if the database cannot be opened
    ///
    /// # Examples
    ///
    /// ```
    /// use clinchat::storage::{DurableStorage, SledStorage};
    ///
    /// # fn main() -> clinchat::error::Result<()> {
    /// let dir = std::env::temp_dir().join("clinchat-doc-sled");
    /// let storage = SledStorage::open(&dir)?;
    /// storage.set("clinicalChats", "[]")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = sled::open(&path)
            .map_err(|e| ClinchatError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self { db, path })
    }
}

impl DurableStorage for SledStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| ClinchatError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let value = String::from_utf8(bytes.to_vec())
                    .map_err(|e| ClinchatError::Storage(format!("Value is not UTF-8: {}", e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| ClinchatError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| ClinchatError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| ClinchatError::Storage(format!("Remove failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| ClinchatError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
