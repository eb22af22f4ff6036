//! Durable key/value storage for the session array
//!
//! The session store keeps a single key whose value is the JSON-serialized
//! session list. It is read once at startup and overwritten wholesale after
//! every mutation, so the backends only need `get`, `set` and `remove`.

use crate::config::StorageConfig;
use crate::error::{ClinchatError, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub mod memory;
pub mod sled_store;
pub mod sqlite;
pub mod types;

pub use memory::MemoryStorage;
pub use sled_store::SledStorage;
pub use sqlite::SqliteStorage;
pub use types::StorageBackend;

/// A string key/value store surviving restarts
pub trait DurableStorage: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// Short human-readable location, used in log lines
    fn describe(&self) -> String;
}

/// Open the storage backend selected by configuration
///
/// # Errors
///
/// Returns `ClinchatError::Storage` if the data directory cannot be
/// determined or the backend fails to open.
pub fn open_storage(config: &StorageConfig) -> Result<Box<dyn DurableStorage>> {
    let storage: Box<dyn DurableStorage> = match config.backend {
        StorageBackend::Memory => Box::new(MemoryStorage::new()),
        StorageBackend::Sled => Box::new(SledStorage::open(resolve_path(config)?)?),
        StorageBackend::Sqlite => Box::new(SqliteStorage::new_with_path(resolve_path(config)?)?),
    };

    tracing::info!("Opened {} storage at {}", config.backend, storage.describe());
    Ok(storage)
}

/// Configured path, or the backend's file under the platform data directory
fn resolve_path(config: &StorageConfig) -> Result<PathBuf> {
    if let Some(path) = &config.path {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs = ProjectDirs::from("org", "clinchat", "clinchat")
        .ok_or_else(|| ClinchatError::Storage("Could not determine data directory".into()))?;

    Ok(proj_dirs
        .data_dir()
        .join(config.backend.default_file_name()))
}
