use serde::{Deserialize, Serialize};
use std::fmt;

/// Which durable storage engine holds the session array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Embedded sled key-value database
    #[default]
    Sled,
    /// Single-table SQLite database
    Sqlite,
    /// Process memory only; nothing survives a restart
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sled => write!(f, "sled"),
            Self::Sqlite => write!(f, "sqlite"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

impl StorageBackend {
    /// Parse a backend name, case-insensitively
    ///
    /// # Examples
    ///
    /// ```
    /// use clinchat::storage::StorageBackend;
    ///
    /// assert_eq!(StorageBackend::parse_str("SQLite").unwrap(), StorageBackend::Sqlite);
    /// assert!(StorageBackend::parse_str("redis").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "sled" => Ok(Self::Sled),
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(format!("Unknown storage backend: {}", other)),
        }
    }

    /// File name used under the data directory when no path is configured
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::Sled => "sessions.sled",
            Self::Sqlite => "sessions.db",
            Self::Memory => "",
        }
    }
}
