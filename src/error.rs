//! Error types for Clinchat
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Clinchat operations
///
/// Covers configuration loading, durable storage, the remote backend and
/// reply generation. The session store itself never returns these to its
/// callers; it turns them into view notifications.
#[derive(Error, Debug)]
pub enum ClinchatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable storage errors (sled, sqlite)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Remote backend errors (unexpected status, malformed body)
    #[error("Remote error: {0}")]
    Remote(String),

    /// Reply generation errors
    #[error("Reply error: {0}")]
    Reply(String),

    /// No consultation at the requested list position
    #[error("No consultation at position {0}")]
    NotFound(usize),
}

/// Result type alias for Clinchat operations
///
/// Uses `anyhow::Error` as the error type so that callers can attach
/// context while still downcasting to [`ClinchatError`] where needed.
pub type Result<T> = anyhow::Result<T>;
