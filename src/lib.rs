//! Clinchat - Clinical genomics consultation assistant library
//!
//! This library provides the session store behind the `clinchat` terminal
//! chat: an ordered list of consultations held in memory, mirrored to
//! durable key/value storage after every change and drawn through a
//! pluggable view.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Session and message records and their persisted JSON layout
//! - `store`: The session store and reply tickets
//! - `storage`: Durable key/value backends (sled, SQLite, in-memory)
//! - `render`: The view trait, terminal and HTML rendering, escaping
//! - `reply`: Canned and backend-proxied reply generation
//! - `remote`: HTTP client for the consultation backend
//! - `controller`: Store operations that involve replies or the backend
//! - `status`: Background backend status polling
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```
//! use clinchat::render::RecordingView;
//! use clinchat::session::Role;
//! use clinchat::storage::MemoryStorage;
//! use clinchat::store::{SessionStore, StoreOptions};
//!
//! let mut store = SessionStore::load(
//!     Box::new(MemoryStorage::new()),
//!     RecordingView::new(true),
//!     StoreOptions::default(),
//! );
//! store.create(true);
//! store.append_message(Role::User, "BRCA1 c.68_69delAG");
//! assert_eq!(store.get(0).unwrap().title, "BRCA1 c.68_69delAG");
//! ```

pub mod chat_mode;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod prompts;
pub mod remote;
pub mod render;
pub mod reply;
pub mod session;
pub mod status;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use chat_mode::{BackendStatus, ReplyMode};
pub use config::Config;
pub use controller::ChatController;
pub use error::{ClinchatError, Result};
pub use session::{Message, Role, Session};
pub use store::{ReplyOutcome, ReplyTicket, SessionStore, StoreOptions};

#[cfg(test)]
pub mod test_utils;
