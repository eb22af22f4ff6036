//! Test utilities for Clinchat
//!
//! Shared fixtures for unit tests: an in-memory store wired to a
//! [`RecordingView`].

use crate::storage::MemoryStorage;
use crate::store::{SessionStore, StoreOptions};

pub use crate::render::{RecordingView, ViewEvent};

/// An empty store over in-memory storage that confirms every prompt
///
/// The returned storage handle shares state with the store, so tests can
/// inspect what was persisted or make later writes fail.
pub fn memory_store() -> (SessionStore<RecordingView>, MemoryStorage) {
    let storage = MemoryStorage::new();
    let store = SessionStore::load(
        Box::new(storage.clone()),
        RecordingView::new(true),
        StoreOptions::default(),
    );
    (store, storage)
}

/// A store loaded from `raw` stored under the default key
pub fn store_from_raw(raw: &str) -> SessionStore<RecordingView> {
    let options = StoreOptions::default();
    SessionStore::load(
        Box::new(MemoryStorage::with_value(&options.key, raw)),
        RecordingView::new(true),
        options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_starts_empty() {
        let (store, _) = memory_store();
        assert!(store.is_empty());
        assert!(store.view().notices().is_empty());
    }

    #[test]
    fn test_store_from_raw_decodes_sessions() {
        let store = store_from_raw("[]");
        assert!(store.is_empty());
        assert!(store.view().notices().is_empty());
    }
}
