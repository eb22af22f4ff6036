use std::path::PathBuf;
use tempfile::TempDir;

use clinchat::config::{RemoteConfig, StorageConfig};
use clinchat::remote::BackendClient;
use clinchat::render::RecordingView;
use clinchat::storage::{open_storage, StorageBackend};
use clinchat::store::{SessionStore, StoreOptions};

/// Storage configuration for a database file inside a fresh temp dir
#[allow(dead_code)]
pub fn temp_storage_config(backend: StorageBackend) -> (StorageConfig, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let path = tmp.path().join(backend.default_file_name());
    let config = StorageConfig {
        backend,
        path: Some(path.to_string_lossy().to_string()),
        ..StorageConfig::default()
    };
    (config, tmp)
}

/// Open `config` and load a store that confirms every prompt
#[allow(dead_code)]
pub fn open_store(config: &StorageConfig) -> SessionStore<RecordingView> {
    let storage = open_storage(config).expect("failed to open storage");
    SessionStore::load(
        storage,
        RecordingView::new(true),
        StoreOptions {
            key: config.key.clone(),
            ..StoreOptions::default()
        },
    )
}

/// Backend client pointed at a mock server
#[allow(dead_code)]
pub fn backend_client(base_url: &str, csrf_token: Option<&str>) -> BackendClient {
    let config = RemoteConfig {
        base_url: base_url.to_string(),
        csrf_token: csrf_token.map(str::to_string),
        timeout_seconds: Some(5),
        ..RemoteConfig::default()
    };
    BackendClient::new(&config).expect("valid backend config")
}

/// Path of a config file that does not exist, so defaults apply
#[allow(dead_code)]
pub fn missing_config(dir: &TempDir) -> PathBuf {
    dir.path().join("absent.yaml")
}
