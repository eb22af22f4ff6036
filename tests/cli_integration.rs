//! Binary-level tests for the non-interactive commands

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use clinchat::session::Role;
use clinchat::storage::StorageBackend;
use common::{missing_config, open_store, temp_storage_config};

/// Command with defaults config, sqlite storage at `db` and no inherited overrides
fn clinchat(dir: &TempDir, db: &str) -> Command {
    let mut cmd = Command::cargo_bin("clinchat").expect("binary builds");
    cmd.env_remove("CLINCHAT_STORAGE_PATH")
        .env_remove("CLINCHAT_STORAGE_KEY")
        .env_remove("CLINCHAT_REPLY_MODE")
        .env_remove("CLINCHAT_BASE_URL")
        .env("CLINCHAT_STORAGE_BACKEND", "sqlite")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(missing_config(dir))
        .arg("--storage-path")
        .arg(db);
    cmd
}

/// Seed a sqlite database with one answered consultation
fn seeded_db() -> (TempDir, String) {
    let (config, tmp) = temp_storage_config(StorageBackend::Sqlite);
    {
        let mut store = open_store(&config);
        store.create(true);
        store.append_message(Role::User, "Hereditary <hemochromatosis> HFE C282Y");
        store.append_message(Role::Assistant, "Homozygosity warrants iron studies.");
    }
    let db = config.path.clone().expect("path set");
    (tmp, db)
}

#[test]
fn test_sessions_list_empty() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("empty.db").to_string_lossy().to_string();
    clinchat(&tmp, &db)
        .args(["sessions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No consultations found."));
}

#[test]
fn test_sessions_list_shows_seeded_title() {
    let (tmp, db) = seeded_db();
    clinchat(&tmp, &db)
        .args(["sessions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hereditary"))
        .stdout(predicate::str::contains("Consultations:"));
}

#[test]
fn test_sessions_show_out_of_range_fails() {
    let (tmp, db) = seeded_db();
    clinchat(&tmp, &db)
        .args(["sessions", "show", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No consultation at position 5"));
}

#[test]
fn test_sessions_show_prints_messages() {
    let (tmp, db) = seeded_db();
    clinchat(&tmp, &db)
        .args(["sessions", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Clinical Genomics Assistant"))
        .stdout(predicate::str::contains("iron studies"));
}

#[test]
fn test_sessions_export_escapes_html() {
    let (tmp, db) = seeded_db();
    let out = tmp.path().join("transcript.html");
    clinchat(&tmp, &db)
        .args(["sessions", "export", "1", "--output"])
        .arg(&out)
        .assert()
        .success();

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("&lt;hemochromatosis&gt;"));
    assert!(!html.contains("<hemochromatosis>"));
}

#[test]
fn test_sessions_delete_with_yes() {
    let (tmp, db) = seeded_db();
    clinchat(&tmp, &db)
        .args(["sessions", "delete", "1", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Consultation deleted successfully"));

    clinchat(&tmp, &db)
        .args(["sessions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No consultations found."));
}

#[test]
fn test_sessions_delete_declined_keeps_session() {
    let (tmp, db) = seeded_db();
    clinchat(&tmp, &db)
        .args(["sessions", "delete", "1"])
        .write_stdin("n\n")
        .assert()
        .success();

    clinchat(&tmp, &db)
        .args(["sessions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hereditary"));
}

#[test]
fn test_logout_yes_clears_local_sessions() {
    let (tmp, db) = seeded_db();
    clinchat(&tmp, &db)
        .args(["logout", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    clinchat(&tmp, &db)
        .args(["sessions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No consultations found."));
}

#[test]
fn test_status_unreachable_backend_reports_disconnected() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("s.db").to_string_lossy().to_string();
    clinchat(&tmp, &db)
        .env("CLINCHAT_BASE_URL", "http://127.0.0.1:9")
        .args(["status"])
        .timeout(std::time::Duration::from_secs(60))
        .assert()
        .success()
        .stdout(predicate::str::contains("Ollama Disconnected"));
}

#[test]
fn test_invalid_remote_base_url_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("s.db").to_string_lossy().to_string();
    clinchat(&tmp, &db)
        .env("CLINCHAT_REPLY_MODE", "remote")
        .env("CLINCHAT_BASE_URL", "ftp://example.org")
        .args(["sessions", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
