//! Configuration management for Clinchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::chat_mode::ReplyMode;
use crate::error::{ClinchatError, Result};
use crate::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Clinchat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Durable storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Reply generation settings
    #[serde(default)]
    pub reply: ReplyConfig,
    /// Session list and title settings
    #[serde(default)]
    pub chat: ChatConfig,
    /// Remote backend settings
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Durable storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage engine
    #[serde(default)]
    pub backend: StorageBackend,

    /// Database location; defaults to the platform data directory
    #[serde(default)]
    pub path: Option<String>,

    /// Key holding the serialized session array
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    "clinicalChats".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            key: default_storage_key(),
        }
    }
}

/// Reply generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyConfig {
    /// Local canned replies or the remote backend
    #[serde(default)]
    pub mode: ReplyMode,

    /// Simulated thinking time for local replies (milliseconds)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    1000
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            mode: ReplyMode::default(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// Session list configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Characters of the first message kept in a derived title
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,

    /// Characters of the first message shown as the list preview
    #[serde(default = "default_preview_max_chars")]
    pub preview_max_chars: usize,
}

fn default_title_max_chars() -> usize {
    50
}

fn default_preview_max_chars() -> usize {
    60
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            title_max_chars: default_title_max_chars(),
            preview_max_chars: default_preview_max_chars(),
        }
    }
}

/// Remote backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Backend origin, e.g. `http://localhost:8000`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value sent in the `X-CSRFToken` header on delete and logout
    #[serde(default)]
    pub csrf_token: Option<String>,

    /// Interval between backend status checks (seconds)
    #[serde(default = "default_status_poll_seconds")]
    pub status_poll_seconds: u64,

    /// Request timeout; unset leaves the HTTP client default in place
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_status_poll_seconds() -> u64 {
    30
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            csrf_token: None,
            status_poll_seconds: default_status_poll_seconds(),
            timeout_seconds: None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ClinchatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ClinchatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(backend) = std::env::var("CLINCHAT_STORAGE_BACKEND") {
            match StorageBackend::parse_str(&backend) {
                Ok(value) => self.storage.backend = value,
                Err(e) => tracing::warn!("Invalid CLINCHAT_STORAGE_BACKEND: {}", e),
            }
        }

        if let Ok(path) = std::env::var("CLINCHAT_STORAGE_PATH") {
            self.storage.path = Some(path);
        }

        if let Ok(key) = std::env::var("CLINCHAT_STORAGE_KEY") {
            self.storage.key = key;
        }

        if let Ok(mode) = std::env::var("CLINCHAT_REPLY_MODE") {
            match ReplyMode::parse_str(&mode) {
                Ok(value) => self.reply.mode = value,
                Err(e) => tracing::warn!("Invalid CLINCHAT_REPLY_MODE: {}", e),
            }
        }

        if let Ok(delay) = std::env::var("CLINCHAT_REPLY_DELAY_MS") {
            if let Ok(value) = delay.parse() {
                self.reply.delay_ms = value;
            } else {
                tracing::warn!("Invalid CLINCHAT_REPLY_DELAY_MS: {}", delay);
            }
        }

        if let Ok(base_url) = std::env::var("CLINCHAT_BASE_URL") {
            self.remote.base_url = base_url;
        }

        if let Ok(token) = std::env::var("CLINCHAT_CSRF_TOKEN") {
            self.remote.csrf_token = Some(token);
        }

        if let Ok(poll) = std::env::var("CLINCHAT_STATUS_POLL_SECONDS") {
            if let Ok(value) = poll.parse() {
                self.remote.status_poll_seconds = value;
            } else {
                tracing::warn!("Invalid CLINCHAT_STATUS_POLL_SECONDS: {}", poll);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(path) = &cli.storage_path {
            tracing::info!("Using storage path override from CLI: {}", path);
            self.storage.path = Some(path.clone());
        }

        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ClinchatError::Config` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(ClinchatError::Config("storage.key cannot be empty".to_string()).into());
        }

        if self.chat.title_max_chars == 0 {
            return Err(ClinchatError::Config(
                "chat.title_max_chars must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.preview_max_chars == 0 {
            return Err(ClinchatError::Config(
                "chat.preview_max_chars must be greater than 0".to_string(),
            )
            .into());
        }

        if self.remote.status_poll_seconds == 0 {
            return Err(ClinchatError::Config(
                "remote.status_poll_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.remote.timeout_seconds == Some(0) {
            return Err(ClinchatError::Config(
                "remote.timeout_seconds must be greater than 0 when set".to_string(),
            )
            .into());
        }

        if self.reply.mode == ReplyMode::Remote {
            let parsed = url::Url::parse(&self.remote.base_url).map_err(|e| {
                ClinchatError::Config(format!(
                    "Invalid remote.base_url {}: {}",
                    self.remote.base_url, e
                ))
            })?;

            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ClinchatError::Config(format!(
                    "remote.base_url must use http or https, got {}",
                    parsed.scheme()
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn bare_cli() -> crate::cli::Cli {
        crate::cli::Cli {
            config: None,
            verbose: false,
            json_logs: false,
            storage_path: None,
            command: crate::cli::Commands::Status,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.backend, StorageBackend::Sled);
        assert_eq!(config.storage.key, "clinicalChats");
        assert_eq!(config.reply.mode, ReplyMode::Local);
        assert_eq!(config.reply.delay_ms, 1000);
        assert_eq!(config.chat.title_max_chars, 50);
        assert_eq!(config.remote.status_poll_seconds, 30);
        assert!(config.remote.timeout_seconds.is_none());
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_key() {
        let mut config = Config::default();
        config.storage.key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_title_length() {
        let mut config = Config::default();
        config.chat.title_max_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_poll_interval() {
        let mut config = Config::default();
        config.remote.status_poll_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_remote_requires_http_url() {
        let mut config = Config::default();
        config.reply.mode = ReplyMode::Remote;
        config.remote.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.remote.base_url = "ftp://example.org".to_string();
        assert!(config.validate().is_err());

        config.remote.base_url = "https://consult.example.org".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_local_ignores_base_url() {
        let mut config = Config::default();
        config.remote.base_url = "not a url".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
storage:
  backend: sqlite
  path: /var/lib/clinchat/sessions.db
  key: progenicsChats
reply:
  mode: remote
  delay_ms: 250
chat:
  title_max_chars: 30
remote:
  base_url: http://127.0.0.1:8000
  csrf_token: abc123
  status_poll_seconds: 10
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.key, "progenicsChats");
        assert_eq!(config.reply.mode, ReplyMode::Remote);
        assert_eq!(config.reply.delay_ms, 250);
        assert_eq!(config.chat.title_max_chars, 30);
        assert_eq!(config.chat.preview_max_chars, 60);
        assert_eq!(config.remote.csrf_token.as_deref(), Some("abc123"));
        assert_eq!(config.remote.status_poll_seconds, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.storage.key, "clinicalChats");
        assert_eq!(config.reply.mode, ReplyMode::Local);
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        let config = Config::load("nonexistent.yaml", &bare_cli()).unwrap();
        assert_eq!(config.storage.key, "clinicalChats");
    }

    #[test]
    #[serial]
    fn test_load_applies_cli_storage_path() {
        let mut cli = bare_cli();
        cli.storage_path = Some("/tmp/clinchat-test.sled".to_string());
        let config = Config::load("nonexistent.yaml", &cli).unwrap();
        assert_eq!(
            config.storage.path.as_deref(),
            Some("/tmp/clinchat-test.sled")
        );
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_overrides_fields() {
        std::env::set_var("CLINCHAT_STORAGE_BACKEND", "memory");
        std::env::set_var("CLINCHAT_REPLY_MODE", "remote");
        std::env::set_var("CLINCHAT_REPLY_DELAY_MS", "5");
        std::env::set_var("CLINCHAT_BASE_URL", "http://backend:9000");
        std::env::set_var("CLINCHAT_CSRF_TOKEN", "tok");

        let mut config = Config::default();
        config.apply_env_vars();

        std::env::remove_var("CLINCHAT_STORAGE_BACKEND");
        std::env::remove_var("CLINCHAT_REPLY_MODE");
        std::env::remove_var("CLINCHAT_REPLY_DELAY_MS");
        std::env::remove_var("CLINCHAT_BASE_URL");
        std::env::remove_var("CLINCHAT_CSRF_TOKEN");

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.reply.mode, ReplyMode::Remote);
        assert_eq!(config.reply.delay_ms, 5);
        assert_eq!(config.remote.base_url, "http://backend:9000");
        assert_eq!(config.remote.csrf_token.as_deref(), Some("tok"));
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_ignores_invalid_values() {
        std::env::set_var("CLINCHAT_STORAGE_BACKEND", "redis");
        std::env::set_var("CLINCHAT_REPLY_DELAY_MS", "soon");

        let mut config = Config::default();
        config.apply_env_vars();

        std::env::remove_var("CLINCHAT_STORAGE_BACKEND");
        std::env::remove_var("CLINCHAT_REPLY_DELAY_MS");

        assert_eq!(config.storage.backend, StorageBackend::Sled);
        assert_eq!(config.reply.delay_ms, 1000);
    }
}
