//! Chat mode types and utilities
//!
//! This module defines how replies are produced during interactive chat:
//! - Local mode: canned replies after a short delay
//! - Remote mode: replies proxied through the consultation backend
//!
//! It also defines the backend reachability status shown next to the prompt.

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where assistant replies come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyMode {
    /// Canned replies generated in-process
    #[default]
    Local,

    /// Replies from the backend chat endpoint
    ///
    /// The backend is also the source of truth for session history and
    /// confirms deletions.
    Remote,
}

impl fmt::Display for ReplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "LOCAL"),
            Self::Remote => write!(f, "REMOTE"),
        }
    }
}

impl ReplyMode {
    /// Parse a reply mode from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use clinchat::chat_mode::ReplyMode;
    ///
    /// assert_eq!(ReplyMode::parse_str("Remote").unwrap(), ReplyMode::Remote);
    /// assert!(ReplyMode::parse_str("cloud").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(format!("Unknown reply mode: {}", other)),
        }
    }

    /// Get a user-friendly description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            Self::Local => "Simulated replies, history kept on this machine",
            Self::Remote => "Replies and history from the consultation backend",
        }
    }

    /// Get a colored tag representation of this mode
    pub fn colored_tag(&self) -> String {
        match self {
            Self::Local => format!("[{}]", "LOCAL".purple()),
            Self::Remote => format!("[{}]", "REMOTE".green()),
        }
    }
}

/// Reachability of the backend's language model service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    /// No check has completed yet
    #[default]
    Unknown,
    /// The status endpoint answered `online`
    Online,
    /// The status endpoint failed or answered anything else
    Offline,
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl BackendStatus {
    /// Status text shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "Checking Ollama...",
            Self::Online => "Ollama Connected",
            Self::Offline => "Ollama Disconnected",
        }
    }

    /// Colored status dot
    pub fn colored_dot(&self) -> String {
        match self {
            Self::Unknown => "●".dimmed().to_string(),
            Self::Online => "●".green().to_string(),
            Self::Offline => "●".red().to_string(),
        }
    }
}

/// Build the interactive prompt
///
/// Remote mode includes the backend status dot; local mode has nothing to
/// report.
pub fn format_colored_prompt(
    mode: ReplyMode,
    status: BackendStatus,
    title: Option<&str>,
) -> String {
    let title = title.map(|t| format!(" {}", t.cyan())).unwrap_or_default();
    match mode {
        ReplyMode::Local => format!("{}{} >> ", mode.colored_tag(), title),
        ReplyMode::Remote => format!(
            "{}{}{} >> ",
            mode.colored_tag(),
            status.colored_dot(),
            title
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_mode_display() {
        assert_eq!(ReplyMode::Local.to_string(), "LOCAL");
        assert_eq!(ReplyMode::Remote.to_string(), "REMOTE");
    }

    #[test]
    fn test_reply_mode_parse_case_insensitive() {
        assert_eq!(ReplyMode::parse_str("LOCAL").unwrap(), ReplyMode::Local);
        assert_eq!(ReplyMode::parse_str("remote").unwrap(), ReplyMode::Remote);
    }

    #[test]
    fn test_reply_mode_parse_invalid() {
        let err = ReplyMode::parse_str("hybrid").unwrap_err();
        assert!(err.contains("hybrid"));
    }

    #[test]
    fn test_reply_mode_serde_lowercase() {
        let yaml = serde_yaml::to_string(&ReplyMode::Remote).unwrap();
        assert!(yaml.contains("remote"));
        let mode: ReplyMode = serde_yaml::from_str("local").unwrap();
        assert_eq!(mode, ReplyMode::Local);
    }

    #[test]
    fn test_reply_mode_colored_tag_contains_name() {
        assert!(ReplyMode::Local.colored_tag().contains("LOCAL"));
        assert!(ReplyMode::Remote.colored_tag().contains("REMOTE"));
    }

    #[test]
    fn test_backend_status_labels() {
        assert_eq!(BackendStatus::Online.label(), "Ollama Connected");
        assert_eq!(BackendStatus::Offline.label(), "Ollama Disconnected");
        assert_eq!(BackendStatus::default(), BackendStatus::Unknown);
    }

    #[test]
    fn test_prompt_includes_title() {
        let prompt = format_colored_prompt(ReplyMode::Local, BackendStatus::Unknown, Some("BRCA1"));
        assert!(prompt.contains("BRCA1"));
        assert!(prompt.ends_with(">> "));
    }

    #[test]
    fn test_prompt_remote_includes_dot() {
        let prompt = format_colored_prompt(ReplyMode::Remote, BackendStatus::Online, None);
        assert!(prompt.contains('●'));
    }
}
