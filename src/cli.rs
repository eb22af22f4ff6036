//! Command-line interface definition for Clinchat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, session management, backend
//! status and logout.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Clinchat - Clinical genomics consultation assistant
///
/// Keeps consultation history on this machine and answers either with
/// simulated replies or through the consultation backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "clinchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Override the storage database location
    #[arg(long)]
    pub storage_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Clinchat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive consultation chat
    Chat {
        /// Use the consultation backend for replies and history
        #[arg(long, conflicts_with = "local")]
        remote: bool,

        /// Use simulated replies and local history only
        #[arg(long)]
        local: bool,

        /// Open the consultation at this list position (1-based)
        #[arg(short, long)]
        session: Option<usize>,
    },

    /// Manage saved consultations
    Sessions {
        /// Session management subcommand
        #[command(subcommand)]
        command: SessionsCommand,
    },

    /// Check whether the backend's language model is reachable
    Status,

    /// Log out of the backend and clear saved consultations
    Logout {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionsCommand {
    /// List saved consultations
    List,

    /// Print the full message log of a consultation
    Show {
        /// List position (1-based)
        index: usize,
    },

    /// Delete a consultation
    Delete {
        /// List position (1-based)
        index: usize,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export a consultation as a standalone HTML transcript
    Export {
        /// List position (1-based)
        index: usize,

        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_chat_defaults() {
        let cli = Cli::try_parse_from(["clinchat", "chat"]).unwrap();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        if let Commands::Chat {
            remote,
            local,
            session,
        } = cli.command
        {
            assert!(!remote);
            assert!(!local);
            assert!(session.is_none());
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_chat_remote_with_session() {
        let cli = Cli::try_parse_from(["clinchat", "chat", "--remote", "--session", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Chat {
                remote: true,
                session: Some(2),
                ..
            }
        ));
    }

    #[test]
    fn test_cli_remote_conflicts_with_local() {
        assert!(Cli::try_parse_from(["clinchat", "chat", "--remote", "--local"]).is_err());
    }

    #[test]
    fn test_cli_parse_sessions_delete_yes() {
        let cli = Cli::try_parse_from(["clinchat", "sessions", "delete", "3", "--yes"]).unwrap();
        if let Commands::Sessions {
            command: SessionsCommand::Delete { index, yes },
        } = cli.command
        {
            assert_eq!(index, 3);
            assert!(yes);
        } else {
            panic!("Expected sessions delete");
        }
    }

    #[test]
    fn test_cli_parse_export_output() {
        let cli =
            Cli::try_parse_from(["clinchat", "sessions", "export", "1", "-o", "out.html"]).unwrap();
        if let Commands::Sessions {
            command: SessionsCommand::Export { index, output },
        } = cli.command
        {
            assert_eq!(index, 1);
            assert_eq!(output, Some(PathBuf::from("out.html")));
        } else {
            panic!("Expected sessions export");
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "clinchat",
            "--verbose",
            "--json-logs",
            "--storage-path",
            "/tmp/x.sled",
            "status",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(cli.json_logs);
        assert_eq!(cli.storage_path.as_deref(), Some("/tmp/x.sled"));
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["clinchat"]).is_err());
    }
}
