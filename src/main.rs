//! Clinchat - Clinical genomics consultation assistant
//!
#![doc = "Main entry point for the Clinchat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clinchat::chat_mode::ReplyMode;
use clinchat::cli::{Cli, Commands};
use clinchat::commands;
use clinchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Chat {
            remote,
            local,
            session,
        } => {
            let mode = if remote {
                Some(ReplyMode::Remote)
            } else if local {
                Some(ReplyMode::Local)
            } else {
                None
            };
            if let Some(m) = &mode {
                tracing::debug!("Using reply mode override: {}", m);
            }
            if let Some(n) = session {
                tracing::debug!("Opening consultation {}", n);
            }

            if mode == Some(ReplyMode::Remote) {
                let mut remote_config = config.clone();
                remote_config.reply.mode = ReplyMode::Remote;
                remote_config.validate()?;
            }

            commands::chat::run_chat(config, mode, session).await?;
            Ok(())
        }
        Commands::Sessions { command } => {
            tracing::info!("Starting sessions command");
            commands::sessions::handle_sessions(config, command).await?;
            Ok(())
        }
        Commands::Status => {
            commands::status::run_status(&config).await?;
            Ok(())
        }
        Commands::Logout { yes } => {
            tracing::info!("Starting logout");
            commands::logout::run_logout(config, yes).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins over `--verbose`. Logs go to stderr so they never mix
/// with exported transcripts on stdout.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "clinchat=debug" } else { "clinchat=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
