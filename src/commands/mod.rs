/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`     — Interactive consultation chat
- `sessions` — List, show, delete and export saved consultations
- `status`   — One-shot backend status check
- `logout`   — Backend logout and removal of saved consultations

The handlers share [`build_controller`], which opens durable storage, loads
the session store and wires up reply generation for the selected mode.
*/

use crate::chat_mode::ReplyMode;
use crate::config::Config;
use crate::controller::ChatController;
use crate::error::Result;
use crate::remote::BackendClient;
use crate::render::SessionView;
use crate::reply::create_reply_generator;
use crate::storage::open_storage;
use crate::store::{SessionStore, StoreOptions};

// Special commands parser for the chat loop
pub mod special_commands;

// Saved consultation management
pub mod sessions;

/// Backend client for remote mode, `None` in local mode
pub fn backend_for(config: &Config, mode: ReplyMode) -> Result<Option<BackendClient>> {
    match mode {
        ReplyMode::Remote => Ok(Some(BackendClient::new(&config.remote)?)),
        ReplyMode::Local => Ok(None),
    }
}

/// Open storage, load the store into `view` and attach a reply generator
///
/// # Errors
///
/// Returns an error if storage cannot be opened or remote mode lacks a
/// backend client.
pub fn build_controller<V: SessionView>(
    config: &Config,
    mode: ReplyMode,
    view: V,
    backend: Option<BackendClient>,
) -> Result<ChatController<V>> {
    let storage = open_storage(&config.storage)?;
    let store = SessionStore::load(storage, view, StoreOptions::from_config(config));
    let replies = create_reply_generator(mode, &config.reply, backend.clone())?;
    Ok(ChatController::new(store, replies, backend, mode))
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Loads the consultations, optionally syncs them from the backend and
    //! runs a readline loop. Plain lines are sent as messages; lines starting
    //! with `/` are special commands.

    use super::*;
    use crate::chat_mode::{format_colored_prompt, BackendStatus};
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::render::{NoticeLevel, TerminalView};
    use crate::status::StatusMonitor;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::time::Duration;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `mode` - Optional override for the configured reply mode
    /// * `session` - Optional 1-based list position to open at startup
    pub async fn run_chat(
        config: Config,
        mode: Option<ReplyMode>,
        session: Option<usize>,
    ) -> Result<()> {
        let mode = mode.unwrap_or(config.reply.mode);
        tracing::info!("Starting interactive chat in {} mode", mode);

        let backend = backend_for(&config, mode)?;
        let monitor = backend.clone().map(|client| {
            StatusMonitor::spawn(
                client,
                Duration::from_secs(config.remote.status_poll_seconds),
            )
        });

        let view = TerminalView::new(config.chat.preview_max_chars);
        let mut chat = build_controller(&config, mode, view, backend)?;

        print_welcome_banner(mode);
        if mode == ReplyMode::Remote {
            chat.sync_history().await;
        }
        open_initial_session(&mut chat, session);

        let mut rl = DefaultEditor::new()?;
        let mut prefill: Option<&'static str> = None;

        loop {
            let status = monitor
                .as_ref()
                .map(|m| m.current())
                .unwrap_or_default();
            let title = chat.store().current_session().map(|s| s.title.clone());
            let prompt = format_colored_prompt(mode, status, title.as_deref());

            let line = match prefill.take() {
                Some(initial) => rl.readline_with_initial(&prompt, (initial, "")),
                None => rl.readline(&prompt),
            };

            match line {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::New) => {
                            chat.store_mut().create(true);
                            continue;
                        }
                        Ok(SpecialCommand::List) => {
                            chat.store().view().print_list();
                            continue;
                        }
                        Ok(SpecialCommand::Open(n)) => {
                            if !chat.store_mut().select_session(n - 1) {
                                warn_missing(&mut chat, n);
                            }
                            continue;
                        }
                        Ok(SpecialCommand::Delete(n)) => {
                            if chat.store().get(n - 1).is_none() {
                                warn_missing(&mut chat, n);
                            } else {
                                chat.delete_session(n - 1).await;
                            }
                            continue;
                        }
                        Ok(SpecialCommand::ShowStatus) => {
                            print_status_display(&chat, status);
                            continue;
                        }
                        Ok(SpecialCommand::Quick(action)) => {
                            tracing::debug!("Prefilling quick action: {}", action);
                            prefill = Some(action.template());
                            continue;
                        }
                        Ok(SpecialCommand::Logout) => {
                            if chat.logout().await {
                                break;
                            }
                            continue;
                        }
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {
                            // Regular message
                        }
                        Err(e) => {
                            eprintln!("{}", e.to_string().red());
                            continue;
                        }
                    }

                    rl.add_history_entry(trimmed)?;
                    chat.send_message(trimmed).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Choose what to show when the chat starts
    ///
    /// A requested position wins if it exists. Otherwise the first
    /// consultation opens; an empty local list gets a fresh, unselected
    /// consultation and the welcome view.
    fn open_initial_session(chat: &mut ChatController<TerminalView>, session: Option<usize>) {
        if let Some(n) = session {
            if n > 0 && chat.store_mut().select_session(n - 1) {
                return;
            }
            warn_missing(chat, n);
        }

        if !chat.store().is_empty() {
            chat.store_mut().select_session(0);
        } else if chat.mode() == ReplyMode::Local {
            chat.store_mut().create(false);
        } else {
            chat.store_mut().view_mut().show_welcome();
        }
    }

    fn warn_missing(chat: &mut ChatController<TerminalView>, n: usize) {
        chat.store_mut().view_mut().notify(
            NoticeLevel::Warning,
            &format!("No consultation at position {}", n),
        );
    }

    /// Display welcome banner at the start of interactive chat mode
    fn print_welcome_banner(mode: ReplyMode) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║        Clinical Genomics Assistant - Consultation Chat       ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Mode: {} ({})\n", mode.colored_tag(), mode.description());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    /// Display reply mode, backend status and the open consultation
    fn print_status_display(chat: &ChatController<TerminalView>, status: BackendStatus) {
        let mode = chat.mode();
        let store = chat.store();

        println!("\n{}", "Consultation Status".bold());
        println!("  Mode:          {} ({})", mode.colored_tag(), mode.description());
        if mode == ReplyMode::Remote {
            println!("  Backend:       {} {}", status.colored_dot(), status.label());
        }
        println!("  Consultations: {}", store.len());
        match store.current_session() {
            Some(session) => {
                println!(
                    "  Open:          {}",
                    crate::render::terminal_label(&session.title, 50).cyan()
                );
                println!("  Messages:      {}", session.message_count());
            }
            None => println!("  Open:          {}", "none".dimmed()),
        }
        println!();
    }
}

// Backend status command handler
pub mod status {
    use super::*;

    /// Check the backend once and print the result
    pub async fn run_status(config: &Config) -> Result<()> {
        let client = BackendClient::new(&config.remote)?;
        let status = client.check_status().await;
        println!("{} {}", status.colored_dot(), status.label());
        println!("Backend: {}", client.base_url());
        Ok(())
    }
}

// Logout command handler
pub mod logout {
    use super::*;
    use crate::render::TerminalView;

    /// Log out of the backend (remote mode) and clear saved consultations
    pub async fn run_logout(config: Config, yes: bool) -> Result<()> {
        let mode = config.reply.mode;
        let view = TerminalView::new(config.chat.preview_max_chars).assume_yes(yes);
        let backend = backend_for(&config, mode)?;
        let mut chat = build_controller(&config, mode, view, backend)?;
        if !chat.logout().await {
            tracing::info!("Logout did not complete");
        }
        Ok(())
    }
}
