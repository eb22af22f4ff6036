//! Special commands parser for interactive chat mode
//!
//! Lines starting with `/` are commands rather than messages. They manage
//! consultations (`/new`, `/list`, `/open`, `/delete`), prefill quick-action
//! prompts, show backend status, log out and leave the chat. `exit` and
//! `quit` work without the slash. Commands are case-insensitive.

use crate::prompts::QuickAction;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unusable argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a new consultation and open it
    New,

    /// Show the consultation list
    List,

    /// Open the consultation at a 1-based list position
    Open(usize),

    /// Delete the consultation at a 1-based list position
    Delete(usize),

    /// Show reply mode, backend status and the open consultation
    ShowStatus,

    /// Prefill the input with a quick-action template
    Quick(QuickAction),

    /// Log out and clear saved consultations
    Logout,

    /// Display help information
    Help,

    /// Leave the chat
    Exit,

    /// Not a special command; send the line as a message
    None,
}

/// Parse user input into a special command
///
/// # Errors
///
/// Returns `CommandError` for unknown commands, missing positions and
/// positions that are not positive integers.
///
/// # Examples
///
/// ```
/// use clinchat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/open 2").unwrap(), SpecialCommand::Open(2));
/// assert_eq!(parse_special_command("quit").unwrap(), SpecialCommand::Exit);
/// assert_eq!(parse_special_command("BRCA1?").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let mut parts = lower.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let arg = parts.next();

    match command {
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        "/new" => Ok(SpecialCommand::New),
        "/list" | "/ls" => Ok(SpecialCommand::List),
        "/open" => parse_position("/open", arg).map(SpecialCommand::Open),
        "/delete" | "/rm" => parse_position("/delete", arg).map(SpecialCommand::Delete),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/logout" => Ok(SpecialCommand::Logout),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        other => QuickAction::ALL
            .into_iter()
            .find(|action| action.command() == other)
            .map(SpecialCommand::Quick)
            .ok_or_else(|| CommandError::UnknownCommand(trimmed.to_string())),
    }
}

fn parse_position(command: &str, arg: Option<&str>) -> Result<usize, CommandError> {
    let Some(arg) = arg else {
        return Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: format!("{} <n>", command),
        });
    };

    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        }),
    }
}

/// Print the chat help text
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

CONSULTATIONS:
  /new            - Start a new consultation
  /list           - Show all consultations
  /open <n>       - Open consultation number n from the list
  /delete <n>     - Delete consultation number n (asks for confirmation)

QUICK ACTIONS:
  /variant        - Interpret the following genetic variant: ...
  /risk           - Provide a risk assessment for: ...
  /guidelines     - What are the treatment guidelines for: ...

SESSION:
  /status         - Show reply mode, backend status and open consultation
  /logout         - Log out and clear saved consultations
  /help           - Show this help message
  exit, quit      - Leave the chat

Anything else is sent to the assistant as a message.
"#
    );
}
