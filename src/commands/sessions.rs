use crate::cli::SessionsCommand;
use crate::commands::{backend_for, build_controller};
use crate::config::Config;
use crate::error::{ClinchatError, Result};
use crate::render::{html, terminal_label, SessionView, TerminalView};
use colored::Colorize;
use prettytable::{format, Table};

/// Handle `sessions` subcommands
///
/// Positions are 1-based, matching the list output.
pub async fn handle_sessions(config: Config, command: SessionsCommand) -> Result<()> {
    let assume_yes = matches!(command, SessionsCommand::Delete { yes: true, .. });
    let mode = config.reply.mode;
    let view = TerminalView::new(config.chat.preview_max_chars).assume_yes(assume_yes);
    let backend = backend_for(&config, mode)?;
    let mut chat = build_controller(&config, mode, view, backend)?;

    match command {
        SessionsCommand::List => {
            let store = chat.store();
            if store.is_empty() {
                println!("{}", "No consultations found.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
            table.add_row(prettytable::row![
                "#".bold(),
                "Title".bold(),
                "Messages".bold(),
                "Last Updated".bold(),
                "Preview".bold()
            ]);

            for row in store.view().rows() {
                table.add_row(prettytable::row![
                    (row.index + 1).to_string().cyan(),
                    terminal_label(&row.title, 40),
                    row.message_count,
                    row.updated,
                    row.preview
                        .as_deref()
                        .map(|p| terminal_label(p, 40))
                        .unwrap_or_else(|| "-".to_string())
                ]);
            }

            println!("\nConsultations:");
            table.printstd();
            println!();
            println!(
                "Use {} to continue a consultation.",
                "clinchat chat --session <#>".cyan()
            );
            println!();
        }
        SessionsCommand::Show { index } => {
            let position = to_position(index)?;
            if !chat.store_mut().select_session(position) {
                return Err(ClinchatError::NotFound(index).into());
            }
        }
        SessionsCommand::Delete { index, .. } => {
            let position = to_position(index)?;
            if chat.store().get(position).is_none() {
                return Err(ClinchatError::NotFound(index).into());
            }
            if !chat.delete_session(position).await {
                tracing::info!("Consultation {} was not deleted", index);
            }
        }
        SessionsCommand::Export { index, output } => {
            let position = to_position(index)?;
            let session = chat
                .store()
                .get(position)
                .ok_or(ClinchatError::NotFound(index))?;
            let document = html::transcript(session);
            match output {
                Some(path) => {
                    std::fs::write(&path, document)?;
                    chat.store_mut().view_mut().notify(
                        crate::render::NoticeLevel::Success,
                        &format!("Exported to {}", path.display()),
                    );
                }
                None => print!("{}", document),
            }
        }
    }

    Ok(())
}

/// Convert a 1-based list position to an index
fn to_position(index: usize) -> Result<usize> {
    index
        .checked_sub(1)
        .ok_or_else(|| ClinchatError::NotFound(index).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_position_is_one_based() {
        assert_eq!(to_position(1).unwrap(), 0);
        assert_eq!(to_position(4).unwrap(), 3);
        assert!(to_position(0).is_err());
    }
}
