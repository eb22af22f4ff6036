//! Colored terminal view used by the interactive chat

use crate::render::{
    format_list_time, format_message_time, list_rows, sanitize_terminal, terminal_label, ListRow,
    NoticeLevel, SessionView,
};
use crate::session::{Message, Role, Session};
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Terminal rendering of the session store
///
/// The session list plays the role of a sidebar: it is kept up to date on
/// every mutation but only printed on demand with [`TerminalView::print_list`].
pub struct TerminalView {
    rows: Vec<ListRow>,
    preview_max_chars: usize,
    assume_yes: bool,
}

impl TerminalView {
    /// Create a view whose list previews keep `preview_max_chars` characters
    pub fn new(preview_max_chars: usize) -> Self {
        Self {
            rows: Vec::new(),
            preview_max_chars,
            assume_yes: false,
        }
    }

    /// Answer every confirmation with yes (for `--yes` flags)
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Rows of the most recent list render
    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    /// Print the session list
    pub fn print_list(&self) {
        if self.rows.is_empty() {
            println!("{}", "No consultations yet".yellow());
            return;
        }

        println!("\n{}", "Consultations".bold());
        for row in &self.rows {
            let marker = if row.active { "▶".green().to_string() } else { " ".to_string() };
            println!(
                "{} {:>3}. {}  {}  {}",
                marker,
                row.index + 1,
                terminal_label(&row.title, 50).bold(),
                row.updated.dimmed(),
                row.count_label().dimmed()
            );
            if let Some(preview) = &row.preview {
                println!("        {}", terminal_label(preview, self.preview_max_chars).italic());
            }
        }
        println!();
    }

    fn print_message(message: &Message) {
        let header = match message.role {
            Role::Assistant => message.role.header().cyan().bold(),
            Role::User => message.role.header().green().bold(),
        };
        println!(
            "{} {}",
            header,
            format_message_time(&message.timestamp).dimmed()
        );
        println!("{}\n", sanitize_terminal(&message.content));
    }
}

impl SessionView for TerminalView {
    fn render_list(&mut self, sessions: &[Session], current: Option<usize>) {
        self.rows = list_rows(sessions, current, self.preview_max_chars);
        tracing::debug!("Session list refreshed: {} rows", self.rows.len());
    }

    fn render_detail(&mut self, session: &Session) {
        println!(
            "\n{} {}",
            "──".dimmed(),
            sanitize_terminal(&session.title).bold()
        );
        println!(
            "{}\n",
            format!("Last updated: {}", format_list_time(&session.updated_at)).dimmed()
        );
        for message in &session.messages {
            Self::print_message(message);
        }
    }

    fn append_message(&mut self, message: &Message) {
        Self::print_message(message);
    }

    fn show_welcome(&mut self) {
        println!("\n{}", "Welcome".bold());
        println!("{}", "Select or create a consultation".dimmed());
        println!(
            "Use {} to start, {} to browse, {} for quick actions.\n",
            "/new".cyan(),
            "/list".cyan(),
            "/help".cyan()
        );
    }

    fn notify(&mut self, level: NoticeLevel, text: &str) {
        let text = sanitize_terminal(text);
        match level {
            NoticeLevel::Success => println!("{}", text.green()),
            NoticeLevel::Info => println!("{}", text.cyan()),
            NoticeLevel::Warning => eprintln!("{}", text.yellow()),
            NoticeLevel::Error => eprintln!("{}", text.red()),
        }
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} [y/N] ", sanitize_terminal(prompt));
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_list_caches_rows() {
        let mut view = TerminalView::new(60);
        let sessions = vec![Session::new("A"), Session::new("B")];
        view.render_list(&sessions, Some(1));
        assert_eq!(view.rows().len(), 2);
        assert!(view.rows()[1].active);
    }

    #[test]
    fn test_assume_yes_confirms_without_input() {
        let mut view = TerminalView::new(60).assume_yes(true);
        assert!(view.confirm("Delete?"));
    }
}
