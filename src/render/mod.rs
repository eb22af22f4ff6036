//! Rendering boundary between the session store and the screen
//!
//! The store never prints. Every visible effect of a mutation goes through a
//! [`SessionView`]. Message text reaches a view unescaped, and each view must
//! escape it for its own output medium: [`escape_html`] for markup,
//! [`sanitize_terminal`] for terminals. There is no path that writes
//! user or assistant text out raw.

use crate::session::{truncate_with_ellipsis, Message, Session};
use chrono::{DateTime, Local, TimeZone, Utc};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

pub mod html;
pub mod recording;
pub mod terminal;

pub use recording::{RecordingView, ViewEvent};
pub use terminal::TerminalView;

/// Format used for list timestamps, e.g. `Mar 4, 09:15 AM`
pub const LIST_TIME_FORMAT: &str = "%b %-d, %I:%M %p";

/// Format used for message timestamps, e.g. `09:15 AM`
pub const MESSAGE_TIME_FORMAT: &str = "%I:%M %p";

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Output side of the session store
///
/// Implementations receive raw session data and are responsible for
/// escaping it before display.
pub trait SessionView: Send {
    /// Redraw the session list with `current` highlighted
    fn render_list(&mut self, sessions: &[Session], current: Option<usize>);

    /// Replace the detail area with the full log of `session`
    fn render_detail(&mut self, session: &Session);

    /// Add a single message to the detail area
    fn append_message(&mut self, message: &Message);

    /// Show the placeholder shown when no session is selected
    fn show_welcome(&mut self);

    /// Show a transient notification
    fn notify(&mut self, level: NoticeLevel, text: &str);

    /// Ask the user to confirm a destructive action
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// One row of the session list, before escaping
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    /// Position in the list (0-based)
    pub index: usize,
    pub title: String,
    /// `updated_at` formatted with [`LIST_TIME_FORMAT`] in local time
    pub updated: String,
    pub message_count: usize,
    /// Truncated first message, if any
    pub preview: Option<String>,
    pub active: bool,
}

impl ListRow {
    /// `"{n} messages"` label
    pub fn count_label(&self) -> String {
        format!("{} messages", self.message_count)
    }
}

/// Build list rows for `sessions`
pub fn list_rows(
    sessions: &[Session],
    current: Option<usize>,
    preview_max_chars: usize,
) -> Vec<ListRow> {
    sessions
        .iter()
        .enumerate()
        .map(|(index, session)| ListRow {
            index,
            title: session.title.clone(),
            updated: format_list_time(&session.updated_at),
            message_count: session.message_count(),
            preview: session.preview(preview_max_chars),
            active: current == Some(index),
        })
        .collect()
}

/// Format a list timestamp in local time
pub fn format_list_time(dt: &DateTime<Utc>) -> String {
    format_in(dt, &Local, LIST_TIME_FORMAT)
}

/// Format a message timestamp in local time
pub fn format_message_time(dt: &DateTime<Utc>) -> String {
    format_in(dt, &Local, MESSAGE_TIME_FORMAT)
}

fn format_in<Tz>(dt: &DateTime<Utc>, tz: &Tz, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    dt.with_timezone(tz).format(format).to_string()
}

/// Escape text for insertion into HTML markup
///
/// # Examples
///
/// ```
/// use clinchat::render::escape_html;
///
/// assert_eq!(
///     escape_html(r#"<img src=x onerror="alert('1')">"#),
///     "&lt;img src=x onerror=&quot;alert(&#39;1&#39;)&quot;&gt;"
/// );
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn ansi_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // CSI sequences, OSC sequences (BEL or ST terminated), then lone two-byte escapes
        Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-Z\\-_]")
            .expect("ANSI escape pattern is valid")
    })
}

/// Strip terminal escape sequences and control characters from text
///
/// Newlines and tabs are kept.
///
/// # Examples
///
/// ```
/// use clinchat::render::sanitize_terminal;
///
/// assert_eq!(sanitize_terminal("\x1b[31mred\x1b[0m\tok\n"), "red\tok\n");
/// ```
pub fn sanitize_terminal(text: &str) -> String {
    ansi_pattern()
        .replace_all(text, "")
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Truncate then sanitize a one-line label for terminal display
pub fn terminal_label(text: &str, max_chars: usize) -> String {
    let single_line = text.replace(['\n', '\r', '\t'], " ");
    sanitize_terminal(&truncate_with_ellipsis(&single_line, max_chars))
}
