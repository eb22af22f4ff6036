//! Session and message records
//!
//! A [`Session`] is one consultation thread with its own ordered message log.
//! Both types serialize to the camelCase JSON layout kept under the durable
//! storage key, so a saved array can be reloaded into an equal list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ulid::Ulid;

/// Marker appended to truncated titles and previews
pub const ELLIPSIS: &str = "...";

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The clinician typing into the chat
    User,
    /// The consultation assistant
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

impl Role {
    /// Header label shown above a message bubble
    pub fn header(&self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Clinical Genomics Assistant",
        }
    }
}

/// A single entry in a session's message log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Opaque identifier, generated when the message is appended
    #[serde(default = "new_id", deserialize_with = "opaque_id")]
    pub id: String,
    /// Who wrote the message
    pub role: Role,
    /// Raw, unescaped message text
    pub content: String,
    /// When the message was appended
    pub timestamp: DateTime<Utc>,
    /// Supporting references; only ever present on assistant messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<serde_json::Value>>,
}

impl Message {
    /// Create a message stamped with a fresh id and the current time
    ///
    /// Assistant messages carry an empty reference list, user messages none.
    ///
    /// # Examples
    ///
    /// ```
    /// use clinchat::session::{Message, Role};
    ///
    /// let msg = Message::new(Role::Assistant, "Consider panel testing.");
    /// assert_eq!(msg.references, Some(vec![]));
    /// assert!(Message::new(Role::User, "hi").references.is_none());
    /// ```
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            references: match role {
                Role::Assistant => Some(Vec::new()),
                Role::User => None,
            },
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// One chat conversation thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Time-based identifier, stable for the session's lifetime
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    /// Short display title
    pub title: String,
    /// Patient association; never set by this client
    #[serde(default)]
    pub patient_id: Option<String>,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Refreshed on every appended message
    pub updated_at: DateTime<Utc>,
    /// Backend `session_id` once the remote variant has assigned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    /// Append-only message log
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Session {
    /// Create an empty session with a fresh id
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            title: title.into(),
            patient_id: None,
            created_at: now,
            updated_at: now,
            remote_id: None,
            messages: Vec::new(),
        }
    }

    /// Title given to the `ordinal`-th session before any message arrives
    pub fn default_title(ordinal: usize) -> String {
        format!("New Consultation {}", ordinal)
    }

    /// Append a message, refreshing `updated_at`
    ///
    /// Returns true when this was the first message of the session; the
    /// caller derives the title in that case.
    pub(crate) fn push(&mut self, message: Message) -> bool {
        self.updated_at = message.timestamp;
        self.messages.push(message);
        self.messages.len() == 1
    }

    /// Number of messages in the log
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Truncated first message, used as the list preview
    pub fn preview(&self, max_chars: usize) -> Option<String> {
        self.messages
            .first()
            .map(|m| truncate_with_ellipsis(&m.content, max_chars))
    }
}

/// Derive a session title from the first message's content
///
/// # Examples
///
/// ```
/// use clinchat::session::derive_title;
///
/// assert_eq!(derive_title("BRCA1 c.68_69delAG", 5), "BRCA1...");
/// assert_eq!(derive_title("short", 50), "short");
/// ```
pub fn derive_title(content: &str, max_chars: usize) -> String {
    truncate_with_ellipsis(content, max_chars)
}

/// Keep the first `max_chars` characters, marking cut text with [`ELLIPSIS`]
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut out: String = text.chars().take(max_chars).collect();
        out.push_str(ELLIPSIS);
        out
    } else {
        text.to_string()
    }
}

/// Generate a new time-based identifier
pub fn new_id() -> String {
    Ulid::new().to_string()
}

/// Accept both string ids and the numeric millisecond ids older clients wrote
pub(crate) fn opaque_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
