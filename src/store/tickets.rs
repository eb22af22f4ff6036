use crate::session::Message;

/// Tags an outstanding reply request with its target session
///
/// Issued by [`SessionStore::begin_reply`](super::SessionStore::begin_reply).
/// Only the newest ticket for a session is honored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplyTicket {
    /// Local id of the session the reply belongs to
    pub session_id: String,
    /// Issue order across the store
    pub seq: u64,
}

/// What happened to a completed reply
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    /// The assistant message was appended to the ticket's session
    Appended(Message),
    /// The session was deleted while the reply was in flight
    SessionGone,
    /// A newer request for the same session replaced this one
    Superseded,
}

impl ReplyOutcome {
    /// True if the reply made it into the session log
    pub fn is_appended(&self) -> bool {
        matches!(self, Self::Appended(_))
    }
}
