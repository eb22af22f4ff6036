//! In-memory session collection mirrored to durable storage
//!
//! [`SessionStore`] owns the ordered session list, the current selection and
//! the storage handle. Every mutation follows the same order: change the
//! list, persist the whole array under one key, then redraw through the
//! [`SessionView`]. Persistence failures are reported to the view and never
//! roll back the in-memory change.

use crate::config::Config;
use crate::render::{NoticeLevel, SessionView};
use crate::reply::Reply;
use crate::session::{derive_title, Message, Role, Session};
use crate::storage::DurableStorage;
use std::collections::HashMap;

mod tickets;

pub use tickets::{ReplyOutcome, ReplyTicket};

/// Notice shown after a confirmed deletion
pub const DELETED_NOTICE: &str = "Consultation deleted successfully";

/// Notice shown when stored sessions could not be decoded
pub const DISCARDED_NOTICE: &str = "Saved consultations could not be read and were discarded";

/// Settings the store needs from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StoreOptions {
    /// Storage key holding the session array
    pub key: String,
    /// Characters of the first message kept in a derived title
    pub title_max_chars: usize,
}

impl StoreOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            key: config.storage.key.clone(),
            title_max_chars: config.chat.title_max_chars,
        }
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// The session store
///
/// Generic over its view so callers keep typed access to it through
/// [`SessionStore::view`].
pub struct SessionStore<V: SessionView> {
    sessions: Vec<Session>,
    current: Option<usize>,
    storage: Box<dyn DurableStorage>,
    options: StoreOptions,
    view: V,
    pending: HashMap<String, u64>,
    next_seq: u64,
}

impl<V: SessionView> SessionStore<V> {
    /// Load the persisted session array and draw the list
    ///
    /// Never fails. A read error, a value that is not a JSON array, or an
    /// array whose records do not decode all leave the store empty and
    /// notify the view.
    pub fn load(storage: Box<dyn DurableStorage>, view: V, options: StoreOptions) -> Self {
        let mut store = Self {
            sessions: Vec::new(),
            current: None,
            storage,
            options,
            view,
            pending: HashMap::new(),
            next_seq: 0,
        };

        match store.storage.get(&store.options.key) {
            Ok(Some(raw)) => match decode_sessions(&raw) {
                Ok(sessions) => {
                    tracing::info!("Loaded {} consultations", sessions.len());
                    store.sessions = sessions;
                }
                Err(reason) => {
                    tracing::warn!("Discarding stored consultations: {}", reason);
                    store.view.notify(NoticeLevel::Warning, DISCARDED_NOTICE);
                }
            },
            Ok(None) => tracing::debug!("No stored consultations under {}", store.options.key),
            Err(e) => {
                tracing::warn!("Failed to read stored consultations: {}", e);
                store.view.notify(
                    NoticeLevel::Error,
                    &format!("Failed to load consultations: {}", e),
                );
            }
        }

        store.render_list();
        store
    }

    /// Replace the whole collection, e.g. with the backend's history
    ///
    /// Clears the selection and any outstanding reply tickets.
    pub fn replace_sessions(&mut self, sessions: Vec<Session>) {
        self.sessions = sessions;
        self.current = None;
        self.pending.clear();
        self.persist();
        self.render_list();
    }

    /// Insert a new empty session at the front of the list
    ///
    /// With `auto_select` the new session becomes current and an empty log is
    /// drawn; otherwise the selection is cleared and the welcome view shown.
    /// Returns the new session's id.
    pub fn create(&mut self, auto_select: bool) -> String {
        let session = Session::new(Session::default_title(self.sessions.len() + 1));
        let id = session.id.clone();
        self.sessions.insert(0, session);
        tracing::debug!("Created consultation {}", id);

        self.current = if auto_select { Some(0) } else { None };
        self.persist();
        self.render_list();

        if auto_select {
            self.view.render_detail(&self.sessions[0]);
        } else {
            self.view.show_welcome();
        }
        id
    }

    /// Make the session at `index` current and draw its log
    ///
    /// Out-of-range indices are ignored and return false.
    pub fn select_session(&mut self, index: usize) -> bool {
        let Some(session) = self.sessions.get(index) else {
            return false;
        };
        self.current = Some(index);
        self.view.render_list(&self.sessions, self.current);
        self.view.render_detail(session);
        true
    }

    /// Append a message to the current session
    ///
    /// Returns `None` without side effects when nothing is selected.
    pub fn append_message(&mut self, role: Role, content: &str) -> Option<Message> {
        let index = self.current?;
        let message = Message::new(role, content);
        self.append_at(index, message.clone());
        Some(message)
    }

    fn append_at(&mut self, index: usize, message: Message) {
        let title_max_chars = self.options.title_max_chars;
        let session = &mut self.sessions[index];
        let first = session.push(message.clone());
        if first {
            session.title = derive_title(&message.content, title_max_chars);
        }

        self.persist();
        self.render_list();
        if self.current == Some(index) {
            self.view.append_message(&message);
        }
    }

    /// Ask the view to confirm deleting the session at `index`
    ///
    /// Returns the session id when confirmed, `None` when refused or when
    /// `index` is out of range.
    pub fn confirm_delete(&mut self, index: usize) -> Option<String> {
        let session = self.sessions.get(index)?;
        let id = session.id.clone();
        let prompt = format!(
            "Are you sure you want to delete \"{}\"? This action cannot be undone.",
            session.title
        );
        if self.view.confirm(&prompt) {
            Some(id)
        } else {
            tracing::debug!("Deletion of {} cancelled", id);
            None
        }
    }

    /// Remove the session with `id`, keeping the selection consistent
    ///
    /// Returns false if no such session exists.
    pub fn remove_session(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.sessions.remove(index);
        self.pending.remove(id);

        let cleared = match self.current {
            Some(c) if c == index => {
                self.current = None;
                true
            }
            Some(c) if c > index => {
                self.current = Some(c - 1);
                false
            }
            _ => false,
        };

        self.persist();
        self.render_list();
        if cleared {
            self.view.show_welcome();
        }
        self.view.notify(NoticeLevel::Success, DELETED_NOTICE);
        tracing::info!("Deleted consultation {}", id);
        true
    }

    /// Confirm and delete the session at `index`
    pub fn delete_session(&mut self, index: usize) -> bool {
        match self.confirm_delete(index) {
            Some(id) => self.remove_session(&id),
            None => false,
        }
    }

    /// Start a reply request for `session_id`
    ///
    /// Any earlier ticket for the same session is superseded.
    pub fn begin_reply(&mut self, session_id: &str) -> ReplyTicket {
        self.next_seq += 1;
        self.pending.insert(session_id.to_string(), self.next_seq);
        ReplyTicket {
            session_id: session_id.to_string(),
            seq: self.next_seq,
        }
    }

    /// Deliver the reply for `ticket` to the session it was issued for
    pub fn complete_reply(&mut self, ticket: &ReplyTicket, reply: Reply) -> ReplyOutcome {
        let Some(index) = self.position(&ticket.session_id) else {
            self.pending.remove(&ticket.session_id);
            tracing::debug!("Reply for deleted consultation {} dropped", ticket.session_id);
            return ReplyOutcome::SessionGone;
        };

        if self.pending.get(&ticket.session_id) != Some(&ticket.seq) {
            tracing::debug!("Reply {} for {} superseded", ticket.seq, ticket.session_id);
            return ReplyOutcome::Superseded;
        }
        self.pending.remove(&ticket.session_id);

        if let Some(remote_id) = reply.remote_session_id {
            self.sessions[index].remote_id = Some(remote_id);
        }

        let message = Message::assistant(reply.content);
        self.append_at(index, message.clone());
        ReplyOutcome::Appended(message)
    }

    /// True while a reply for `session_id` is outstanding
    pub fn is_awaiting_reply(&self, session_id: &str) -> bool {
        self.pending.contains_key(session_id)
    }

    /// Remove the persisted array from storage
    ///
    /// The in-memory list is left alone.
    pub fn clear_persisted(&mut self) -> crate::error::Result<()> {
        self.storage.remove(&self.options.key)
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Session> {
        self.sessions.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.current.and_then(|i| self.sessions.get(i))
    }

    /// Index of the session with `id`
    pub fn position(&self, id: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == id)
    }

    fn render_list(&mut self) {
        self.view.render_list(&self.sessions, self.current);
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.sessions)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.storage.set(&self.options.key, &json));

        if let Err(e) = result {
            tracing::warn!("Failed to save consultations to {}: {}", self.storage.describe(), e);
            self.view.notify(
                NoticeLevel::Error,
                &format!("Failed to save consultations: {}", e),
            );
        }
    }
}

/// Decode the persisted value, which must be a JSON array of sessions
fn decode_sessions(raw: &str) -> std::result::Result<Vec<Session>, String> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {}", e))?;
    if !value.is_array() {
        return Err("stored value is not an array".to_string());
    }
    serde_json::from_value(value).map_err(|e| format!("malformed session record: {}", e))
}
