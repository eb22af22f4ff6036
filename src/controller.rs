//! Drives the session store from user actions
//!
//! [`ChatController`] is the one place where store mutations meet the
//! asynchronous parts: reply generation, backend deletes, history sync and
//! logout. The store itself stays synchronous.

use crate::chat_mode::ReplyMode;
use crate::remote::BackendClient;
use crate::render::{NoticeLevel, SessionView};
use crate::reply::{reply_or_fallback, ReplyGenerator, ReplyRequest};
use crate::session::Role;
use crate::store::{ReplyOutcome, SessionStore};

/// Notice shown when sending with nothing selected
pub const NO_SELECTION_NOTICE: &str = "No consultation selected. Use /new or /open <n>.";

/// Shown when a send arrives while the session still awaits its reply
pub const PENDING_REPLY_NOTICE: &str = "Still waiting for the previous reply";

/// Owns the store and the reply machinery for one chat
pub struct ChatController<V: SessionView> {
    store: SessionStore<V>,
    replies: Box<dyn ReplyGenerator>,
    backend: Option<BackendClient>,
    mode: ReplyMode,
}

impl<V: SessionView> ChatController<V> {
    /// Create a controller; `backend` is only consulted in remote mode
    pub fn new(
        store: SessionStore<V>,
        replies: Box<dyn ReplyGenerator>,
        backend: Option<BackendClient>,
        mode: ReplyMode,
    ) -> Self {
        Self {
            store,
            replies,
            backend,
            mode,
        }
    }

    pub fn store(&self) -> &SessionStore<V> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore<V> {
        &mut self.store
    }

    pub fn mode(&self) -> ReplyMode {
        self.mode
    }

    fn remote_backend(&self) -> Option<BackendClient> {
        match self.mode {
            ReplyMode::Remote => self.backend.clone(),
            ReplyMode::Local => None,
        }
    }

    /// Send `text` in the current session and wait for the reply
    ///
    /// Blank input, a missing selection or a reply still pending for the
    /// session are ignored (the latter two with a notice) and return `None`.
    /// Generation errors are replaced by the fallback reply, so an accepted
    /// send always ends with an assistant message.
    pub async fn send_message(&mut self, text: &str) -> Option<ReplyOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let Some(session) = self.store.current_session() else {
            self.store
                .view_mut()
                .notify(NoticeLevel::Warning, NO_SELECTION_NOTICE);
            return None;
        };
        let session_id = session.id.clone();
        let remote_session_id = session.remote_id.clone();

        if self.store.is_awaiting_reply(&session_id) {
            self.store
                .view_mut()
                .notify(NoticeLevel::Warning, PENDING_REPLY_NOTICE);
            return None;
        }

        self.store.append_message(Role::User, text)?;
        let ticket = self.store.begin_reply(&session_id);
        let request = ReplyRequest {
            session_id,
            remote_session_id,
            content: text.to_string(),
        };

        let reply = reply_or_fallback(self.replies.generate(&request).await);
        let outcome = self.store.complete_reply(&ticket, reply);
        tracing::debug!("Reply {} finished: {:?}", ticket.seq, outcome);
        Some(outcome)
    }

    /// Confirm and delete the session at `index`
    ///
    /// In remote mode a session the backend knows is deleted there first and
    /// kept locally if that fails.
    pub async fn delete_session(&mut self, index: usize) -> bool {
        let Some(id) = self.store.confirm_delete(index) else {
            return false;
        };

        let remote_id = self
            .store
            .get(index)
            .and_then(|s| s.remote_id.clone());
        if let (Some(backend), Some(remote_id)) = (self.remote_backend(), remote_id) {
            let result = backend.delete_chat(&remote_id).await;
            if let Err(e) = result {
                tracing::error!("Error deleting chat: {}", e);
                self.store
                    .view_mut()
                    .notify(NoticeLevel::Error, "Failed to delete chat.");
                return false;
            }
        }

        self.store.remove_session(&id)
    }

    /// Replace the store contents with the backend's history
    ///
    /// Returns false, leaving the local copy in place, when not in remote
    /// mode or when the backend cannot be read.
    pub async fn sync_history(&mut self) -> bool {
        let Some(backend) = self.remote_backend() else {
            return false;
        };

        match backend.history().await {
            Ok(history) => {
                let sessions = history
                    .into_iter()
                    .map(|remote| remote.into_session())
                    .collect::<Vec<_>>();
                tracing::info!("Loaded {} consultations from backend", sessions.len());
                self.store.replace_sessions(sessions);
                true
            }
            Err(e) => {
                tracing::error!("Failed to load chat history: {}", e);
                self.store.view_mut().notify(
                    NoticeLevel::Warning,
                    "Failed to load chat history from the backend; showing saved consultations",
                );
                false
            }
        }
    }

    /// Confirm, log out of the backend in remote mode, then clear saved sessions
    pub async fn logout(&mut self) -> bool {
        if !self
            .store
            .view_mut()
            .confirm("Are you sure you want to logout?")
        {
            return false;
        }

        if let Some(backend) = self.remote_backend() {
            let result = backend.logout().await;
            if let Err(e) = result {
                tracing::error!("Logout error: {}", e);
                self.store
                    .view_mut()
                    .notify(NoticeLevel::Error, "Logout failed. Please try again.");
                return false;
            }
        }

        if let Err(e) = self.store.clear_persisted() {
            tracing::error!("Failed to clear saved consultations: {}", e);
            self.store.view_mut().notify(
                NoticeLevel::Error,
                &format!("Failed to clear saved consultations: {}", e),
            );
            return false;
        }

        self.store
            .view_mut()
            .notify(NoticeLevel::Success, "Logged out");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingView;
    use crate::reply::{CannedReplies, Reply, FALLBACK_REPLY};
    use crate::storage::{DurableStorage, MemoryStorage};
    use crate::store::StoreOptions;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FailingReplies;

    #[async_trait]
    impl ReplyGenerator for FailingReplies {
        async fn generate(&self, _request: &ReplyRequest) -> crate::error::Result<Reply> {
            Err(anyhow::anyhow!("HTTP 500"))
        }
    }

    fn controller(
        replies: Box<dyn ReplyGenerator>,
    ) -> (ChatController<RecordingView>, MemoryStorage) {
        let storage = MemoryStorage::new();
        let store = SessionStore::load(
            Box::new(storage.clone()),
            RecordingView::new(true),
            StoreOptions::default(),
        );
        (
            ChatController::new(store, replies, None, ReplyMode::Local),
            storage,
        )
    }

    #[tokio::test]
    async fn test_send_appends_user_and_reply() {
        let (mut chat, _) = controller(Box::new(CannedReplies::with_seed(Duration::ZERO, 3)));
        chat.store_mut().create(true);
        let outcome = chat.send_message("BRCA1 c.68_69delAG").await.unwrap();
        assert!(outcome.is_appended());

        let session = chat.store().get(0).unwrap();
        assert_eq!(session.title, "BRCA1 c.68_69delAG");
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.preview(60).as_deref(), Some("BRCA1 c.68_69delAG"));
        assert!(!chat.store().is_awaiting_reply(&session.id));
    }

    #[tokio::test]
    async fn test_send_without_selection_notifies() {
        let (mut chat, _) = controller(Box::new(CannedReplies::new(Duration::ZERO)));
        chat.store_mut().create(false);
        assert!(chat.send_message("hello").await.is_none());
        assert_eq!(
            chat.store().view().notices().last().unwrap().1,
            NO_SELECTION_NOTICE
        );
    }

    #[tokio::test]
    async fn test_blank_send_is_ignored() {
        let (mut chat, _) = controller(Box::new(CannedReplies::new(Duration::ZERO)));
        chat.store_mut().create(true);
        assert!(chat.send_message("   ").await.is_none());
        assert_eq!(chat.store().get(0).unwrap().message_count(), 0);
    }

    #[tokio::test]
    async fn test_send_while_reply_pending_is_refused() {
        let (mut chat, storage) = controller(Box::new(CannedReplies::new(Duration::ZERO)));
        let id = chat.store_mut().create(true);
        let persisted = storage.get("clinicalChats").unwrap();
        chat.store_mut().begin_reply(&id);

        assert!(chat.send_message("second").await.is_none());
        assert_eq!(chat.store().get(0).unwrap().message_count(), 0);
        assert!(chat.store().is_awaiting_reply(&id));
        assert_eq!(storage.get("clinicalChats").unwrap(), persisted);
        assert_eq!(
            chat.store().view().notices(),
            &[(NoticeLevel::Warning, PENDING_REPLY_NOTICE.to_string())]
        );
    }

    #[tokio::test]
    async fn test_failed_generation_appends_fallback() {
        let (mut chat, _) = controller(Box::new(FailingReplies));
        chat.store_mut().create(true);
        chat.send_message("question").await.unwrap();
        let session = chat.store().get(0).unwrap();
        assert_eq!(session.messages[1].content, FALLBACK_REPLY);
        assert_eq!(session.messages[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_local_delete_skips_backend() {
        let (mut chat, _) = controller(Box::new(CannedReplies::new(Duration::ZERO)));
        chat.store_mut().create(true);
        assert!(chat.delete_session(0).await);
        assert!(chat.store().is_empty());
    }

    #[tokio::test]
    async fn test_sync_history_is_noop_in_local_mode() {
        let (mut chat, _) = controller(Box::new(CannedReplies::new(Duration::ZERO)));
        assert!(!chat.sync_history().await);
    }

    #[tokio::test]
    async fn test_logout_clears_storage_key() {
        let (mut chat, storage) = controller(Box::new(CannedReplies::new(Duration::ZERO)));
        chat.store_mut().create(true);
        assert!(chat.logout().await);
        assert!(storage.get("clinicalChats").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_refused_keeps_storage() {
        let (mut chat, storage) = controller(Box::new(CannedReplies::new(Duration::ZERO)));
        chat.store_mut().create(true);
        chat.store_mut().view_mut().set_confirm_answer(false);
        assert!(!chat.logout().await);
        assert!(storage.get("clinicalChats").unwrap().is_some());
    }
}
