//! Assistant reply generation
//!
//! A [`ReplyGenerator`] turns the user's text into the assistant's answer.
//! The local variant picks a canned reply after a short delay; the remote
//! variant asks the backend chat endpoint. Callers never see a failed reply:
//! [`reply_or_fallback`] substitutes a fixed message for any error.

use crate::chat_mode::ReplyMode;
use crate::config::ReplyConfig;
use crate::error::{ClinchatError, Result};
use crate::remote::BackendClient;
use async_trait::async_trait;
use std::time::Duration;

pub mod canned;
pub mod remote;

pub use canned::CannedReplies;
pub use remote::RemoteReplies;

/// Reply substituted when generation fails for any reason
pub const FALLBACK_REPLY: &str = "⚠️ Failed to get a response. Please try again.";

/// What the generator is asked to answer
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyRequest {
    /// Local id of the session the reply is for
    pub session_id: String,
    /// Backend session id, once one has been assigned
    pub remote_session_id: Option<String>,
    /// The user's message text
    pub content: String,
}

/// A generated assistant reply
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub content: String,
    /// Backend session id returned alongside the answer
    pub remote_session_id: Option<String>,
}

impl Reply {
    /// A reply with no backend session attached
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            remote_session_id: None,
        }
    }
}

/// Produces assistant replies
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Generate the reply to `request`
    async fn generate(&self, request: &ReplyRequest) -> Result<Reply>;
}

/// Use the generated reply, or [`FALLBACK_REPLY`] if generation failed
///
/// # Examples
///
/// ```
/// use clinchat::reply::{reply_or_fallback, Reply, FALLBACK_REPLY};
///
/// let failed: clinchat::error::Result<Reply> = Err(anyhow::anyhow!("HTTP 502"));
/// assert_eq!(reply_or_fallback(failed).content, FALLBACK_REPLY);
/// ```
pub fn reply_or_fallback(result: Result<Reply>) -> Reply {
    match result {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("Send failed: {}", e);
            Reply::text(FALLBACK_REPLY)
        }
    }
}

/// Create the reply generator for `mode`
///
/// # Errors
///
/// Returns `ClinchatError::Config` if remote mode is requested without a
/// backend client.
pub fn create_reply_generator(
    mode: ReplyMode,
    config: &ReplyConfig,
    client: Option<BackendClient>,
) -> Result<Box<dyn ReplyGenerator>> {
    match mode {
        ReplyMode::Local => Ok(Box::new(CannedReplies::new(Duration::from_millis(
            config.delay_ms,
        )))),
        ReplyMode::Remote => {
            let client = client.ok_or_else(|| {
                ClinchatError::Config("Remote reply mode requires a backend client".to_string())
            })?;
            Ok(Box::new(RemoteReplies::new(client)))
        }
    }
}
