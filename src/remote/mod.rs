//! HTTP client for the consultation backend
//!
//! The backend owns session history in remote mode. This client covers the
//! five endpoints the chat uses: history, chat, delete, model status and
//! logout. Mutating calls carry the CSRF token both as the `X-CSRFToken`
//! header and as the `csrftoken` cookie, which is what the backend checks.

use crate::chat_mode::BackendStatus;
use crate::config::RemoteConfig;
use crate::error::{ClinchatError, Result};
use crate::session::{opaque_id, Message, Role, Session};
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use url::Url;

const HISTORY_PATH: &str = "api/chat/history/";
const CHAT_PATH: &str = "api/chat/";
const STATUS_PATH: &str = "api/ollama/status/";
const LOGOUT_PATH: &str = "api/logout/";

/// A session as returned by `GET /api/chat/history/`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteSession {
    #[serde(default, deserialize_with = "optional_id")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub messages: Vec<RemoteMessage>,
}

/// A message inside a [`RemoteSession`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteMessage {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl RemoteSession {
    /// Convert into a local session record
    ///
    /// The backend id doubles as the local id. Sessions the backend never
    /// titled get `Session {id}`. Unparseable timestamps fall back to now.
    pub fn into_session(self) -> Session {
        let now = Utc::now();
        let created_at = self
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(now);

        let mut session = Session::new(String::new());
        if let Some(id) = &self.session_id {
            session.id = id.clone();
        }
        session.title = match (&self.title, &self.session_id) {
            (Some(title), _) if !title.is_empty() => title.clone(),
            (_, Some(id)) => format!("Session {}", id),
            _ => "Untitled consultation".to_string(),
        };
        session.created_at = created_at;
        session.updated_at = created_at;
        session.remote_id = self.session_id;

        for remote in self.messages {
            let mut message = Message::new(remote.role, remote.content);
            message.timestamp = remote
                .timestamp
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or(created_at);
            session.updated_at = session.updated_at.max(message.timestamp);
            session.messages.push(message);
        }
        session
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    session_id: Option<&'a str>,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default, deserialize_with = "optional_id")]
    session_id: Option<String>,
    #[serde(default)]
    answer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: Option<String>,
}

/// The backend's answer to a chat message
#[derive(Debug, Clone, PartialEq)]
pub struct ChatAnswer {
    /// Session the backend filed the exchange under
    pub session_id: Option<String>,
    pub answer: String,
}

/// Client for the consultation backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base: Url,
    csrf_token: Option<String>,
}

impl BackendClient {
    /// Create a client for `config.base_url`
    ///
    /// # Errors
    ///
    /// Returns `ClinchatError::Config` for an invalid base URL and
    /// `ClinchatError::Remote` if the HTTP client cannot be built.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let mut base = Url::parse(&config.base_url)
            .map_err(|e| ClinchatError::Config(format!("Invalid backend URL: {}", e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|e| ClinchatError::Remote(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base,
            csrf_token: config.csrf_token.clone(),
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| ClinchatError::Remote(format!("Invalid endpoint {}: {}", path, e)).into())
    }

    fn with_csrf(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.csrf_token {
            Some(token) => request
                .header("X-CSRFToken", token)
                .header(reqwest::header::COOKIE, format!("csrftoken={}", token)),
            None => request,
        }
    }

    async fn send(request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("{} request failed: {}", what, e);
            ClinchatError::Remote(format!("{} request failed: {}", what, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("{} returned HTTP {}: {}", what, status, body);
            return Err(ClinchatError::Remote(format!("{} failed: HTTP {}", what, status)).into());
        }
        Ok(response)
    }

    /// Fetch every session the backend knows about
    pub async fn history(&self) -> Result<Vec<RemoteSession>> {
        let url = self.endpoint(HISTORY_PATH)?;
        tracing::debug!("Fetching history from {}", url);
        let response = Self::send(self.client.get(url), "History").await?;
        response
            .json::<Vec<RemoteSession>>()
            .await
            .map_err(|e| ClinchatError::Remote(format!("Failed to parse history: {}", e)).into())
    }

    /// Send `content` in the backend session `session_id`
    ///
    /// A `None` session id asks the backend to open a new session.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx statuses and responses without an
    /// `answer`.
    pub async fn chat(&self, session_id: Option<&str>, content: &str) -> Result<ChatAnswer> {
        let url = self.endpoint(CHAT_PATH)?;
        let body = ChatRequest {
            session_id,
            content,
        };
        let response = Self::send(self.with_csrf(self.client.post(url).json(&body)), "Chat").await?;
        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClinchatError::Remote(format!("Failed to parse chat response: {}", e)))?;

        match data.answer {
            Some(answer) if !answer.is_empty() => Ok(ChatAnswer {
                session_id: data.session_id,
                answer,
            }),
            _ => Err(ClinchatError::Remote("Invalid response format".to_string()).into()),
        }
    }

    /// Delete the backend session `session_id`
    ///
    /// Any 2xx status counts as deleted.
    pub async fn delete_chat(&self, session_id: &str) -> Result<()> {
        let url = self.endpoint(&format!("api/delete-chat/{}/", session_id))?;
        Self::send(self.with_csrf(self.client.delete(url)), "Delete").await?;
        tracing::info!("Backend deleted session {}", session_id);
        Ok(())
    }

    /// Query the language model status endpoint
    pub async fn status(&self) -> Result<BackendStatus> {
        let url = self.endpoint(STATUS_PATH)?;
        let response = Self::send(self.client.get(url), "Status").await?;
        let data: StatusResponse = response
            .json()
            .await
            .map_err(|e| ClinchatError::Remote(format!("Failed to parse status: {}", e)))?;
        Ok(match data.status.as_deref() {
            Some("online") => BackendStatus::Online,
            _ => BackendStatus::Offline,
        })
    }

    /// Like [`BackendClient::status`], with every failure reported as offline
    pub async fn check_status(&self) -> BackendStatus {
        match self.status().await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("Failed to check backend status: {}", e);
                BackendStatus::Offline
            }
        }
    }

    /// End the backend login session
    pub async fn logout(&self) -> Result<()> {
        let url = self.endpoint(LOGOUT_PATH)?;
        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        Self::send(self.with_csrf(request), "Logout").await?;
        Ok(())
    }
}

fn optional_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "opaque_id")] String);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|w| w.0))
}

/// Parse RFC 3339, falling back to a naive timestamp taken as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
