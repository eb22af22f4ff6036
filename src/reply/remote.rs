use crate::error::Result;
use crate::remote::BackendClient;
use crate::reply::{Reply, ReplyGenerator, ReplyRequest};
use async_trait::async_trait;

/// Reply generator backed by the backend chat endpoint
pub struct RemoteReplies {
    client: BackendClient,
}

impl RemoteReplies {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReplyGenerator for RemoteReplies {
    async fn generate(&self, request: &ReplyRequest) -> Result<Reply> {
        let answer = self
            .client
            .chat(request.remote_session_id.as_deref(), &request.content)
            .await?;
        Ok(Reply {
            content: answer.answer,
            remote_session_id: answer.session_id,
        })
    }
}
