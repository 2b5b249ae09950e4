use async_trait::async_trait;
use finqa_core::{Message, SessionIdentity};

use crate::api::{ensure_success, read_json, ApiClient};
use crate::error::Result;
use crate::service::ChatService;
use crate::wire::{AnswerOutcome, ChatRequest, ChatResponseBody, HistoryEntry};

/// `POST /api/chat` and `DELETE /api/cleanup`
#[derive(Debug, Clone)]
pub struct ChatClient {
    api: ApiClient,
}

impl ChatClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

#[async_trait]
impl ChatService for ChatClient {
    async fn ask(&self, question: &str, history: &[Message]) -> Result<AnswerOutcome> {
        let request = ChatRequest {
            question,
            chat_history: history.iter().map(HistoryEntry::from).collect(),
        };

        tracing::debug!(
            history_len = history.len(),
            "POST {}/api/chat",
            self.api.base_url()
        );

        let response = self.api
            .http()
            .post(self.api.url("/api/chat"))
            .json(&request)
            .send()
            .await?;

        let body: ChatResponseBody = read_json(response).await?;
        let outcome = AnswerOutcome::from(body);

        tracing::debug!(
            sources = outcome.sources.len(),
            processing_time_ms = outcome.processing_time_ms,
            "Answer received"
        );

        Ok(outcome)
    }

    async fn cleanup(&self, identity: &SessionIdentity) -> Result<()> {
        tracing::debug!(identity = %identity, "DELETE {}/api/cleanup", self.api.base_url());

        let response = self.api
            .http()
            .delete(self.api.url("/api/cleanup"))
            .query(&[("user_id", identity.as_str())])
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}
