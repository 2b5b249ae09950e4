use async_trait::async_trait;
use finqa_core::{DocumentFile, Message, SessionIdentity};

use crate::error::Result;
use crate::wire::{AnswerOutcome, DocumentInfo, UploadOutcome};

/// Question answering over the documents uploaded for a session
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Ask one question; `history` holds the turns before it, oldest first
    async fn ask(&self, question: &str, history: &[Message]) -> Result<AnswerOutcome>;

    /// Drop server-side state held for `identity`
    async fn cleanup(&self, identity: &SessionIdentity) -> Result<()>;
}

/// Document ingestion
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Upload one file in a single attempt
    async fn upload(
        &self,
        file: &DocumentFile,
        identity: &SessionIdentity,
    ) -> Result<UploadOutcome>;

    async fn list_documents(&self, identity: &SessionIdentity) -> Result<Vec<DocumentInfo>>;
}
