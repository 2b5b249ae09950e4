//! JSON bodies exchanged with the backend.

use chrono::{DateTime, Utc};
use finqa_core::{DocumentSource, Message, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub question: &'a str,
    pub chat_history: Vec<HistoryEntry<'a>>,
}

/// A prior turn as the backend expects it in `chat_history`
#[derive(Debug, Serialize)]
pub(crate) struct HistoryEntry<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: Role,
    pub content: &'a str,
    #[serde(skip_serializing_if = "is_empty_slice")]
    pub sources: &'a [DocumentSource],
    pub timestamp: DateTime<Utc>,
}

impl<'a> From<&'a Message> for HistoryEntry<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            id: &message.id,
            kind: message.role,
            content: &message.content,
            sources: &message.sources,
            timestamp: message.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseBody {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<DocumentSource>,
    /// Seconds
    #[serde(default)]
    pub processing_time: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponseBody {
    pub message: String,
    pub filename: String,
    #[serde(default)]
    pub chunks_count: u64,
    /// Seconds
    #[serde(default)]
    pub processing_time: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentsResponseBody {
    #[serde(default)]
    pub documents: Vec<DocumentInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthBody {
    #[serde(default)]
    pub message: String,
}

/// A processed document the backend holds for an identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub filename: String,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub chunks_count: u64,
    #[serde(default)]
    pub status: Option<String>,
}

/// Successful answer to a question
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub answer: String,
    pub sources: Vec<DocumentSource>,
    pub processing_time_ms: u64,
}

impl From<ChatResponseBody> for AnswerOutcome {
    fn from(body: ChatResponseBody) -> Self {
        Self {
            answer: body.answer,
            sources: body.sources,
            processing_time_ms: seconds_to_ms(body.processing_time),
        }
    }
}

/// Successful document ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub message: String,
    pub filename: String,
    pub chunks_count: u64,
    pub processing_time_ms: u64,
}

impl From<UploadResponseBody> for UploadOutcome {
    fn from(body: UploadResponseBody) -> Self {
        Self {
            message: body.message,
            filename: body.filename,
            chunks_count: body.chunks_count,
            processing_time_ms: seconds_to_ms(body.processing_time),
        }
    }
}

fn is_empty_slice<T>(slice: &&[T]) -> bool {
    slice.is_empty()
}

/// The backend reports durations as fractional seconds
pub(crate) fn seconds_to_ms(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}
