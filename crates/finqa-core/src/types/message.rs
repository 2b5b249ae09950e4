use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique message identifier
pub type MessageId = String;

/// Who authored a message in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A document excerpt the backend cited for an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSource {
    pub content: String,
    pub page: u32,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<Map<String, Value>>>,
}

impl DocumentSource {
    pub fn new(content: impl Into<String>, page: u32, score: f64) -> Self {
        Self {
            content: content.into(),
            page,
            score,
            metadata: None,
        }
    }

    /// Look up a metadata value across all metadata maps, first match wins
    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata
            .as_ref()?
            .iter()
            .find_map(|map| map.get(key))
    }
}

/// One entry in the chat transcript.
///
/// Messages are append-only: once pushed onto a session they are never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<DocumentSource>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            sources: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Create an assistant message with the sources it cites
    pub fn assistant(content: impl Into<String>, sources: Vec<DocumentSource>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: content.into(),
            sources,
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Local wall-clock time for transcript display, e.g. `14:05`
    pub fn display_time(&self) -> String {
        self.created_at.with_timezone(&Local).format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::user("hi");
        let b = Message::user("hi");
        assert_ne!(a.id, b.id);
        assert!(a.is_user());
        assert!(a.sources.is_empty());
    }

    #[test]
    fn test_source_deserializes_without_metadata() {
        let json = r#"{"content": "Revenue grew 12%", "page": 3, "score": 0.87}"#;
        let source: DocumentSource = serde_json::from_str(json).unwrap();
        assert_eq!(source.page, 3);
        assert!(source.metadata.is_none());
        assert!(source.metadata_value("filename").is_none());
    }

    #[test]
    fn test_source_metadata_lookup() {
        let json = r#"{
            "content": "Net income",
            "page": 7,
            "score": 0.5,
            "metadata": [{"page": 7}, {"filename": "report.pdf"}]
        }"#;
        let source: DocumentSource = serde_json::from_str(json).unwrap();
        assert_eq!(
            source.metadata_value("filename"),
            Some(&Value::String("report.pdf".to_string()))
        );
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(Role::User.to_string(), "user");
    }
}
