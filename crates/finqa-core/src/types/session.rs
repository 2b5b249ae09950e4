use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::message::Message;
use crate::types::upload::UploadState;

/// Opaque token identifying this client to the backend.
///
/// Uploaded documents and server-side history are scoped by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionIdentity(String);

impl SessionIdentity {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// A fresh random identity
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionIdentity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Everything one mounted chat session knows
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub messages: Vec<Message>,
    pub upload: UploadState,
    pub is_awaiting_answer: bool,
    pub active_document: Option<String>,
}

impl Session {
    /// A session seeded with the assistant's greeting
    pub fn with_welcome(welcome: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::assistant(welcome, Vec::new())],
            ..Self::default()
        }
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
