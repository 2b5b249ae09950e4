use thiserror::Error;

/// Failure of a single backend call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The request never produced a usable response
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status
    #[error("server error {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Server { status: u16, message: Option<String> },

    #[error("config error: {0}")]
    Config(String),
}

impl ClientError {
    /// Build a server error from a status and raw response body.
    ///
    /// FastAPI-style `{"detail": ...}` and `{"message": ...}` bodies are
    /// unwrapped; any other non-empty body is used verbatim.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => extract_message(&value).or_else(|| non_empty(body)),
            Err(_) => non_empty(body),
        };
        ClientError::Server { status, message }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    /// Text suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => "could not reach the server".to_string(),
            ClientError::Server { message: Some(message), .. } => message.clone(),
            ClientError::Server { status, message: None } => {
                format!("server returned status {}", status)
            }
            ClientError::Config(message) => message.clone(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ClientError::Config(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

fn extract_message(value: &serde_json::Value) -> Option<String> {
    let field = value.get("detail").or_else(|| value.get("message"))?;
    match field {
        serde_json::Value::String(s) => non_empty(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_body() {
        let body = r#"{"detail": "Failed to process PDF : bad xref"}"#;
        let err = ClientError::from_response(500, body);
        assert_eq!(
            err,
            ClientError::Server {
                status: 500,
                message: Some("Failed to process PDF : bad xref".to_string()),
            }
        );
        assert_eq!(err.user_message(), "Failed to process PDF : bad xref");
    }

    #[test]
    fn test_message_body() {
        let err = ClientError::from_response(400, r#"{"message": "Too large"}"#);
        assert_eq!(err.user_message(), "Too large");
    }

    #[test]
    fn test_plain_and_empty_bodies() {
        let err = ClientError::from_response(502, "Bad Gateway");
        assert_eq!(err.user_message(), "Bad Gateway");

        let err = ClientError::from_response(503, "   ");
        assert_eq!(err, ClientError::Server { status: 503, message: None });
        assert_eq!(err.user_message(), "server returned status 503");
    }

    #[test]
    fn test_structured_detail_is_stringified() {
        let err = ClientError::from_response(422, r#"{"detail": [{"msg": "field required"}]}"#);
        match err {
            ClientError::Server { message: Some(m), .. } => assert!(m.contains("field required")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let err = ClientError::Server { status: 404, message: None };
        assert_eq!(err.to_string(), "server error 404: no details");
        assert!(ClientError::Network("refused".into()).is_network());
    }
}
