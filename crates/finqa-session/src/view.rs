use finqa_core::{Session, UploadStatus};

/// What the presentation layer may offer right now, derived from a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub can_send: bool,
    pub can_select: bool,
    pub can_upload: bool,
    pub can_remove: bool,
    pub is_awaiting_answer: bool,
    pub upload_status: UploadStatus,
    pub upload_progress: u8,
    pub upload_error: Option<String>,
    pub file_name: Option<String>,
    pub active_document: Option<String>,
    pub message_count: usize,
}

impl ViewState {
    pub fn from_session(session: &Session) -> Self {
        let uploading = session.upload.is_uploading();
        Self {
            can_send: !session.is_awaiting_answer,
            can_select: !uploading,
            can_upload: session.upload.can_start(),
            can_remove: !uploading && session.upload.status != UploadStatus::Idle,
            is_awaiting_answer: session.is_awaiting_answer,
            upload_status: session.upload.status,
            upload_progress: session.upload.progress,
            upload_error: session.upload.error.clone(),
            file_name: session.upload.file_name().map(str::to_string),
            active_document: session.active_document.clone(),
            message_count: session.messages.len(),
        }
    }

    /// Whether `text` would be accepted by `send_message`
    pub fn accepts(&self, text: &str) -> bool {
        self.can_send && !text.trim().is_empty()
    }
}

impl From<&Session> for ViewState {
    fn from(session: &Session) -> Self {
        Self::from_session(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finqa_core::{DocumentFile, UploadState};

    #[test]
    fn test_fresh_session_view() {
        let session = Session::with_welcome("hi");
        let view = ViewState::from(&session);
        assert!(view.can_send);
        assert!(view.can_select);
        assert!(!view.can_upload);
        assert!(!view.can_remove);
        assert_eq!(view.message_count, 1);
        assert!(!view.accepts("   "));
        assert!(view.accepts("What was EBITDA?"));
    }

    #[test]
    fn test_uploading_view() {
        let mut session = Session::with_welcome("hi");
        let file = DocumentFile::new("a.pdf", "application/pdf", vec![1]);
        session.upload = UploadState::selected(file);
        session.upload.begin();
        let view = ViewState::from(&session);
        assert!(!view.can_select);
        assert!(!view.can_upload);
        assert!(!view.can_remove);
        assert_eq!(view.file_name.as_deref(), Some("a.pdf"));
    }

    #[test]
    fn test_awaiting_view() {
        let mut session = Session::with_welcome("hi");
        session.is_awaiting_answer = true;
        let view = ViewState::from(&session);
        assert!(!view.can_send);
        assert!(!view.accepts("question"));
    }
}
