use crate::document::DocumentFile;

/// Upload lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    Selected,
    Uploading,
    Success,
    Error,
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadStatus::Idle => write!(f, "idle"),
            UploadStatus::Selected => write!(f, "selected"),
            UploadStatus::Uploading => write!(f, "uploading"),
            UploadStatus::Success => write!(f, "success"),
            UploadStatus::Error => write!(f, "error"),
        }
    }
}

/// State of the single document slot.
///
/// `progress` is 100 only in `Success`; `file` is always `None` in `Idle`.
/// A validation failure leaves `Error` without a file, an upload failure
/// keeps the file so the upload can be retried.
#[derive(Debug, Clone, Default)]
pub struct UploadState {
    pub status: UploadStatus,
    pub file: Option<DocumentFile>,
    pub progress: u8,
    pub error: Option<String>,
}

impl UploadState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn selected(file: DocumentFile) -> Self {
        Self {
            status: UploadStatus::Selected,
            file: Some(file),
            progress: 0,
            error: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            status: UploadStatus::Error,
            file: None,
            progress: 0,
            error: Some(message.into()),
        }
    }

    /// Whether `start_upload` may run from this state
    pub fn can_start(&self) -> bool {
        matches!(self.status, UploadStatus::Selected | UploadStatus::Error) && self.file.is_some()
    }

    pub fn is_uploading(&self) -> bool {
        self.status == UploadStatus::Uploading
    }

    pub fn begin(&mut self) {
        self.status = UploadStatus::Uploading;
        self.progress = 0;
        self.error = None;
    }

    /// Raise progress during an upload, never reaching 100 and never going backwards
    pub fn advance(&mut self, step: u8, cap: u8) {
        if self.status != UploadStatus::Uploading {
            return;
        }
        let cap = cap.min(99);
        self.progress = self.progress.saturating_add(step).min(cap).max(self.progress);
    }

    pub fn succeed(&mut self) {
        self.status = UploadStatus::Success;
        self.progress = 100;
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = UploadStatus::Error;
        self.progress = 0;
        self.error = Some(message.into());
    }

    /// Back to `Selected` with the same file, used when an upload is abandoned
    pub fn abandon(&mut self) {
        self.status = if self.file.is_some() { UploadStatus::Selected } else { UploadStatus::Idle };
        self.progress = 0;
        self.error = None;
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file.as_ref().map(|f| f.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf() -> DocumentFile {
        DocumentFile::new("report.pdf", "application/pdf", vec![0u8; 16])
    }

    #[test]
    fn test_idle_has_no_file() {
        let state = UploadState::idle();
        assert_eq!(state.status, UploadStatus::Idle);
        assert!(state.file.is_none());
        assert!(!state.can_start());
    }

    #[test]
    fn test_rejected_cannot_start() {
        let state = UploadState::rejected("Only PDF files are allowed");
        assert_eq!(state.status, UploadStatus::Error);
        assert!(!state.can_start());
    }

    #[test]
    fn test_advance_is_capped_below_100() {
        let mut state = UploadState::selected(pdf());
        state.begin();
        for _ in 0..50 {
            state.advance(15, 100);
        }
        assert_eq!(state.progress, 99);

        state.succeed();
        assert_eq!(state.progress, 100);
        state.advance(10, 90);
        assert_eq!(state.progress, 100);
    }

    #[test]
    fn test_advance_ignored_when_not_uploading() {
        let mut state = UploadState::selected(pdf());
        state.advance(30, 90);
        assert_eq!(state.progress, 0);
    }

    #[test]
    fn test_failed_upload_keeps_file_for_retry() {
        let mut state = UploadState::selected(pdf());
        state.begin();
        state.fail("Upload failed");
        assert!(state.can_start());
        assert_eq!(state.file_name(), Some("report.pdf"));
    }
}
