use thiserror::Error;

/// Why a command was not carried out
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerStateError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("an answer is already pending")]
    AwaitingAnswer,

    #[error("an upload is in progress")]
    UploadInProgress,

    #[error("no file is ready to upload")]
    NothingToUpload,

    #[error("session is already initialized")]
    AlreadyInitialized,

    #[error("session has been shut down")]
    ShutDown,
}

/// Result of issuing a command.
///
/// An ignored command left the session untouched. It is never an error the
/// presentation has to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Ignored(ControllerStateError),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }

    pub fn is_ignored(&self) -> bool {
        !self.is_applied()
    }

    /// The reason, when ignored
    pub fn reason(&self) -> Option<ControllerStateError> {
        match self {
            CommandOutcome::Applied => None,
            CommandOutcome::Ignored(reason) => Some(*reason),
        }
    }
}
