use crate::outcome::{CommandOutcome, ControllerStateError};
use crate::progress::ProgressSimulation;
use crate::view::ViewState;
use finqa_client::{ChatService, ClientError, DocumentInfo, DocumentService};
use finqa_core::{
    DocumentFile, FileValidator, Message, Session, SessionIdentity, UploadState, UploadStatus,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Appended in place of an answer when the chat request fails
pub const FAILURE_NOTICE: &str =
    "Sorry, I couldn't get an answer right now. Please check your connection and try again.";

/// Assistant message appended after a document is processed
pub fn document_ready_message(filename: &str) -> String {
    format!(
        "📄 {} has been processed and is ready. Ask me anything about it.",
        filename
    )
}

/// Construction-time settings
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub welcome_message: String,
    pub validator: FileValidator,
    /// `None` leaves progress at 0 until the upload settles
    pub progress: Option<ProgressSimulation>,
}

impl ControllerOptions {
    pub fn new(validator: FileValidator) -> Self {
        Self {
            welcome_message: "Hello! Upload a PDF document and ask me anything about it."
                .to_string(),
            validator,
            progress: Some(ProgressSimulation::default()),
        }
    }

    pub fn with_welcome(mut self, message: impl Into<String>) -> Self {
        self.welcome_message = message.into();
        self
    }

    pub fn with_progress(mut self, progress: Option<ProgressSimulation>) -> Self {
        self.progress = progress;
        self
    }
}

/// Owns one chat session and its upload lifecycle.
///
/// Every command takes `&self`; share the controller through an `Arc`.
/// Overlapping commands are settled by the session flags, and a command that
/// does not fit the current state comes back as [`CommandOutcome::Ignored`].
pub struct SessionController {
    identity: SessionIdentity,
    chat: Arc<dyn ChatService>,
    documents: Arc<dyn DocumentService>,
    validator: FileValidator,
    progress: Option<ProgressSimulation>,
    state: Arc<Mutex<Session>>,
    initialized: AtomicBool,
    shutdown: CancellationToken,
}

impl SessionController {
    pub fn new(
        identity: SessionIdentity,
        chat: Arc<dyn ChatService>,
        documents: Arc<dyn DocumentService>,
        options: ControllerOptions,
    ) -> Self {
        Self {
            identity,
            chat,
            documents,
            validator: options.validator,
            progress: options.progress,
            state: Arc::new(Mutex::new(Session::with_welcome(options.welcome_message))),
            initialized: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn validator(&self) -> &FileValidator {
        &self.validator
    }

    /// Copy of the current session
    pub fn snapshot(&self) -> Session {
        self.state.lock().clone()
    }

    pub fn view(&self) -> ViewState {
        ViewState::from_session(&self.state.lock())
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Fire the server-side cleanup for this identity. Runs in the background
    /// and only once per controller.
    pub fn init(&self) -> CommandOutcome {
        if self.is_shut_down() {
            return ignored(ControllerStateError::ShutDown);
        }
        if self.initialized.swap(true, Ordering::SeqCst) {
            return ignored(ControllerStateError::AlreadyInitialized);
        }

        let chat = Arc::clone(&self.chat);
        let identity = self.identity.clone();
        let token = self.shutdown.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => debug!("Session cleanup abandoned on shutdown"),
                result = chat.cleanup(&identity) => match result {
                    Ok(()) => debug!("Cleaned up server state for {}", identity),
                    Err(e) => warn!("Session cleanup failed for {}: {}", identity, e),
                },
            }
        });

        CommandOutcome::Applied
    }

    /// Validate and stage a document. A rejected file lands in the error
    /// state with the reason and is not kept.
    pub fn select_file(&self, file: DocumentFile) -> CommandOutcome {
        if self.is_shut_down() {
            return ignored(ControllerStateError::ShutDown);
        }
        let mut state = self.state.lock();
        if state.upload.is_uploading() {
            return ignored(ControllerStateError::UploadInProgress);
        }

        match self.validator.validate(&file) {
            Ok(()) => {
                info!("Selected {} ({} bytes)", file.name(), file.size());
                state.upload = UploadState::selected(file);
            }
            Err(e) => {
                warn!("Rejected {}: {}", file.name(), e);
                state.upload = UploadState::rejected(e.to_string());
            }
        }
        CommandOutcome::Applied
    }

    pub fn remove_file(&self) -> CommandOutcome {
        if self.is_shut_down() {
            return ignored(ControllerStateError::ShutDown);
        }
        let mut state = self.state.lock();
        if state.upload.is_uploading() {
            return ignored(ControllerStateError::UploadInProgress);
        }
        state.upload = UploadState::idle();
        CommandOutcome::Applied
    }

    /// Upload the staged file. Also retries after a failed upload.
    pub async fn start_upload(&self) -> CommandOutcome {
        if self.is_shut_down() {
            return ignored(ControllerStateError::ShutDown);
        }

        let (file, flight) = {
            let mut state = self.state.lock();
            let file = match (&state.upload.file, state.upload.can_start()) {
                (Some(file), true) => file.clone(),
                _ if state.upload.is_uploading() => {
                    return ignored(ControllerStateError::UploadInProgress)
                }
                _ => return ignored(ControllerStateError::NothingToUpload),
            };
            state.upload.begin();
            (file, InFlight::upload(Arc::clone(&self.state)))
        };

        info!("Uploading {} for {}", file.name(), self.identity);
        // cancelled on drop, also when this future is dropped mid-upload
        let ticker = self
            .progress
            .map(|sim| sim.spawn(Arc::clone(&self.state), &self.shutdown).drop_guard());

        let result = tokio::select! {
            _ = self.shutdown.cancelled() => None,
            result = self.documents.upload(&file, &self.identity) => Some(result),
        };
        drop(ticker);

        match result {
            None => debug!("Upload of {} abandoned on shutdown", file.name()),
            Some(Ok(outcome)) => {
                let filename = if outcome.filename.is_empty() {
                    file.name().to_string()
                } else {
                    outcome.filename
                };
                info!(
                    "Uploaded {} ({} chunks, {} ms)",
                    filename, outcome.chunks_count, outcome.processing_time_ms
                );
                flight.complete(|session| {
                    session.upload.succeed();
                    let ready = document_ready_message(&filename);
                    session.add_message(Message::assistant(ready, Vec::new()));
                    session.active_document = Some(filename);
                });
            }
            Some(Err(e)) => {
                warn!("Upload of {} failed: {}", file.name(), e);
                flight.complete(|session| session.upload.fail(upload_failure_message(&e)));
            }
        }

        CommandOutcome::Applied
    }

    /// Ask a question about the uploaded material.
    ///
    /// The user turn is appended before the request goes out; the reply (or a
    /// failure notice) follows it.
    pub async fn send_message(&self, text: &str) -> CommandOutcome {
        let question = text.trim();
        if question.is_empty() {
            return ignored(ControllerStateError::EmptyMessage);
        }
        if self.is_shut_down() {
            return ignored(ControllerStateError::ShutDown);
        }

        let (history, flight) = {
            let mut state = self.state.lock();
            if state.is_awaiting_answer {
                return ignored(ControllerStateError::AwaitingAnswer);
            }
            let history = state.messages.clone();
            state.add_message(Message::user(question));
            state.is_awaiting_answer = true;
            (history, InFlight::chat(Arc::clone(&self.state)))
        };

        debug!("Asking with {} prior messages", history.len());
        let result = tokio::select! {
            _ = self.shutdown.cancelled() => None,
            result = self.chat.ask(question, &history) => Some(result),
        };

        match result {
            None => debug!("Question abandoned on shutdown"),
            Some(Ok(answer)) => {
                debug!(
                    "Answer received ({} sources, {} ms)",
                    answer.sources.len(),
                    answer.processing_time_ms
                );
                flight.complete(|session| {
                    session.add_message(Message::assistant(answer.answer, answer.sources));
                });
            }
            Some(Err(e)) => {
                warn!("Chat request failed: {}", e);
                flight.complete(|session| {
                    session.add_message(Message::assistant(FAILURE_NOTICE, Vec::new()));
                });
            }
        }

        CommandOutcome::Applied
    }

    /// Documents the backend holds for this session's identity
    pub async fn list_documents(&self) -> Result<Vec<DocumentInfo>, ClientError> {
        self.documents.list_documents(&self.identity).await
    }

    /// Cancel in-flight requests and the progress ticker
    pub fn shutdown(&self) {
        if !self.shutdown.is_cancelled() {
            debug!("Shutting down session for {}", self.identity);
            self.shutdown.cancel();
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("identity", &self.identity)
            .field("validator", &self.validator)
            .field("shut_down", &self.is_shut_down())
            .finish_non_exhaustive()
    }
}

fn ignored(reason: ControllerStateError) -> CommandOutcome {
    debug!("Command ignored: {}", reason);
    CommandOutcome::Ignored(reason)
}

fn upload_failure_message(error: &ClientError) -> String {
    format!("Upload failed: {}", error.user_message())
}

#[derive(Debug, Clone, Copy)]
enum FlightKind {
    Chat,
    Upload,
}

/// Restores the session flags for a request that never completes normally,
/// whether its future is dropped or it panics.
struct InFlight {
    state: Arc<Mutex<Session>>,
    kind: FlightKind,
}

impl InFlight {
    fn chat(state: Arc<Mutex<Session>>) -> Self {
        Self { state, kind: FlightKind::Chat }
    }

    fn upload(state: Arc<Mutex<Session>>) -> Self {
        Self { state, kind: FlightKind::Upload }
    }

    /// Apply the result and settle the flags under one lock
    fn complete(self, apply: impl FnOnce(&mut Session)) {
        let mut session = self.state.lock();
        apply(&mut session);
        settle(self.kind, &mut session);
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        settle(self.kind, &mut self.state.lock());
    }
}

fn settle(kind: FlightKind, session: &mut Session) {
    match kind {
        FlightKind::Chat => session.is_awaiting_answer = false,
        FlightKind::Upload => {
            if session.upload.status == UploadStatus::Uploading {
                session.upload.abandon();
            }
        }
    }
}
