//! Session controller for finqa.
//!
//! [`SessionController`] owns the transcript and the upload lifecycle of one
//! chat session. It talks to the backend only through the
//! [`finqa_client::ChatService`] and [`finqa_client::DocumentService`]
//! traits, so any presentation layer (or test) can drive it.

pub mod controller;
pub mod outcome;
pub mod progress;
pub mod view;

pub use controller::{document_ready_message, ControllerOptions, SessionController, FAILURE_NOTICE};
pub use outcome::{CommandOutcome, ControllerStateError};
pub use progress::ProgressSimulation;
pub use view::ViewState;
