//! # finqa-client
//!
//! HTTP access to the document Q&A backend.
//!
//! - [`ChatClient`] asks questions and clears server-side session state
//! - [`UploadClient`] ingests PDFs and lists what has been processed
//!
//! Both sit behind the [`ChatService`] and [`DocumentService`] traits so the
//! session controller can be driven by in-memory fakes in tests.
//!
//! ```no_run
//! use finqa_client::{ApiClient, ChatClient, ChatService};
//!
//! # async fn example() -> finqa_client::Result<()> {
//! let api = ApiClient::new("http://localhost:8000")?;
//! let chat = ChatClient::new(api);
//! let answer = chat.ask("What was net income in 2023?", &[]).await?;
//! println!("{}", answer.answer);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod chat;
pub mod error;
pub mod service;
pub mod upload;
pub mod wire;

pub use api::ApiClient;
pub use chat::ChatClient;
pub use error::{ClientError, Result};
pub use service::{ChatService, DocumentService};
pub use upload::UploadClient;
pub use wire::{AnswerOutcome, DocumentInfo, UploadOutcome};
