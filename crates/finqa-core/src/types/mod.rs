pub mod message;
pub mod upload;
pub mod session;

pub use message::{Message, MessageId, Role, DocumentSource};
pub use upload::{UploadState, UploadStatus};
pub use session::{Session, SessionIdentity};
