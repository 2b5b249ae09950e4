pub mod types;
pub mod document;
pub mod validator;
pub mod format;

pub use types::{
    Message,
    MessageId,
    Role,
    DocumentSource,
    Session,
    SessionIdentity,
    UploadState,
    UploadStatus,
};

pub use document::{DocumentFile, DocumentError};
pub use validator::{FileValidator, ValidationError, PDF_CONTENT_TYPE, format_size};
pub use format::FormattedContent;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
