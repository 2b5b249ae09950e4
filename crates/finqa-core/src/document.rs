//! Candidate documents picked by the user for upload.

use std::path::Path;
use std::sync::Arc;

/// Errors reading a document from disk
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// A file the user selected, with its declared content type.
///
/// The bytes are shared, so cloning a session snapshot does not copy the file.
#[derive(Clone, PartialEq)]
pub struct DocumentFile {
    name: String,
    content_type: String,
    bytes: Arc<[u8]>,
}

impl DocumentFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: Arc::from(bytes.into()),
        }
    }

    /// Read a file from disk, inferring its content type from the extension
    pub async fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DocumentError::InvalidPath(path.display().to_string()))?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(name, content_type, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for DocumentFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}
