use async_trait::async_trait;
use finqa_core::{DocumentFile, SessionIdentity};
use reqwest::multipart::{Form, Part};

use crate::api::{read_json, ApiClient};
use crate::error::{ClientError, Result};
use crate::service::DocumentService;
use crate::wire::{DocumentInfo, DocumentsResponseBody, UploadOutcome, UploadResponseBody};

/// `POST /api/upload` and `GET /api/documents/{id}`
#[derive(Debug, Clone)]
pub struct UploadClient {
    api: ApiClient,
}

impl UploadClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn form(file: &DocumentFile) -> Result<Form> {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.content_type())
            .map_err(|e| {
                let message = format!("Invalid content type '{}': {}", file.content_type(), e);
                ClientError::Config(message)
            })?;
        Ok(Form::new().part("file", part))
    }
}

#[async_trait]
impl DocumentService for UploadClient {
    async fn upload(
        &self,
        file: &DocumentFile,
        identity: &SessionIdentity,
    ) -> Result<UploadOutcome> {
        let form = Self::form(file)?;

        tracing::info!(
            file = file.name(),
            size = file.size(),
            identity = %identity,
            "Uploading document"
        );

        let response = self.api
            .http()
            .post(self.api.url("/api/upload"))
            .query(&[("user_id", identity.as_str())])
            .multipart(form)
            .send()
            .await?;

        let body: UploadResponseBody = read_json(response).await?;
        let outcome = UploadOutcome::from(body);

        tracing::info!(
            filename = %outcome.filename,
            chunks = outcome.chunks_count,
            processing_time_ms = outcome.processing_time_ms,
            "Document processed"
        );

        Ok(outcome)
    }

    async fn list_documents(&self, identity: &SessionIdentity) -> Result<Vec<DocumentInfo>> {
        let url = self.api.url_with_segment("/api/documents", identity.as_str())?;
        tracing::debug!("GET {}", url);

        let response = self.api.http().get(url).send().await?;
        let body: DocumentsResponseBody = read_json(response).await?;
        Ok(body.documents)
    }
}
