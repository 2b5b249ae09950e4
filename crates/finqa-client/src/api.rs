use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::wire::HealthBody;

/// Shared HTTP plumbing for every backend call.
///
/// One `reqwest::Client` with a cookie store, so credentials set by the
/// backend ride along on later requests. Clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Build a client; `None` leaves requests without a deadline
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| {
            ClientError::Config(format!("Invalid base URL '{}': {}", base_url, e))
        })?;

        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `path` followed by one percent-encoded segment
    pub(crate) fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url(path)).map_err(|e| ClientError::Config(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Config(format!("Base URL cannot hold a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// Backend greeting from `GET /`
    pub async fn health(&self) -> Result<String> {
        let response = self.client.get(self.url("/")).send().await?;
        let body: HealthBody = read_json(response).await?;
        Ok(body.message)
    }

    pub async fn health_check(&self) -> bool {
        match self.health().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Health check against {} failed: {}", self.base_url, e);
                false
            }
        }
    }
}

/// Map a non-2xx status to `ClientError::Server`
pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::from_response(status.as_u16(), &body))
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = ensure_success(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))
}
