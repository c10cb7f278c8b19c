//! HTTP media store client
//!
//! Uploads image bytes to the configured blob service and returns the URL
//! from its response body.

use async_trait::async_trait;
use serde::Deserialize;

use super::{MediaError, MediaStore};

/// Client for a remote blob service
///
/// The service accepts `POST {endpoint}` with the raw image bytes and
/// responds `200 {"url": "..."}`.
#[derive(Clone)]
pub struct HttpMediaStore {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

impl HttpMediaStore {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload_image(&self, bytes: &[u8]) -> Result<String, MediaError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaError::Upload(format!(
                "blob service returned {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Upload(format!("unparseable upload response: {}", e)))?;

        Ok(body.url)
    }
}
