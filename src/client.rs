//! Prediction endpoint collaborator.
//!
//! Each registered model is served at `{base_url}/predict/{model}` and takes
//! the image as a multipart `file` part.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::error::BackendError;
use crate::ingest::FILE_FIELD;
use crate::models::{PredictionResponse, UploadedImage};
use crate::registry::ModelId;

/// Something that can classify an uploaded image with a named model.
///
/// Implementations return the raw response; range checks are left to the
/// aggregator so every backend is held to the same rules.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    async fn predict(
        &self,
        model: ModelId,
        image: &UploadedImage,
    ) -> Result<PredictionResponse, BackendError>;
}

pub struct HttpBackend {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("tumor-compare/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(HttpBackend {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn endpoint(&self, model: ModelId) -> String {
        format!("{}/predict/{}", self.base_url, model)
    }
}

#[async_trait]
impl PredictionBackend for HttpBackend {
    async fn predict(
        &self,
        model: ModelId,
        image: &UploadedImage,
    ) -> Result<PredictionResponse, BackendError> {
        let url = self.endpoint(model);
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.upload_name())
            .mime_str(&image.content_type)?;
        let form = Form::new().part(FILE_FIELD, part);

        debug!(%url, "sending prediction request");
        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| classify(e, &url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| classify(e, &url))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn classify(e: reqwest::Error, url: &str) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout {
            url: url.to_string(),
        }
    } else {
        BackendError::Transport(e)
    }
}
