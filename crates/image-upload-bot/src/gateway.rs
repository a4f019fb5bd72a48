//! Upload gateway: local file → hosted image URL

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use image_upload_types::UploadError;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::config::ImageHostConfig;

/// A successfully hosted image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedImage {
    pub url: String,
}

/// Upload one local file to an image host.
///
/// One attempt per call. Failures carry the host's message unchanged.
/// The caller owns the file and its cleanup.
pub trait ImageHost: Send + Sync {
    fn upload(&self, path: &Path) -> impl Future<Output = Result<HostedImage, UploadError>> + Send;
}

/// Client for Chevereto-style hosts such as freeimage.host
#[derive(Clone)]
pub struct FreeImageHost {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl FreeImageHost {
    pub fn new(config: &ImageHostConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl ImageHost for FreeImageHost {
    async fn upload(&self, path: &Path) -> Result<HostedImage, UploadError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            UploadError::new(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();

        debug!("Uploading {} ({} bytes) to {}", file_name, bytes.len(), self.endpoint);

        let form = Form::new()
            .text("key", self.api_key.clone())
            .text("action", "upload")
            .text("format", "json")
            .part("source", Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::new(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::new(e.to_string()))?;

        parse_response(status, &body)
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    status_txt: Option<String>,
    #[serde(default)]
    image: Option<ApiImage>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiImage {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Turn a host response into a hosted URL or the host's own error message
fn parse_response(status: reqwest::StatusCode, body: &str) -> Result<HostedImage, UploadError> {
    let parsed: ApiResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) if status.is_success() => {
            return Err(UploadError::new(format!("Invalid response from image host: {}", e)));
        }
        Err(_) => {
            return Err(UploadError::new(format!("Image host returned HTTP {}", status)));
        }
    };

    if let Some(error) = parsed.error {
        return Err(UploadError::new(error.message));
    }

    match parsed.image {
        Some(image) if status.is_success() => Ok(HostedImage { url: image.url }),
        _ => Err(UploadError::new(parsed.status_txt.unwrap_or_else(|| {
            format!("Image host returned HTTP {} without an image", status)
        }))),
    }
}
