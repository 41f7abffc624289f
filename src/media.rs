//! Object storage for uploaded images and videos.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::{config::CloudinaryConfig, error::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Image,
    Video,
    Auto,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Video => "video",
            ResourceType::Auto => "auto",
        }
    }
}

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub secure_url: String,
    /// Resource type reported by the store, e.g. "image" or "video".
    pub resource_type: String,
}

impl UploadedMedia {
    pub fn is_video(&self) -> bool {
        self.resource_type == "video"
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0} upload timed out")]
    Timeout(&'static str),

    #[error("{resource} upload rejected: {message}")]
    Rejected {
        resource: &'static str,
        message: String,
    },

    #[error("{resource} upload failed: {source}")]
    Transport {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("object storage is not configured")]
    NotConfigured,
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::Upload(err.to_string())
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(
        &self,
        file: UploadFile,
        resource_type: ResourceType,
    ) -> Result<UploadedMedia, UploadError>;
}

#[derive(Clone)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
    base_url: String,
}

#[derive(Deserialize)]
struct CloudinaryUpload {
    secure_url: String,
    resource_type: String,
}

#[derive(Deserialize)]
struct CloudinaryErrorBody {
    error: CloudinaryErrorMessage,
}

#[derive(Deserialize)]
struct CloudinaryErrorMessage {
    message: String,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            config,
            base_url: "https://api.cloudinary.com/v1_1".to_string(),
        })
    }

    fn is_configured(&self) -> bool {
        !self.config.cloud_name.is_empty()
            && !self.config.api_key.is_empty()
            && !self.config.api_secret.is_empty()
    }
}

/// Request signature over the signed parameters (only `timestamp` here).
pub fn sign_upload(timestamp: i64, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("timestamp={timestamp}{api_secret}").as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(
        &self,
        file: UploadFile,
        resource_type: ResourceType,
    ) -> Result<UploadedMedia, UploadError> {
        if !self.is_configured() {
            return Err(UploadError::NotConfigured);
        }
        let resource = resource_type.as_str();
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign_upload(timestamp, &self.config.api_secret);

        let length = file.bytes.len() as u64;
        let mut part = Part::stream_with_length(file.bytes, length).file_name(file.file_name.clone());
        if let Some(content_type) = file.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|source| UploadError::Transport { resource, source })?;
        }

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let url = format!(
            "{}/{}/{}/upload",
            self.base_url, self.config.cloud_name, resource
        );

        tracing::debug!(file = %file.file_name, resource, "uploading to object storage");
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| {
                if source.is_timeout() {
                    UploadError::Timeout(resource)
                } else {
                    UploadError::Transport { resource, source }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<CloudinaryErrorBody>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(UploadError::Rejected { resource, message });
        }

        let body: CloudinaryUpload = response
            .json()
            .await
            .map_err(|source| UploadError::Transport { resource, source })?;

        tracing::info!(url = %body.secure_url, resource_type = %body.resource_type, "upload stored");
        Ok(UploadedMedia {
            secure_url: body.secure_url,
            resource_type: body.resource_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_sha256_hex_of_params_and_secret() {
        let sig = sign_upload(1_700_000_000, "secret");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(sig, sign_upload(1_700_000_000, "secret"));
        assert_ne!(sig, sign_upload(1_700_000_001, "secret"));
    }

    #[test]
    fn video_detection_uses_reported_resource_type() {
        let video = UploadedMedia {
            secure_url: "https://cdn.example/v.mp4".into(),
            resource_type: "video".into(),
        };
        let image = UploadedMedia {
            secure_url: "https://cdn.example/i.png".into(),
            resource_type: "image".into(),
        };
        assert!(video.is_video());
        assert!(!image.is_video());
    }

    #[tokio::test]
    async fn unconfigured_store_refuses_uploads() {
        let store = CloudinaryStore::new(
            CloudinaryConfig {
                cloud_name: String::new(),
                api_key: String::new(),
                api_secret: String::new(),
            },
            Duration::from_secs(1),
        )
        .expect("client");
        let err = store
            .upload(
                UploadFile {
                    file_name: "logo.png".into(),
                    content_type: Some("image/png".into()),
                    bytes: Bytes::from_static(b"png"),
                },
                ResourceType::Image,
            )
            .await
            .expect_err("not configured");
        assert!(matches!(err, UploadError::NotConfigured));
    }
}
