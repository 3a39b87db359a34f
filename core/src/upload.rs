use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use crate::config::UploadConfig;

/// A file handed to the upload pipeline: raw bytes plus the client-supplied
/// name and MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("not an image: {content_type}")]
    NotAnImage { content_type: String },
    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upload service returned status {status}")]
    Service { status: u16 },
    #[error("upload service response did not contain a secure_url")]
    MalformedResponse,
}

/// Remote store for image binaries. Implementations return the durable URL
/// of the stored asset; a failed store call leaves no trace anywhere.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, file: &UploadFile) -> Result<String, UploadError>;
}

#[derive(Debug, Deserialize)]
struct UploadServiceResponse {
    secure_url: Option<String>,
}

/// Cloudinary-style unsigned upload endpoint: multipart POST with `file`
/// and `upload_preset` fields, JSON response carrying the stored asset's
/// `secure_url`. Any non-2xx status is a failure regardless of body.
#[derive(Debug, Clone)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: UploadConfig,
}

impl CloudinaryStore {
    pub fn new(config: UploadConfig) -> CloudinaryStore {
        CloudinaryStore {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    #[instrument(skip(self, file), fields(file_name = %file.file_name))]
    async fn store(&self, file: &UploadFile) -> Result<String, UploadError> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.config.preset.clone());
        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(UploadError::Service {
                status: response.status().as_u16(),
            });
        }
        let body: UploadServiceResponse = response.json().await?;
        body.secure_url.ok_or(UploadError::MalformedResponse)
    }
}
