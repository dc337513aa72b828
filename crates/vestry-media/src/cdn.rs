//! Image CDN client: unsigned uploads, credential checks and delivery URLs.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use vestry_core::{AppError, FileUpload, MediaConfiguration, MediaReference};

/// CDN operation errors
#[derive(Debug, Error)]
pub enum CdnError {
    #[error("CDN not configured: {0}")]
    NotConfigured(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("CDN returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to decode CDN response: {0}")]
    Decode(String),
}

impl From<CdnError> for AppError {
    fn from(err: CdnError) -> Self {
        match err {
            CdnError::NotConfigured(msg) => AppError::Configuration(msg),
            other => AppError::Cdn(other.to_string()),
        }
    }
}

/// Fields of the upload response this subsystem uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CdnUploadResponse {
    pub public_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub secure_url: String,
}

impl CdnUploadResponse {
    /// Reference carrying the asset identifier and the secured URL.
    pub fn into_reference(self) -> MediaReference {
        let url = if self.secure_url.is_empty() {
            self.url
        } else {
            self.secure_url
        };
        MediaReference::cdn(self.public_id, url)
    }
}

#[derive(Clone, Debug)]
pub struct CdnClient {
    client: Client,
    api_base: String,
}

impl CdnClient {
    /// `api_base` is the versioned API root, e.g. `https://api.cloudinary.com/v1_1`.
    pub fn new(client: Client, api_base: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Unsigned upload of one file into `folder`.
    pub async fn upload(
        &self,
        config: &MediaConfiguration,
        file: &FileUpload,
        folder: &str,
        timestamp: i64,
    ) -> Result<CdnUploadResponse, CdnError> {
        let cloud_name = config
            .cloud_name
            .as_deref()
            .ok_or_else(|| CdnError::NotConfigured("cloud name is not set".to_string()))?;
        let preset = config
            .upload_preset
            .as_deref()
            .ok_or_else(|| CdnError::NotConfigured("upload preset is not set".to_string()))?;

        let part = Part::bytes(file.data.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| CdnError::Request(format!("Invalid content type: {}", e)))?;

        let mut form = Form::new()
            .part("file", part)
            .text("upload_preset", preset.to_string())
            .text("timestamp", timestamp.to_string());
        let folder = folder.trim().trim_matches('/');
        if !folder.is_empty() {
            form = form.text("folder", folder.to_string());
        }

        let url = format!("{}/{}/image/upload", self.api_base, cloud_name);
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CdnError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CdnError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: CdnUploadResponse = response
            .json()
            .await
            .map_err(|e| CdnError::Decode(e.to_string()))?;

        if body.public_id.trim().is_empty() {
            return Err(CdnError::Decode(
                "response carried no asset identifier".to_string(),
            ));
        }

        tracing::info!(
            cloud_name = %cloud_name,
            folder = %folder,
            public_id = %body.public_id,
            size_bytes = file.size(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "CDN upload successful"
        );

        Ok(body)
    }

    /// Check that the configured key pair is accepted by the CDN admin API.
    pub async fn verify_credentials(&self, config: &MediaConfiguration) -> Result<(), CdnError> {
        let (cloud_name, api_key, api_secret) = match (
            config.cloud_name.as_deref(),
            config.api_key.as_deref(),
            config.api_secret.as_deref(),
        ) {
            (Some(c), Some(k), Some(s)) => (c, k, s),
            _ => {
                return Err(CdnError::NotConfigured(
                    "cloud name, API key and API secret are required".to_string(),
                ))
            }
        };

        let response = self
            .client
            .get(format!("{}/{}/ping", self.api_base, cloud_name))
            .basic_auth(api_key, Some(api_secret))
            .send()
            .await
            .map_err(|e| CdnError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CdnError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(cloud_name = %cloud_name, "CDN credentials verified");
        Ok(())
    }
}

/// `{delivery_base}/{cloud}/image/upload/{transformation}/{public_id}`
pub fn delivery_url(
    delivery_base: &str,
    cloud_name: &str,
    transformation: &str,
    public_id: &str,
) -> String {
    format!(
        "{}/{}/image/upload/{}/{}",
        delivery_base.trim_end_matches('/'),
        cloud_name,
        transformation,
        public_id
    )
}
