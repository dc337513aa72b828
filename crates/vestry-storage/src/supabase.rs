//! Hosted bucket storage over the Supabase storage REST API.

use crate::keys::validate_path;
use crate::traits::{ObjectStorage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use reqwest::Client;

/// Bucket storage at `{base_url}/storage/v1`.
#[derive(Clone, Debug)]
pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl SupabaseStorage {
    /// # Arguments
    /// * `base_url` - Project URL (e.g., "https://parish.supabase.co")
    /// * `api_key` - Service role key with write access to the bucket
    /// * `bucket` - Public bucket name (e.g., "site-media")
    pub fn new(
        client: Client,
        base_url: &str,
        api_key: String,
        bucket: String,
    ) -> StorageResult<Self> {
        if bucket.is_empty() || bucket.contains('/') {
            return Err(StorageError::ConfigError(format!(
                "Invalid bucket name: {:?}",
                bucket
            )));
        }

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            bucket,
        })
    }

    fn encode_path(path: &str) -> String {
        path.split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            Self::encode_path(path)
        )
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(&self, path: &str, content_type: &str, data: Vec<u8>) -> StorageResult<()> {
        validate_path(path)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(self.object_url(path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("apikey", self.api_key.as_str())
            .header("Content-Type", content_type)
            .header("cache-control", "3600")
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                bucket = %self.bucket,
                path = %path,
                status = status.as_u16(),
                error = %body,
                "Bucket upload rejected"
            );
            return Err(StorageError::UploadFailed(format!(
                "Storage API returned {}: {}",
                status, body
            )));
        }

        tracing::info!(
            bucket = %self.bucket,
            path = %path,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Bucket upload successful"
        );

        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.public_prefix(), Self::encode_path(path))
    }

    fn public_prefix(&self) -> String {
        format!(
            "{}/storage/v1/object/public/{}/",
            self.base_url, self.bucket
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Supabase
    }
}
