//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all fallback backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;
use vestry_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid object path: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConfigError(msg) => AppError::Configuration(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Fallback object storage
///
/// The bucket is fixed per instance; callers address objects by path only.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store raw bytes at `path`. Existing objects are not overwritten.
    async fn upload(&self, path: &str, content_type: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Publicly reachable URL for `path`. Does not check that the object exists.
    fn public_url(&self, path: &str) -> String;

    /// Prefix shared by every URL from [`ObjectStorage::public_url`], ending in `/`.
    ///
    /// Used to recognise references that point at this backend.
    fn public_prefix(&self) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
