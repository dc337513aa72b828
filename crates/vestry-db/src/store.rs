//! Settings store abstraction
//!
//! Site settings are plain key/value rows. The configuration cache is the only
//! reader of the media keys; the admin settings form is the only writer.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use vestry_core::{AppError, SettingEntry};

/// Settings store errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Settings endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode settings: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::ConfigError(msg) => AppError::Configuration(msg),
            other => AppError::Settings(other.to_string()),
        }
    }
}

/// Key/value settings persistence.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the given keys. Keys with no row are absent from the map.
    async fn get(&self, keys: &[&str]) -> SettingsResult<HashMap<String, String>>;

    /// Insert or overwrite rows by key.
    async fn upsert(&self, entries: &[SettingEntry]) -> SettingsResult<()>;
}
