//! Vestry Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration and
//! validation shared by the media components of the parish site: the settings
//! store, the fallback object storage, the upload router and the delivery URL
//! resolver.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    FileUpload, MediaConfiguration, MediaReference, MediaSettingsUpdate, SettingEntry,
    TransformOptions, UploadFailure, UploadOutcome,
};
pub use storage_types::{SettingsBackend, StorageBackend};
pub use validation::UploadPolicy;
