//! Domain models for the media subsystem.

pub mod media;
pub mod media_config;
pub mod transform;
pub mod upload;

pub use media::{FileUpload, MediaReference};
pub use media_config::{parse_flag, MediaConfiguration, MediaSettingsUpdate, SettingEntry};
pub use transform::{CropMode, Gravity, ImageFormat, Quality, TransformOptions};
pub use upload::{UploadFailure, UploadOutcome};
