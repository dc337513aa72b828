//! Validation modules

pub mod upload;

pub use upload::{validate_content_type, validate_file_extension, validate_file_size, UploadPolicy};
