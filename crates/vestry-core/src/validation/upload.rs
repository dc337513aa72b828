//! Caller-side checks for editor uploads.
//!
//! The upload router stores whatever it is handed; forms run these checks first.

use crate::error::AppError;
use crate::models::FileUpload;

const DEFAULT_MAX_FILE_SIZE_MB: usize = 10;

/// Size and type limits applied before an upload is routed.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_file_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
            allowed_content_types: ["image/jpeg", "image/png", "image/gif", "image/webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allowed_extensions: ["jpg", "jpeg", "png", "gif", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl UploadPolicy {
    pub fn validate(&self, file: &FileUpload) -> Result<(), AppError> {
        if file.data.is_empty() {
            return Err(AppError::InvalidInput("The selected file is empty".to_string()));
        }
        validate_file_size(file.size(), self.max_file_size_bytes)?;
        validate_content_type(&file.content_type, &self.allowed_content_types)?;
        validate_file_extension(file, &self.allowed_extensions)?;
        Ok(())
    }
}

pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

pub fn validate_content_type(content_type: &str, allowed_types: &[String]) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if !allowed_types.iter().any(|ct| normalized == ct.to_lowercase()) {
        return Err(AppError::InvalidInput(format!(
            "Invalid content type. Allowed types: {}",
            allowed_types.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_file_extension(
    file: &FileUpload,
    allowed_extensions: &[String],
) -> Result<String, AppError> {
    let extension = file.extension().unwrap_or_default();

    if !allowed_extensions.contains(&extension) {
        return Err(AppError::InvalidInput(format!(
            "Invalid file extension. Allowed extensions: {}",
            allowed_extensions.join(", ")
        )));
    }

    Ok(extension)
}

/// Strip parameters such as `; charset=binary`.
fn normalize_mime_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or(content_type).trim()
}
