//! Error types module
//!
//! This module provides the user-facing error taxonomy for the media subsystem.
//! Backend crates keep their own `thiserror` enums (`StorageError`, `CdnError`,
//! `SettingsError`) and convert into `AppError` at the point where a failure is
//! reported to an editor.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like an unreachable backend
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error reporting - defines how an error should be presented
/// to the editor who triggered it.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is transient (the same action can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the editor
    fn suggested_action(&self) -> Option<&'static str>;

    /// Editor-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from the editor
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("CDN error: {0}")]
    Cdn(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Image cannot be resolved: {0}")]
    Unresolvable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (&'static str, bool, Option<&'static str>, bool, LogLevel) {
    match err {
        AppError::Settings(_) => (
            "SETTINGS_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Storage(_) => (
            "STORAGE_ERROR",
            true,
            Some("Retry the upload"),
            true,
            LogLevel::Error,
        ),
        AppError::Cdn(_) => (
            "CDN_ERROR",
            true,
            Some("Retry the upload or check the image CDN settings"),
            true,
            LogLevel::Warn,
        ),
        AppError::InvalidInput(_) => (
            "INVALID_INPUT",
            false,
            Some("Choose a different file and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce the image size and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unresolvable(_) => (
            "IMAGE_UNRESOLVABLE",
            false,
            Some("Upload the image again"),
            false,
            LogLevel::Warn,
        ),
        AppError::Configuration(_) => (
            "CONFIGURATION_ERROR",
            false,
            Some("Check the environment configuration"),
            true,
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Settings(_) => "Failed to access site settings".to_string(),
            AppError::Storage(_) => "Failed to store the image".to_string(),
            AppError::Cdn(_) => "The image CDN rejected the upload".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Unresolvable(ref msg) => msg.clone(),
            AppError::Configuration(_) => "The media subsystem is misconfigured".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_storage() {
        let err = AppError::Storage("bucket unreachable".to_string());
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Failed to store the image");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_invalid_input() {
        let err = AppError::InvalidInput("Unsupported image type".to_string());
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Unsupported image type");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_cdn_errors_are_transient() {
        let err = AppError::Cdn("HTTP 502".to_string());
        assert!(err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert!(!err.client_message().contains("502"));
    }

    #[test]
    fn test_unresolvable_images_degrade_quietly() {
        let err = AppError::Unresolvable("fallback storage is disabled".to_string());
        assert_eq!(err.error_code(), "IMAGE_UNRESOLVABLE");
        assert!(!err.is_recoverable());
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Warn);
    }
}
