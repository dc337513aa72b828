//! Result of routing one upload.

use serde::Serialize;

use super::media::MediaReference;
use crate::error::{AppError, ErrorMetadata};

/// Which backend ended up holding the file, or why none did.
///
/// Never partially populated: successful variants always carry a non-empty
/// [`MediaReference`], the failure variant carries only a reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// Accepted by the CDN; the reference carries the asset identifier.
    Cdn { reference: MediaReference },
    /// Stored in the fallback bucket; the reference carries only a URL.
    /// `cdn_error` is set when the CDN was tried first and failed.
    Fallback {
        reference: MediaReference,
        #[serde(skip_serializing_if = "Option::is_none")]
        cdn_error: Option<String>,
    },
    Failed(UploadFailure),
}

impl UploadOutcome {
    pub fn reference(&self) -> Option<&MediaReference> {
        match self {
            UploadOutcome::Cdn { reference } | UploadOutcome::Fallback { reference, .. } => {
                Some(reference)
            }
            UploadOutcome::Failed(_) => None,
        }
    }

    pub fn into_reference(self) -> Option<MediaReference> {
        match self {
            UploadOutcome::Cdn { reference } | UploadOutcome::Fallback { reference, .. } => {
                Some(reference)
            }
            UploadOutcome::Failed(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, UploadOutcome::Failed(_))
    }

    pub fn failure(&self) -> Option<&UploadFailure> {
        match self {
            UploadOutcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Human-readable reason an upload did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadFailure {
    pub code: &'static str,
    pub reason: String,
    /// Transient failures can be retried as-is.
    pub retryable: bool,
}

impl From<&AppError> for UploadFailure {
    fn from(err: &AppError) -> Self {
        let reason = match err.suggested_action() {
            Some(action) => format!("{}. {}", err.client_message(), action),
            None => err.client_message(),
        };
        Self {
            code: err.error_code(),
            reason,
            retryable: err.is_recoverable(),
        }
    }
}

impl From<AppError> for UploadFailure {
    fn from(err: AppError) -> Self {
        UploadFailure::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_from_storage_error_is_retryable() {
        let failure = UploadFailure::from(AppError::Storage("503 from bucket".to_string()));
        assert_eq!(failure.code, "STORAGE_ERROR");
        assert!(failure.retryable);
        assert!(failure.reason.starts_with("Failed to store the image"));
        assert!(!failure.reason.contains("503"));
    }

    #[test]
    fn outcome_accessors() {
        let outcome = UploadOutcome::Fallback {
            reference: MediaReference::direct("https://example.org/a.jpg"),
            cdn_error: None,
        };
        assert!(outcome.is_success());
        assert_eq!(
            outcome.reference().and_then(|r| r.url()),
            Some("https://example.org/a.jpg")
        );

        let failed = UploadOutcome::Failed(UploadFailure::from(AppError::Cdn("x".into())));
        assert!(!failed.is_success());
        assert!(failed.reference().is_none());
        assert_eq!(failed.failure().map(|f| f.code), Some("CDN_ERROR"));
    }

    #[test]
    fn serializes_with_status_tag() {
        let outcome = UploadOutcome::Cdn {
            reference: MediaReference::cdn("albums/x", "https://res.example.com/x.jpg"),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "cdn");
        assert_eq!(json["reference"]["public_id"], "albums/x");
    }
}
