//! Upload routing between the image CDN and the fallback bucket.
//!
//! Attempts are strictly sequential: the CDN attempt resolves fully before a
//! fallback attempt starts, so one call never produces two live objects.

use std::sync::Arc;
use vestry_core::{
    AppError, Clock, ErrorMetadata, FileUpload, LogLevel, MediaConfiguration, MediaReference,
    UploadFailure, UploadOutcome,
};
use vestry_storage::{generate_object_name, object_path, ObjectStorage};

use crate::cdn::CdnClient;
use crate::config_cache::MediaConfigProvider;
use crate::notify::{Notification, Notifier};

/// What to do when the CDN attempt fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Retry once on the fallback bucket.
    OnCdnFailure,
    /// Report the CDN failure as the outcome.
    Never,
}

pub struct UploadRouter {
    config: Arc<MediaConfigProvider>,
    cdn: CdnClient,
    storage: Arc<dyn ObjectStorage>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl UploadRouter {
    pub fn new(
        config: Arc<MediaConfigProvider>,
        cdn: CdnClient,
        storage: Arc<dyn ObjectStorage>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            cdn,
            storage,
            notifier,
            clock,
        }
    }

    /// Place one file under `folder` and report where it went.
    ///
    /// The file is expected to be validated already. Every call ends in
    /// exactly one notification; failures are returned as
    /// [`UploadOutcome::Failed`], never as an error.
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name, size_bytes = file.size()))]
    pub async fn upload(
        &self,
        file: &FileUpload,
        folder: &str,
        policy: FallbackPolicy,
    ) -> UploadOutcome {
        let config = self.config.get().await;

        let outcome = if config.cdn_enabled {
            match self.upload_to_cdn(&config, file, folder).await {
                Ok(reference) => UploadOutcome::Cdn { reference },
                Err(cdn_err) => match policy {
                    FallbackPolicy::OnCdnFailure => {
                        tracing::warn!(
                            error = %cdn_err,
                            folder = %folder,
                            "CDN upload failed, retrying on fallback storage"
                        );
                        match self.upload_to_storage(&config, file, folder).await {
                            Ok(reference) => UploadOutcome::Fallback {
                                reference,
                                cdn_error: Some(cdn_err.to_string()),
                            },
                            Err(storage_err) => self.failed(&storage_err),
                        }
                    }
                    FallbackPolicy::Never => self.failed(&cdn_err),
                },
            }
        } else {
            match self.upload_to_storage(&config, file, folder).await {
                Ok(reference) => UploadOutcome::Fallback {
                    reference,
                    cdn_error: None,
                },
                Err(storage_err) => self.failed(&storage_err),
            }
        };

        self.notify(&outcome);
        outcome
    }

    async fn upload_to_cdn(
        &self,
        config: &MediaConfiguration,
        file: &FileUpload,
        folder: &str,
    ) -> Result<MediaReference, AppError> {
        let response = self
            .cdn
            .upload(config, file, folder, self.clock.now().timestamp())
            .await?;
        Ok(response.into_reference())
    }

    async fn upload_to_storage(
        &self,
        config: &MediaConfiguration,
        file: &FileUpload,
        folder: &str,
    ) -> Result<MediaReference, AppError> {
        if !config.storage_enabled {
            tracing::warn!(
                folder = %folder,
                "Fallback storage is disabled; uploading anyway, the image will not render until it is re-enabled"
            );
        }

        let extension = file.extension();
        let name = generate_object_name(
            extension.as_deref(),
            file.name_prefix.as_deref(),
            self.clock.now(),
        );
        let path = object_path(folder, &name)?;

        self.storage
            .upload(&path, &file.content_type, file.data.clone())
            .await?;

        let url = self.storage.public_url(&path);
        tracing::info!(
            backend = %self.storage.backend_type(),
            path = %path,
            size_bytes = file.size(),
            "Stored image in fallback storage"
        );
        Ok(MediaReference::direct(url))
    }

    fn failed(&self, err: &AppError) -> UploadOutcome {
        match err.log_level() {
            LogLevel::Debug => tracing::debug!(
                error = %err,
                error_code = err.error_code(),
                "Image upload rejected"
            ),
            LogLevel::Warn | LogLevel::Error => tracing::error!(
                error = %err,
                error_code = err.error_code(),
                "Image upload failed"
            ),
        }
        UploadOutcome::Failed(UploadFailure::from(err))
    }

    fn notify(&self, outcome: &UploadOutcome) {
        let notification = match outcome {
            UploadOutcome::Cdn { .. } => {
                Notification::success("Image uploaded", "Stored on the image CDN")
            }
            UploadOutcome::Fallback { .. } => {
                Notification::success("Image uploaded", "Stored in site storage")
            }
            UploadOutcome::Failed(failure) => {
                Notification::error("Upload failed", failure.reason.clone())
            }
        };
        self.notifier.notify(notification);
    }
}
