//! Wiring shared by the `vestry` binary.

use anyhow::Context;
use std::sync::Arc;
use vestry_core::models::{ImageFormat, Quality};
use vestry_core::{AppError, Config, SystemClock, TransformOptions};
use vestry_db::create_settings_store;
use vestry_media::{
    CdnClient, DeliveryUrlResolver, MediaConfigProvider, TracingNotifier, UploadRouter,
};
use vestry_storage::create_storage;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vestry=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// One HTTP client for every backend. No timeout unless configured.
pub fn build_http_client(config: &Config) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.http_timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().context("Failed to build HTTP client")
}

/// The media components, constructed once per process.
pub struct MediaServices {
    pub config: Arc<MediaConfigProvider>,
    pub cdn: CdnClient,
    pub router: UploadRouter,
    pub resolver: DeliveryUrlResolver,
}

pub async fn build_services(config: &Config) -> anyhow::Result<MediaServices> {
    let client = build_http_client(config)?;
    let clock = Arc::new(SystemClock);

    let settings = create_settings_store(config, client.clone())
        .await
        .context("Failed to create settings store")?;
    let storage = create_storage(config, client.clone())
        .await
        .context("Failed to create fallback storage")?;

    let provider = Arc::new(MediaConfigProvider::new(
        settings,
        clock.clone(),
        config.media_config_ttl(),
    ));
    let cdn = CdnClient::new(client, &config.cloudinary_api_base);

    let resolver = DeliveryUrlResolver::new(
        provider.clone(),
        &config.cloudinary_delivery_base,
        storage.public_prefix(),
        config.url_memo_capacity,
    );
    let router = UploadRouter::new(
        provider.clone(),
        cdn.clone(),
        storage,
        Arc::new(TracingNotifier),
        clock,
    );

    tracing::debug!(
        settings_backend = %config.settings_backend,
        storage_backend = %config.storage_backend,
        "Media services ready"
    );

    Ok(MediaServices {
        config: provider,
        cdn,
        router,
        resolver,
    })
}

/// Merge a transform string with explicit flags; flags win.
pub fn transform_options(
    transform: Option<&str>,
    width: Option<u32>,
    height: Option<u32>,
    quality: Option<&str>,
    format: Option<&str>,
) -> Result<TransformOptions, AppError> {
    let mut options = match transform {
        Some(s) => TransformOptions::parse_cdn_transformation(s)?,
        None => TransformOptions::default(),
    };
    if let Some(w) = width {
        options.width = Some(positive_dimension("width", w)?);
    }
    if let Some(h) = height {
        options.height = Some(positive_dimension("height", h)?);
    }
    if let Some(q) = quality {
        options.quality = Some(q.parse::<Quality>()?);
    }
    if let Some(f) = format {
        options.format = Some(f.parse::<ImageFormat>()?);
    }
    Ok(options)
}

fn positive_dimension(name: &str, value: u32) -> Result<u32, AppError> {
    if value == 0 {
        return Err(AppError::InvalidInput(format!("{} must be at least 1", name)));
    }
    Ok(value)
}

/// Content type for an image file name, by extension.
pub fn content_type_for(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
