//! Delivery URL resolution
//!
//! Priority, evaluated once per call:
//!
//! 1. asset identifier + CDN enabled + cloud name → CDN transformation URL
//! 2. URL on the fallback storage host, storage enabled → URL with query-string hints
//! 3. URL on the fallback storage host, storage disabled → empty string
//! 4. any other URL → returned unchanged
//!
//! Results are memoized in a bounded LRU keyed by reference and options. The
//! memo is cleared whenever the media configuration changes value.

use lru::LruCache;
use reqwest::Url;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use vestry_core::{
    AppError, ErrorMetadata, LogLevel, MediaConfiguration, MediaReference, TransformOptions,
};

use crate::cdn::delivery_url;
use crate::config_cache::MediaConfigProvider;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemoKey {
    reference: MediaReference,
    options: TransformOptions,
}

struct Memo {
    config: Option<Arc<MediaConfiguration>>,
    urls: LruCache<MemoKey, String>,
}

pub struct DeliveryUrlResolver {
    config: Arc<MediaConfigProvider>,
    delivery_base: String,
    storage_origin: Option<Url>,
    memo: Mutex<Memo>,
}

impl DeliveryUrlResolver {
    /// # Arguments
    /// * `delivery_base` - CDN delivery root (e.g., "https://res.cloudinary.com")
    /// * `storage_prefix` - Public URL prefix of the fallback bucket; only its
    ///   scheme, host and port are used to recognise storage URLs
    /// * `memo_capacity` - Maximum memoized URLs; zero is treated as one
    pub fn new(
        config: Arc<MediaConfigProvider>,
        delivery_base: &str,
        storage_prefix: String,
        memo_capacity: usize,
    ) -> Self {
        let capacity = NonZeroUsize::new(memo_capacity).unwrap_or(NonZeroUsize::MIN);
        let storage_origin = Url::parse(&storage_prefix)
            .ok()
            .filter(|url| url.host_str().is_some());
        if storage_origin.is_none() && !storage_prefix.is_empty() {
            tracing::warn!(
                prefix = %storage_prefix,
                "Storage URL prefix has no host, bucket URLs will be passed through unchanged"
            );
        }
        Self {
            config,
            delivery_base: delivery_base.trim_end_matches('/').to_string(),
            storage_origin,
            memo: Mutex::new(Memo {
                config: None,
                urls: LruCache::new(capacity),
            }),
        }
    }

    /// Final URL for an image tag. An empty string means "render nothing".
    pub async fn resolve(&self, reference: &MediaReference, options: &TransformOptions) -> String {
        if reference.is_empty() {
            return String::new();
        }

        let config = self.config.get().await;
        let key = MemoKey {
            reference: reference.clone(),
            options: options.clone(),
        };

        let mut memo = self.memo.lock().await;
        let changed = match memo.config.as_ref() {
            Some(previous) => !Arc::ptr_eq(previous, &config) && **previous != *config,
            None => false,
        };
        if changed {
            tracing::debug!(
                entries = memo.urls.len(),
                "Media configuration changed, clearing URL memo"
            );
            memo.urls.clear();
        }
        memo.config = Some(config.clone());

        if let Some(url) = memo.urls.get(&key) {
            return url.clone();
        }

        let url = self.compute(&config, reference, options);
        memo.urls.put(key, url.clone());
        url
    }

    fn compute(
        &self,
        config: &MediaConfiguration,
        reference: &MediaReference,
        options: &TransformOptions,
    ) -> String {
        if let (Some(public_id), Some(cloud_name)) = (reference.public_id(), config.cdn_cloud_name())
        {
            return delivery_url(
                &self.delivery_base,
                cloud_name,
                &options.to_cdn_transformation(),
                public_id,
            );
        }

        match reference.url() {
            Some(url) if self.is_fallback_url(url) => {
                if config.storage_enabled {
                    append_query(url, &options.to_query_params())
                } else {
                    unresolvable(AppError::Unresolvable(format!(
                        "fallback storage is disabled: {}",
                        url
                    )))
                }
            }
            Some(url) => url.to_string(),
            None => unresolvable(AppError::Unresolvable(format!(
                "CDN asset {} needs the CDN, which is disabled or unconfigured",
                reference.public_id().unwrap_or_default()
            ))),
        }
    }

    fn is_fallback_url(&self, url: &str) -> bool {
        match (self.storage_origin.as_ref(), Url::parse(url)) {
            (Some(storage), Ok(candidate)) => same_host(storage, &candidate),
            _ => false,
        }
    }
}

/// Scheme, host and port match. Paths (and therefore buckets) are ignored.
fn same_host(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str().is_some()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Log a reference that cannot be rendered and degrade it to no image.
fn unresolvable(err: AppError) -> String {
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %err, error_code = err.error_code(), "Image not rendered")
        }
        LogLevel::Warn => {
            tracing::warn!(error = %err, error_code = err.error_code(), "Image not rendered")
        }
        LogLevel::Error => {
            tracing::error!(error = %err, error_code = err.error_code(), "Image not rendered")
        }
    }
    String::new()
}

fn append_query(url: &str, params: &[(&'static str, String)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }
    let query = params
        .iter()
        .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vestry_core::constants::{
        SETTING_CLOUDINARY_CLOUD_NAME, SETTING_CLOUDINARY_ENABLED,
        SETTING_SUPABASE_STORAGE_ENABLED,
    };
    use vestry_core::ManualClock;
    use vestry_db::InMemorySettingsStore;

    const PREFIX: &str = "https://parish.supabase.co/storage/v1/object/public/site-media/";

    fn resolver(store: &InMemorySettingsStore) -> (DeliveryUrlResolver, Arc<MediaConfigProvider>) {
        let provider = Arc::new(MediaConfigProvider::new(
            Arc::new(store.clone()),
            Arc::new(ManualClock::default()),
            Duration::from_secs(300),
        ));
        let resolver = DeliveryUrlResolver::new(
            provider.clone(),
            "https://res.cloudinary.com",
            PREFIX.to_string(),
            8,
        );
        (resolver, provider)
    }

    #[tokio::test]
    async fn cdn_reference_gets_a_transformation_url() {
        let store = InMemorySettingsStore::with_values([
            (SETTING_CLOUDINARY_ENABLED, "true"),
            (SETTING_CLOUDINARY_CLOUD_NAME, "parish"),
        ]);
        let (resolver, _) = resolver(&store);

        let reference = MediaReference::cdn("albums/abc123", "https://res.cloudinary.com/x.jpg");
        let url = resolver
            .resolve(&reference, &TransformOptions::new().width(400).quality(85))
            .await;

        assert_eq!(
            url,
            "https://res.cloudinary.com/parish/image/upload/c_fill,g_center,w_400,q_85,f_auto/albums/abc123"
        );
    }

    #[tokio::test]
    async fn cdn_reference_uses_its_url_when_cdn_is_disabled() {
        let store = InMemorySettingsStore::with_values([(SETTING_CLOUDINARY_CLOUD_NAME, "parish")]);
        let (resolver, _) = resolver(&store);

        let reference = MediaReference::cdn("albums/abc123", "https://res.cloudinary.com/x.jpg");
        let url = resolver.resolve(&reference, &TransformOptions::new().width(400)).await;
        assert_eq!(url, "https://res.cloudinary.com/x.jpg");

        let bare = MediaReference {
            public_id: Some("albums/abc123".to_string()),
            url: None,
        };
        assert_eq!(resolver.resolve(&bare, &TransformOptions::new()).await, "");
    }

    #[tokio::test]
    async fn bucket_url_gets_query_hints() {
        let store = InMemorySettingsStore::new();
        let (resolver, _) = resolver(&store);

        let url = format!("{}albums/a.png", PREFIX);
        let resolved = resolver
            .resolve(&MediaReference::direct(&url), &TransformOptions::new().width(320))
            .await;
        assert_eq!(resolved, format!("{}?width=320&format=webp", url));
    }

    #[tokio::test]
    async fn disabled_bucket_resolves_to_empty() {
        let store = InMemorySettingsStore::with_values([(SETTING_SUPABASE_STORAGE_ENABLED, "false")]);
        let (resolver, _) = resolver(&store);

        let reference = MediaReference::direct(format!("{}albums/a.png", PREFIX));
        assert_eq!(resolver.resolve(&reference, &TransformOptions::new()).await, "");
    }

    #[tokio::test]
    async fn external_urls_pass_through_unchanged() {
        let store = InMemorySettingsStore::new();
        let (resolver, _) = resolver(&store);

        let url = "https://images.unsplash.com/photo-1?ixlib=rb-4.0.3&w=1080";
        let resolved = resolver
            .resolve(&MediaReference::direct(url), &TransformOptions::new().width(600))
            .await;
        assert_eq!(resolved, url);
    }

    #[tokio::test]
    async fn empty_reference_resolves_without_fetching_settings() {
        let store = InMemorySettingsStore::new();
        let (resolver, _) = resolver(&store);

        assert_eq!(
            resolver
                .resolve(&MediaReference::default(), &TransformOptions::new())
                .await,
            ""
        );
        assert_eq!(store.get_calls(), 0);
    }

    #[tokio::test]
    async fn memo_is_cleared_when_configuration_changes() {
        let store = InMemorySettingsStore::new();
        let (resolver, provider) = resolver(&store);
        let reference = MediaReference::direct(format!("{}albums/a.png", PREFIX));

        assert!(!resolver.resolve(&reference, &TransformOptions::new()).await.is_empty());

        provider
            .save(&vestry_core::MediaSettingsUpdate {
                storage_enabled: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(resolver.resolve(&reference, &TransformOptions::new()).await, "");
    }

    #[tokio::test]
    async fn memo_is_bounded() {
        let store = InMemorySettingsStore::new();
        let (resolver, _) = resolver(&store);

        for width in 0..32 {
            let reference = MediaReference::direct(format!("{}albums/a.png", PREFIX));
            resolver
                .resolve(&reference, &TransformOptions::new().width(width))
                .await;
        }

        assert_eq!(resolver.memo.lock().await.urls.len(), 8);
    }

    #[test]
    fn storage_urls_are_matched_by_host() {
        let storage = Url::parse(PREFIX).unwrap();
        let host = |url: &str| same_host(&storage, &Url::parse(url).unwrap());

        assert!(host("https://parish.supabase.co/storage/v1/object/public/gallery/a.jpg"));
        assert!(host("https://PARISH.supabase.co:443/other/path.png"));
        assert!(!host("http://parish.supabase.co/storage/v1/object/public/site-media/a.jpg"));
        assert!(!host("https://parish.supabase.co:8443/a.jpg"));
        assert!(!host("https://other.supabase.co/storage/v1/object/public/site-media/a.jpg"));
    }

    #[tokio::test]
    async fn prefix_without_host_matches_nothing() {
        let store = InMemorySettingsStore::new();
        let provider = Arc::new(MediaConfigProvider::new(
            Arc::new(store.clone()),
            Arc::new(ManualClock::default()),
            Duration::from_secs(300),
        ));
        let resolver =
            DeliveryUrlResolver::new(provider, "https://res.cloudinary.com", String::new(), 8);

        let url = "https://parish.supabase.co/storage/v1/object/public/site-media/a.png";
        assert_eq!(
            resolver
                .resolve(&MediaReference::direct(url), &TransformOptions::new().width(10))
                .await,
            url
        );
    }

    #[test]
    fn query_is_appended_to_existing_query() {
        let params = vec![("width", "10".to_string())];
        assert_eq!(append_query("https://x/a.png?v=2", &params), "https://x/a.png?v=2&width=10");
        assert_eq!(append_query("https://x/a.png", &params), "https://x/a.png?width=10");
    }
}
