//! Delivery URL resolution over live configuration.
//!
//! Run with: `cargo test -p vestry-media --test resolution_test`

mod helpers;

use helpers::{cdn_settings, setup, BUCKET_PREFIX};
use vestry_core::constants::SETTING_SUPABASE_STORAGE_ENABLED;
use vestry_core::{MediaReference, TransformOptions};
use vestry_db::InMemorySettingsStore;

#[tokio::test]
async fn test_cdn_reference_transform() {
    let media = setup(cdn_settings(true), "http://127.0.0.1:9");
    let reference = MediaReference::cdn(
        "albums/x7fk2mq",
        "https://res.cloudinary.com/parish/image/upload/v1/albums/x7fk2mq.jpg",
    );

    let url = media
        .resolver
        .resolve(&reference, &TransformOptions::new().width(400).quality(85))
        .await;

    assert!(url.contains("w_400"));
    assert!(url.contains("q_85"));
    assert!(url.ends_with("/albums/x7fk2mq"));
    assert!(url.starts_with("https://res.cloudinary.com/parish/image/upload/"));
}

#[tokio::test]
async fn test_disabled_bucket_resolves_empty() {
    let settings = InMemorySettingsStore::with_values([(SETTING_SUPABASE_STORAGE_ENABLED, "false")]);
    let media = setup(settings, "http://127.0.0.1:9");
    let reference = MediaReference::direct(format!("{}slides/slide-1.jpg", BUCKET_PREFIX));

    let url = media
        .resolver
        .resolve(&reference, &TransformOptions::new().width(1200))
        .await;
    assert_eq!(url, "");
}

#[tokio::test]
async fn test_stock_photo_unchanged() {
    let media = setup(cdn_settings(true), "http://127.0.0.1:9");
    let stock = "https://images.pexels.com/photos/208315/pexels-photo-208315.jpeg?auto=compress&cs=tinysrgb&w=1260";

    let url = media
        .resolver
        .resolve(
            &MediaReference::direct(stock),
            &TransformOptions::new().width(400).quality(85),
        )
        .await;
    assert_eq!(url.as_bytes(), stock.as_bytes());
}

#[tokio::test]
async fn test_resolve_is_idempotent_and_cached() {
    let media = setup(cdn_settings(true), "http://127.0.0.1:9");
    let reference = MediaReference::cdn("albums/x7fk2mq", "");
    let options = TransformOptions::new().width(400).height(300);

    let first = media.resolver.resolve(&reference, &options).await;
    let second = media.resolver.resolve(&reference, &options).await;

    assert_eq!(first, second);
    assert_eq!(media.settings.get_calls(), 1);
}

#[tokio::test]
async fn test_configuration_outage_uses_defaults() {
    let settings = cdn_settings(true);
    settings.set_fail_reads(true);
    let media = setup(settings, "http://127.0.0.1:9");

    // Defaults disable the CDN, so a CDN reference with a URL falls back to that URL.
    let reference = MediaReference::cdn(
        "albums/x7fk2mq",
        "https://res.cloudinary.com/parish/image/upload/v1/albums/x7fk2mq.jpg",
    );
    let url = media
        .resolver
        .resolve(&reference, &TransformOptions::new().width(400))
        .await;
    assert_eq!(
        url,
        "https://res.cloudinary.com/parish/image/upload/v1/albums/x7fk2mq.jpg"
    );
}

const OTHER_BUCKET_URL: &str =
    "https://parish.supabase.co/storage/v1/object/public/gallery/albums/a.jpg";

#[tokio::test]
async fn test_other_bucket_on_storage_host_obeys_disabled_storage() {
    let settings = InMemorySettingsStore::with_values([(SETTING_SUPABASE_STORAGE_ENABLED, "false")]);
    let media = setup(settings, "http://127.0.0.1:9");

    let url = media
        .resolver
        .resolve(
            &MediaReference::direct(OTHER_BUCKET_URL),
            &TransformOptions::new().width(600),
        )
        .await;
    assert_eq!(url, "");
}

#[tokio::test]
async fn test_other_bucket_on_storage_host_gets_query_hints() {
    let media = setup(InMemorySettingsStore::new(), "http://127.0.0.1:9");

    let url = media
        .resolver
        .resolve(
            &MediaReference::direct(OTHER_BUCKET_URL),
            &TransformOptions::new().width(600),
        )
        .await;
    assert_eq!(url, format!("{}?width=600&format=webp", OTHER_BUCKET_URL));
}
