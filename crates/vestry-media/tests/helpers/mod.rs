//! Test helpers: wire the media components over in-memory doubles.
//!
//! Run from workspace root: `cargo test -p vestry-media`.

#![allow(dead_code)]

pub mod storage;

use std::sync::Arc;
use std::time::Duration;
use vestry_core::constants::{
    SETTING_CLOUDINARY_CLOUD_NAME, SETTING_CLOUDINARY_ENABLED, SETTING_CLOUDINARY_UPLOAD_PRESET,
};
use vestry_core::{FileUpload, ManualClock};
use vestry_db::InMemorySettingsStore;
use vestry_media::{
    CdnClient, DeliveryUrlResolver, MediaConfigProvider, RecordingNotifier, UploadRouter,
};

pub use storage::RecordingStorage;

pub const BUCKET_PREFIX: &str = "https://parish.supabase.co/storage/v1/object/public/site-media/";
pub const DELIVERY_BASE: &str = "https://res.cloudinary.com";

/// All media components sharing one settings store, clock and bucket.
pub struct TestMedia {
    pub settings: InMemorySettingsStore,
    pub storage: Arc<RecordingStorage>,
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<RecordingNotifier>,
    pub config: Arc<MediaConfigProvider>,
    pub router: UploadRouter,
    pub resolver: DeliveryUrlResolver,
}

pub fn setup(settings: InMemorySettingsStore, cdn_api_base: &str) -> TestMedia {
    let storage = Arc::new(RecordingStorage::new(BUCKET_PREFIX));
    let clock = Arc::new(ManualClock::default());
    let notifier = Arc::new(RecordingNotifier::new());
    let config = Arc::new(MediaConfigProvider::new(
        Arc::new(settings.clone()),
        clock.clone(),
        Duration::from_secs(300),
    ));

    let router = UploadRouter::new(
        config.clone(),
        CdnClient::new(reqwest::Client::new(), cdn_api_base),
        storage.clone(),
        notifier.clone(),
        clock.clone(),
    );
    let resolver = DeliveryUrlResolver::new(
        config.clone(),
        DELIVERY_BASE,
        storage.prefix().to_string(),
        64,
    );

    TestMedia {
        settings,
        storage,
        clock,
        notifier,
        config,
        router,
        resolver,
    }
}

/// Settings with the CDN account configured and the given enabled flag.
pub fn cdn_settings(cdn_enabled: bool) -> InMemorySettingsStore {
    InMemorySettingsStore::with_values([
        (SETTING_CLOUDINARY_ENABLED, if cdn_enabled { "true" } else { "false" }),
        (SETTING_CLOUDINARY_CLOUD_NAME, "parish"),
        (SETTING_CLOUDINARY_UPLOAD_PRESET, "unsigned_site"),
    ])
}

pub fn jpeg(name: &str, size: usize) -> FileUpload {
    let mut data = vec![0u8; size.max(3)];
    data[..3].copy_from_slice(&[0xff, 0xd8, 0xff]);
    FileUpload::new(name, "image/jpeg", data)
}

pub const CDN_UPLOAD_RESPONSE: &str = r#"{
    "public_id": "albums/x7fk2mq",
    "version": 1718020800,
    "format": "jpg",
    "url": "http://res.cloudinary.com/parish/image/upload/v1718020800/albums/x7fk2mq.jpg",
    "secure_url": "https://res.cloudinary.com/parish/image/upload/v1718020800/albums/x7fk2mq.jpg"
}"#;
