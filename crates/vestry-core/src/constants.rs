//! Settings keys and defaults shared by every media component.

/// CDN account (cloud) name.
pub const SETTING_CLOUDINARY_CLOUD_NAME: &str = "cloudinary_cloud_name";
/// CDN API key, used for credential verification.
pub const SETTING_CLOUDINARY_API_KEY: &str = "cloudinary_api_key";
/// CDN API secret, used for credential verification.
pub const SETTING_CLOUDINARY_API_SECRET: &str = "cloudinary_api_secret";
/// Unsigned upload preset name.
pub const SETTING_CLOUDINARY_UPLOAD_PRESET: &str = "cloudinary_upload_preset";
/// Whether the CDN backend is enabled.
pub const SETTING_CLOUDINARY_ENABLED: &str = "cloudinary_enabled";
/// Whether the fallback object-storage backend is enabled.
pub const SETTING_SUPABASE_STORAGE_ENABLED: &str = "supabase_storage_enabled";

/// Every key the configuration cache reads in one fetch.
pub const MEDIA_SETTING_KEYS: [&str; 6] = [
    SETTING_CLOUDINARY_CLOUD_NAME,
    SETTING_CLOUDINARY_API_KEY,
    SETTING_CLOUDINARY_API_SECRET,
    SETTING_CLOUDINARY_UPLOAD_PRESET,
    SETTING_CLOUDINARY_ENABLED,
    SETTING_SUPABASE_STORAGE_ENABLED,
];

/// Default lifetime of a cached media configuration.
pub const DEFAULT_MEDIA_CONFIG_TTL_SECS: u64 = 300;

/// Default number of resolved URLs kept by the delivery resolver.
pub const DEFAULT_URL_MEMO_CAPACITY: usize = 512;

/// Default table holding key/value site settings.
pub const DEFAULT_SETTINGS_TABLE: &str = "site_settings";

/// Default bucket for fallback uploads.
pub const DEFAULT_STORAGE_BUCKET: &str = "site-media";

pub const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";
pub const DEFAULT_CLOUDINARY_DELIVERY_BASE: &str = "https://res.cloudinary.com";
