//! Configuration module
//!
//! Process-level configuration for the media subsystem: where settings live,
//! which fallback storage backend to use, and CDN endpoints. The media
//! configuration itself (which backends are enabled, CDN credentials) is
//! edited by administrators and read through the configuration cache instead.

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CLOUDINARY_API_BASE, DEFAULT_CLOUDINARY_DELIVERY_BASE, DEFAULT_MEDIA_CONFIG_TTL_SECS,
    DEFAULT_SETTINGS_TABLE, DEFAULT_STORAGE_BUCKET, DEFAULT_URL_MEMO_CAPACITY,
};
use crate::storage_types::{SettingsBackend, StorageBackend};

/// Process configuration loaded from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    // Hosted backend
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    // Settings store
    pub settings_backend: SettingsBackend,
    pub database_url: Option<String>,
    pub settings_table: String,
    // Fallback object storage
    pub storage_backend: StorageBackend,
    pub storage_bucket: String,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // CDN endpoints
    pub cloudinary_api_base: String,
    pub cloudinary_delivery_base: String,
    // Caching
    pub media_config_ttl_secs: u64,
    pub url_memo_capacity: usize,
    /// Unset means the HTTP client's own default.
    pub http_timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let settings_backend = match var("SETTINGS_BACKEND") {
            Some(s) => s.parse()?,
            None => SettingsBackend::Rest,
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => StorageBackend::Supabase,
        };

        let config = Config {
            environment: var("ENVIRONMENT")
                .or_else(|| var("APP_ENV"))
                .unwrap_or_else(|| "development".to_string()),
            supabase_url: var("SUPABASE_URL").map(|s| s.trim_end_matches('/').to_string()),
            supabase_key: var("SUPABASE_KEY").or_else(|| var("SUPABASE_SERVICE_ROLE_KEY")),
            settings_backend,
            database_url: var("DATABASE_URL"),
            settings_table: var("SETTINGS_TABLE")
                .unwrap_or_else(|| DEFAULT_SETTINGS_TABLE.to_string()),
            storage_backend,
            storage_bucket: var("STORAGE_BUCKET")
                .unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.to_string()),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
            cloudinary_api_base: var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|| DEFAULT_CLOUDINARY_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            cloudinary_delivery_base: var("CLOUDINARY_DELIVERY_BASE")
                .unwrap_or_else(|| DEFAULT_CLOUDINARY_DELIVERY_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            media_config_ttl_secs: var("MEDIA_CONFIG_TTL_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MEDIA_CONFIG_TTL_SECS),
            url_memo_capacity: var("URL_MEMO_CAPACITY")
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(DEFAULT_URL_MEMO_CAPACITY),
            http_timeout_secs: var("HTTP_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|&n: &u64| n > 0),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn media_config_ttl(&self) -> Duration {
        Duration::from_secs(self.media_config_ttl_secs)
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.settings_backend {
            SettingsBackend::Rest => {
                if self.supabase_url.is_none() || self.supabase_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_URL and SUPABASE_KEY must be set when using the rest settings backend"
                    ));
                }
            }
            SettingsBackend::Postgres => {
                let valid = self
                    .database_url
                    .as_deref()
                    .map(|url| url.starts_with("postgres://") || url.starts_with("postgresql://"))
                    .unwrap_or(false);
                if !valid {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string when using the postgres settings backend"
                    ));
                }
            }
        }

        match self.storage_backend {
            StorageBackend::Supabase => {
                if self.supabase_url.is_none() || self.supabase_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_URL and SUPABASE_KEY must be set when using supabase storage"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        if self.storage_bucket.contains('/') {
            return Err(anyhow::anyhow!("STORAGE_BUCKET must not contain '/'"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_hosted_backend() {
        let config = config_from(&[
            ("SUPABASE_URL", "https://parish.supabase.co/"),
            ("SUPABASE_KEY", "service-key"),
        ])
        .unwrap();

        assert_eq!(config.supabase_url.as_deref(), Some("https://parish.supabase.co"));
        assert_eq!(config.settings_backend, SettingsBackend::Rest);
        assert_eq!(config.storage_backend, StorageBackend::Supabase);
        assert_eq!(config.storage_bucket, "site-media");
        assert_eq!(config.settings_table, "site_settings");
        assert_eq!(config.media_config_ttl(), Duration::from_secs(300));
        assert_eq!(config.url_memo_capacity, 512);
        assert_eq!(config.http_timeout(), None);
        assert_eq!(config.cloudinary_api_base, "https://api.cloudinary.com/v1_1");
        assert!(!config.is_production());
    }

    #[test]
    fn rest_backend_requires_credentials() {
        let err = config_from(&[("SUPABASE_URL", "https://parish.supabase.co")]).unwrap_err();
        assert!(err.to_string().contains("SUPABASE_KEY"));
    }

    #[test]
    fn local_storage_with_postgres_settings() {
        let config = config_from(&[
            ("SETTINGS_BACKEND", "postgres"),
            ("DATABASE_URL", "postgresql://localhost/parish"),
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/var/lib/vestry"),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:8080/media"),
            ("MEDIA_CONFIG_TTL_SECS", "60"),
            ("HTTP_TIMEOUT_SECS", "15"),
        ])
        .unwrap();

        assert_eq!(config.storage_backend, StorageBackend::Local);
        assert_eq!(config.media_config_ttl_secs, 60);
        assert_eq!(config.http_timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn postgres_backend_rejects_bad_url() {
        let err = config_from(&[
            ("SETTINGS_BACKEND", "postgres"),
            ("DATABASE_URL", "mysql://localhost/parish"),
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/tmp/x"),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost/x"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn invalid_backend_name_is_an_error() {
        assert!(config_from(&[("STORAGE_BACKEND", "ftp")]).is_err());
    }
}
