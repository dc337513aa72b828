//! Media configuration cache
//!
//! One provider per process, shared as `Arc<MediaConfigProvider>`. Reads are
//! served from memory until the TTL elapses; saves invalidate synchronously so
//! the next image operation sees the new settings.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use vestry_core::constants::MEDIA_SETTING_KEYS;
use vestry_core::{AppError, Clock, MediaConfiguration, MediaSettingsUpdate};
use vestry_db::SettingsStore;

struct CachedConfig {
    config: Arc<MediaConfiguration>,
    fetched_at: DateTime<Utc>,
}

pub struct MediaConfigProvider {
    store: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    cached: RwLock<Option<CachedConfig>>,
}

impl MediaConfigProvider {
    pub fn new(store: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            store,
            clock,
            ttl,
            cached: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &CachedConfig, now: DateTime<Utc>) -> bool {
        // A clock that moved backwards counts as expired.
        match now.signed_duration_since(entry.fetched_at).to_std() {
            Ok(age) => age < self.ttl,
            Err(_) => false,
        }
    }

    /// Current media configuration.
    ///
    /// Never fails: if the settings store cannot be read, the default
    /// configuration (CDN off, fallback storage on) is returned and nothing
    /// is cached, so the next call tries the store again.
    pub async fn get(&self) -> Arc<MediaConfiguration> {
        {
            let cached = self.cached.read().await;
            if let Some(entry) = cached.as_ref() {
                if self.is_fresh(entry, self.clock.now()) {
                    tracing::debug!("Media configuration cache hit");
                    return entry.config.clone();
                }
            }
        }

        let mut cached = self.cached.write().await;

        // Another caller may have refreshed while we waited for the lock
        if let Some(entry) = cached.as_ref() {
            if self.is_fresh(entry, self.clock.now()) {
                return entry.config.clone();
            }
        }

        tracing::debug!("Media configuration cache miss, fetching settings");

        match self.store.get(&MEDIA_SETTING_KEYS).await {
            Ok(values) => {
                let config = Arc::new(MediaConfiguration::from_settings(&values));
                *cached = Some(CachedConfig {
                    config: config.clone(),
                    fetched_at: self.clock.now(),
                });
                tracing::debug!(
                    cdn_enabled = config.cdn_enabled,
                    storage_enabled = config.storage_enabled,
                    "Media configuration loaded"
                );
                config
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to load media settings, using defaults"
                );
                Arc::new(MediaConfiguration::default())
            }
        }
    }

    /// Drop the cached configuration; the next `get` fetches.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
        tracing::debug!("Media configuration cache invalidated");
    }

    /// Persist administrator edits, then invalidate.
    ///
    /// On a failed write the cached configuration is left as it was.
    pub async fn save(&self, update: &MediaSettingsUpdate) -> Result<(), AppError> {
        let entries = update.entries(self.clock.now());
        if entries.is_empty() {
            return Ok(());
        }

        if let Err(e) = self.store.upsert(&entries).await {
            tracing::error!(error = %e, "Failed to save media settings");
            return Err(e.into());
        }

        self.invalidate().await;

        tracing::info!(
            keys = ?entries.iter().map(|e| e.key.as_str()).collect::<Vec<_>>(),
            "Media settings saved"
        );
        Ok(())
    }
}
