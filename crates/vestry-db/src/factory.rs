#[cfg(feature = "postgres")]
use crate::PgSettingsStore;
use crate::{RestSettingsStore, SettingsError, SettingsResult, SettingsStore};
use std::sync::Arc;
use vestry_core::{Config, SettingsBackend};

/// Create a settings store based on configuration
pub async fn create_settings_store(
    config: &Config,
    client: reqwest::Client,
) -> SettingsResult<Arc<dyn SettingsStore>> {
    match config.settings_backend {
        SettingsBackend::Rest => {
            let url = config.supabase_url.as_deref().ok_or_else(|| {
                SettingsError::ConfigError("SUPABASE_URL not configured".to_string())
            })?;
            let key = config.supabase_key.clone().ok_or_else(|| {
                SettingsError::ConfigError("SUPABASE_KEY not configured".to_string())
            })?;

            let store = RestSettingsStore::new(client, url, key, config.settings_table.clone());
            Ok(Arc::new(store))
        }

        #[cfg(feature = "postgres")]
        SettingsBackend::Postgres => {
            let database_url = config.database_url.as_deref().ok_or_else(|| {
                SettingsError::ConfigError("DATABASE_URL not configured".to_string())
            })?;

            let store = PgSettingsStore::connect(database_url, &config.settings_table).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "postgres"))]
        SettingsBackend::Postgres => Err(SettingsError::ConfigError(
            "Postgres settings backend not available (postgres feature not enabled)".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn rest_backend_from_config() {
        let vars: HashMap<&str, &str> = [
            ("SUPABASE_URL", "https://parish.supabase.co"),
            ("SUPABASE_KEY", "service-key"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert!(create_settings_store(&config, reqwest::Client::new())
            .await
            .is_ok());
    }
}
