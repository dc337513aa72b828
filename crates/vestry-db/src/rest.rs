//! Settings rows over the hosted backend's PostgREST endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use vestry_core::SettingEntry;

use crate::store::{SettingsError, SettingsResult, SettingsStore};

#[derive(Debug, Deserialize)]
struct SettingRow {
    key: String,
    value: Option<String>,
}

/// Settings store backed by `{base_url}/rest/v1/{table}`.
#[derive(Clone, Debug)]
pub struct RestSettingsStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RestSettingsStore {
    /// # Arguments
    /// * `base_url` - Project URL (e.g., "https://parish.supabase.co")
    /// * `api_key` - Service or anon key, sent as both `apikey` and bearer token
    /// * `table` - Settings table name (e.g., "site_settings")
    pub fn new(client: Client, base_url: &str, api_key: String, table: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            table,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", self.api_key.as_str())
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn check_status(response: reqwest::Response) -> SettingsResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(SettingsError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl SettingsStore for RestSettingsStore {
    async fn get(&self, keys: &[&str]) -> SettingsResult<HashMap<String, String>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let start = std::time::Instant::now();
        let filter = format!("in.({})", keys.join(","));
        let request = self
            .client
            .get(self.table_url())
            .query(&[("select", "key,value"), ("key", filter.as_str())]);

        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| SettingsError::Request(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let rows: Vec<SettingRow> = response
            .json()
            .await
            .map_err(|e| SettingsError::Decode(e.to_string()))?;

        tracing::debug!(
            table = %self.table,
            requested = keys.len(),
            returned = rows.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fetched settings"
        );

        Ok(rows
            .into_iter()
            .filter_map(|row| row.value.map(|value| (row.key, value)))
            .collect())
    }

    async fn upsert(&self, entries: &[SettingEntry]) -> SettingsResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let request = self
            .client
            .post(self.table_url())
            .query(&[("on_conflict", "key")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(entries);

        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| SettingsError::Request(e.to_string()))?;
        Self::check_status(response).await?;

        tracing::info!(
            table = %self.table,
            keys = ?entries.iter().map(|e| e.key.as_str()).collect::<Vec<_>>(),
            "Saved settings"
        );

        Ok(())
    }
}
