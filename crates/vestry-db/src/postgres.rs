//! Direct PostgreSQL settings store

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};
use std::collections::HashMap;
use std::time::Duration;
use vestry_core::SettingEntry;

use crate::store::{SettingsError, SettingsResult, SettingsStore};

impl From<sqlx::Error> for SettingsError {
    fn from(err: sqlx::Error) -> Self {
        SettingsError::Database(err.to_string())
    }
}

/// Settings store over a `key text primary key, value text, updated_at timestamptz` table.
#[derive(Clone)]
pub struct PgSettingsStore {
    pool: PgPool,
    table: String,
}

impl PgSettingsStore {
    pub fn new(pool: PgPool, table: &str) -> SettingsResult<Self> {
        if !is_valid_identifier(table) {
            return Err(SettingsError::ConfigError(format!(
                "Invalid settings table name: {}",
                table
            )));
        }
        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    pub async fn connect(database_url: &str, table: &str) -> SettingsResult<Self> {
        tracing::info!("Connecting to settings database...");
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await?;
        Self::new(pool, table)
    }
}

/// Table names are interpolated into SQL, so only plain identifiers are allowed.
fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    #[tracing::instrument(skip(self), fields(db.table = %self.table, db.operation = "select"))]
    async fn get(&self, keys: &[&str]) -> SettingsResult<HashMap<String, String>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let sql = format!(
            "SELECT key, value FROM {} WHERE key = ANY($1) AND value IS NOT NULL",
            self.table
        );
        let rows = sqlx::query_as::<Postgres, (String, String)>(&sql)
            .bind(&keys)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().collect())
    }

    #[tracing::instrument(skip(self, entries), fields(db.table = %self.table, db.operation = "upsert", count = entries.len()))]
    async fn upsert(&self, entries: &[SettingEntry]) -> SettingsResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let sql = format!(
            r#"
            INSERT INTO {} (key, value, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
            "#,
            self.table
        );

        let mut tx = self.pool.begin().await?;
        for entry in entries {
            sqlx::query::<Postgres>(&sql)
                .bind(&entry.key)
                .bind(&entry.value)
                .bind(entry.updated_at)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_valid_identifier("site_settings"));
        assert!(is_valid_identifier("_settings2"));
        assert!(!is_valid_identifier("2settings"));
        assert!(!is_valid_identifier("settings; drop table x"));
        assert!(!is_valid_identifier("public.settings"));
        assert!(!is_valid_identifier(""));
    }
}
