//! In-process settings store, used by tests and offline tooling.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vestry_core::SettingEntry;

use crate::store::{SettingsError, SettingsResult, SettingsStore};

#[derive(Clone, Default)]
pub struct InMemorySettingsStore {
    rows: Arc<Mutex<HashMap<String, String>>>,
    get_calls: Arc<AtomicUsize>,
    upsert_calls: Arc<AtomicUsize>,
    fail_reads: Arc<AtomicBool>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing rows.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        if let Ok(mut rows) = store.rows.lock() {
            rows.extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        }
        store
    }

    /// Number of `get` calls made so far, including failed ones.
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    /// Make subsequent reads fail, simulating an unreachable backend.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.rows.lock().ok().and_then(|rows| rows.get(key).cloned())
    }

    /// Write a row directly, bypassing the call counters.
    pub fn set(&self, key: &str, value: &str) {
        if let Ok(mut rows) = self.rows.lock() {
            rows.insert(key.to_string(), value.to_string());
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self, keys: &[&str]) -> SettingsResult<HashMap<String, String>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SettingsError::Request("settings backend unreachable".to_string()));
        }

        let rows = self
            .rows
            .lock()
            .map_err(|e| SettingsError::Database(e.to_string()))?;
        Ok(keys
            .iter()
            .filter_map(|key| rows.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect())
    }

    async fn upsert(&self, entries: &[SettingEntry]) -> SettingsResult<()> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self
            .rows
            .lock()
            .map_err(|e| SettingsError::Database(e.to_string()))?;
        for entry in entries {
            rows.insert(entry.key.clone(), entry.value.clone());
        }
        Ok(())
    }
}
