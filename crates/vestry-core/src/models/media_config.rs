//! Strongly-typed media configuration parsed from key/value site settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{
    SETTING_CLOUDINARY_API_KEY, SETTING_CLOUDINARY_API_SECRET, SETTING_CLOUDINARY_CLOUD_NAME,
    SETTING_CLOUDINARY_ENABLED, SETTING_CLOUDINARY_UPLOAD_PRESET,
    SETTING_SUPABASE_STORAGE_ENABLED,
};

/// One key/value row in the settings store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Which backends are live and how to reach the CDN.
///
/// Downstream code never sees the raw string flags; they are parsed once in
/// [`MediaConfiguration::from_settings`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConfiguration {
    pub cdn_enabled: bool,
    pub storage_enabled: bool,
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub upload_preset: Option<String>,
}

impl Default for MediaConfiguration {
    /// CDN off, fallback storage on.
    fn default() -> Self {
        Self {
            cdn_enabled: false,
            storage_enabled: true,
            cloud_name: None,
            api_key: None,
            api_secret: None,
            upload_preset: None,
        }
    }
}

impl MediaConfiguration {
    /// Build from raw settings rows. Missing keys take their defaults.
    pub fn from_settings(values: &HashMap<String, String>) -> Self {
        let text = |key: &str| {
            values
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        Self {
            cdn_enabled: parse_flag(values.get(SETTING_CLOUDINARY_ENABLED), false),
            storage_enabled: parse_flag(values.get(SETTING_SUPABASE_STORAGE_ENABLED), true),
            cloud_name: text(SETTING_CLOUDINARY_CLOUD_NAME),
            api_key: text(SETTING_CLOUDINARY_API_KEY),
            api_secret: text(SETTING_CLOUDINARY_API_SECRET),
            upload_preset: text(SETTING_CLOUDINARY_UPLOAD_PRESET),
        }
    }

    /// Cloud name to build delivery URLs with, when the CDN is enabled and configured.
    pub fn cdn_cloud_name(&self) -> Option<&str> {
        if self.cdn_enabled {
            self.cloud_name.as_deref()
        } else {
            None
        }
    }

    /// Copy safe to print: credentials are masked.
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| "********".to_string()),
            api_secret: self.api_secret.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}

/// Parse a stored boolean flag. Unrecognised values fall back to `default`.
pub fn parse_flag(value: Option<&String>, default: bool) -> bool {
    match value.map(|v| v.trim().to_lowercase()) {
        Some(v) => match v.as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}

/// Administrator edits to the media settings. `None` leaves a key untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSettingsUpdate {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub upload_preset: Option<String>,
    pub cdn_enabled: Option<bool>,
    pub storage_enabled: Option<bool>,
}

impl MediaSettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.cloud_name.is_none()
            && self.api_key.is_none()
            && self.api_secret.is_none()
            && self.upload_preset.is_none()
            && self.cdn_enabled.is_none()
            && self.storage_enabled.is_none()
    }

    /// Rows to upsert, all stamped with `updated_at`.
    pub fn entries(&self, updated_at: DateTime<Utc>) -> Vec<SettingEntry> {
        let pairs: [(&str, Option<String>); 6] = [
            (SETTING_CLOUDINARY_CLOUD_NAME, self.cloud_name.clone()),
            (SETTING_CLOUDINARY_API_KEY, self.api_key.clone()),
            (SETTING_CLOUDINARY_API_SECRET, self.api_secret.clone()),
            (SETTING_CLOUDINARY_UPLOAD_PRESET, self.upload_preset.clone()),
            (
                SETTING_CLOUDINARY_ENABLED,
                self.cdn_enabled.map(|b| b.to_string()),
            ),
            (
                SETTING_SUPABASE_STORAGE_ENABLED,
                self.storage_enabled.map(|b| b.to_string()),
            ),
        ];

        pairs
            .into_iter()
            .filter_map(|(key, value)| {
                value.map(|value| SettingEntry {
                    key: key.to_string(),
                    value: value.trim().to_string(),
                    updated_at,
                })
            })
            .collect()
    }
}
