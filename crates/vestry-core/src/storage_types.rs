use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Fallback object-storage backend types
///
/// Defined in core because it is read from the process configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Hosted bucket storage reached over its REST API
    Supabase,
    /// Local filesystem, served by a static file host
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supabase" => Ok(StorageBackend::Supabase),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::Supabase => write!(f, "supabase"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Where key/value site settings are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsBackend {
    /// PostgREST endpoint of the hosted backend
    Rest,
    /// Direct Postgres connection
    Postgres,
}

impl FromStr for SettingsBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rest" => Ok(SettingsBackend::Rest),
            "postgres" | "postgresql" => Ok(SettingsBackend::Postgres),
            _ => Err(anyhow::anyhow!("Invalid settings backend: {}", s)),
        }
    }
}

impl Display for SettingsBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SettingsBackend::Rest => write!(f, "rest"),
            SettingsBackend::Postgres => write!(f, "postgres"),
        }
    }
}
