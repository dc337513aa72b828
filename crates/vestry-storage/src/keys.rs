//! Shared object naming for storage backends.
//!
//! Object names are `{prefix}-{unix_millis}-{suffix}.{ext}`, where the prefix is
//! optional and the suffix is six random lowercase alphanumerics. Paths are
//! `{folder}/{object_name}`.

use chrono::{DateTime, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;

use crate::{StorageError, StorageResult};

const SUFFIX_LEN: usize = 6;

/// Generate a collision-resistant object name.
///
/// `extension` is appended as-is when present; `prefix` is reduced to
/// lowercase alphanumerics, `-` and `_`, and dropped if nothing remains.
pub fn generate_object_name(
    extension: Option<&str>,
    prefix: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();

    let mut name = String::new();
    if let Some(prefix) = prefix.map(sanitize_prefix).filter(|p| !p.is_empty()) {
        name.push_str(&prefix);
        name.push('-');
    }
    name.push_str(&format!("{}-{}", now.timestamp_millis(), suffix));
    if let Some(ext) = extension.filter(|e| !e.is_empty()) {
        name.push('.');
        name.push_str(ext);
    }
    name
}

fn sanitize_prefix(prefix: &str) -> String {
    prefix
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Join a folder label and object name into a storage path.
///
/// An empty folder stores the object at the bucket root.
pub fn object_path(folder: &str, object_name: &str) -> StorageResult<String> {
    let folder = folder.trim().trim_matches('/');
    let path = if folder.is_empty() {
        object_name.to_string()
    } else {
        format!("{}/{}", folder, object_name)
    };
    validate_path(&path)?;
    Ok(path)
}

/// Reject paths that could escape the bucket or storage directory.
pub fn validate_path(path: &str) -> StorageResult<()> {
    if path.is_empty() {
        return Err(StorageError::InvalidKey("Object path is empty".to_string()));
    }
    if path.starts_with('/') || path.contains('\\') || path.split('/').any(|s| s == ".." || s.is_empty()) {
        return Err(StorageError::InvalidKey(format!(
            "Object path contains invalid segments: {}",
            path
        )));
    }
    Ok(())
}
