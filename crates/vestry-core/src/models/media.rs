//! Media reference and upload input models.

use serde::{Deserialize, Serialize};

/// Pointer from a content entity (photo, slide, popup, album cover, post, logo)
/// to an uploaded image.
///
/// `public_id` is set only when the CDN accepted the upload; `url` is set when a
/// backend produced a directly addressable URL. A reference with neither field
/// is an empty slot (no image).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl MediaReference {
    /// Reference produced by a CDN upload.
    pub fn cdn(public_id: impl Into<String>, secure_url: impl Into<String>) -> Self {
        Self {
            public_id: non_empty(public_id.into()),
            url: non_empty(secure_url.into()),
        }
    }

    /// Reference to a directly addressable URL (fallback bucket or external).
    pub fn direct(url: impl Into<String>) -> Self {
        Self {
            public_id: None,
            url: non_empty(url.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.public_id.is_none() && self.url.is_none()
    }

    /// Empty both fields. The remote object is left where it is.
    pub fn clear(&mut self) {
        self.public_id = None;
        self.url = None;
    }

    pub fn public_id(&self) -> Option<&str> {
        self.public_id.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// A file selected by an editor, already read into memory.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Original file name as selected (used for its extension)
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    /// Optional readable prefix for generated object names (e.g. "popup")
    pub name_prefix: Option<String>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
            name_prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Lowercased extension of the original file name, if any.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name.rsplit(['/', '\\']).next().unwrap_or(&self.file_name);
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_do_not_count_as_references() {
        let reference = MediaReference::cdn("", "  ");
        assert!(reference.is_empty());

        let reference = MediaReference::direct("https://example.org/a.jpg");
        assert!(!reference.is_empty());
        assert_eq!(reference.public_id(), None);
    }

    #[test]
    fn clear_empties_both_fields() {
        let mut reference = MediaReference::cdn("albums/abc", "https://res.example.com/abc.jpg");
        reference.clear();
        assert!(reference.is_empty());
    }

    #[test]
    fn extension_is_lowercased_and_optional() {
        let file = FileUpload::new("Foto.JPG", "image/jpeg", vec![1, 2, 3]);
        assert_eq!(file.extension().as_deref(), Some("jpg"));
        assert_eq!(file.size(), 3);

        assert_eq!(FileUpload::new("README", "text/plain", vec![]).extension(), None);
        assert_eq!(FileUpload::new(".hidden", "text/plain", vec![]).extension(), None);
        assert_eq!(
            FileUpload::new("dir.v2/photo", "image/png", vec![]).extension(),
            None
        );
    }

    #[test]
    fn deserializes_rows_with_missing_fields() {
        let reference: MediaReference =
            serde_json::from_str(r#"{"url":"https://example.org/x.png"}"#).unwrap();
        assert_eq!(reference.url(), Some("https://example.org/x.png"));
        assert_eq!(reference.public_id(), None);
    }
}
