//! Removing images from content entities.
//!
//! Remote objects are never deleted here. Clearing a reference orphans the
//! CDN asset or bucket object; that is accepted and permanent.

use vestry_core::MediaReference;

#[derive(Debug, Clone, Copy, Default)]
pub struct MediaLifecycle;

impl MediaLifecycle {
    pub fn new() -> Self {
        Self
    }

    /// Record that the asset behind `reference` is no longer used.
    ///
    /// Logs the intent only; no request is sent to the CDN or the bucket.
    pub fn release(&self, reference: &MediaReference) {
        if let Some(public_id) = reference.public_id() {
            tracing::info!(
                public_id = %public_id,
                "CDN asset released; remote deletion is not performed"
            );
        } else if let Some(url) = reference.url() {
            tracing::debug!(url = %url, "Image reference released");
        }
    }

    /// Release and then clear `reference`, leaving an empty slot.
    pub fn remove(&self, reference: &mut MediaReference) {
        self.release(reference);
        reference.clear();
    }
}
