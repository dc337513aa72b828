//! Bucket double that records every write.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use vestry_storage::{ObjectStorage, StorageBackend, StorageError, StorageResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub path: String,
    pub content_type: String,
    pub size: usize,
}

pub struct RecordingStorage {
    prefix: String,
    writes: Mutex<Vec<StoredObject>>,
    fail_uploads: AtomicBool,
}

impl RecordingStorage {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            writes: Mutex::new(Vec::new()),
            fail_uploads: AtomicBool::new(false),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn writes(&self) -> Vec<StoredObject> {
        self.writes.lock().unwrap().clone()
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn upload(&self, path: &str, content_type: &str, data: Vec<u8>) -> StorageResult<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "Storage API returned 503 Service Unavailable".to_string(),
            ));
        }
        self.writes.lock().unwrap().push(StoredObject {
            path: path.to_string(),
            content_type: content_type.to_string(),
            size: data.len(),
        });
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path)
    }

    fn public_prefix(&self) -> String {
        self.prefix.clone()
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Supabase
    }
}
