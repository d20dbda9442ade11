//! In-memory blob store for local runs and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BlobError, BlobStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub struct MemoryBlobStore {
    bucket: String,
    objects: RwLock<HashMap<String, StoredBlob>>,
    /// Zero until the bucket exists.
    size_limit: AtomicUsize,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self { bucket: bucket.into(), objects: RwLock::new(HashMap::new()), size_limit: AtomicUsize::new(0) }
    }

    #[cfg(test)]
    pub async fn get(&self, path: &str) -> Option<StoredBlob> {
        self.objects.read().await.get(path).cloned()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn ensure_bucket(&self, size_limit: usize) -> Result<bool, BlobError> {
        Ok(self
            .size_limit
            .compare_exchange(0, size_limit, Ordering::AcqRel, Ordering::Acquire)
            .is_ok())
    }

    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), BlobError> {
        let limit = self.size_limit.load(Ordering::Acquire);
        if limit > 0 && bytes.len() > limit {
            return Err(BlobError::TooLarge { size: bytes.len(), limit });
        }
        self.objects
            .write()
            .await
            .insert(path.to_owned(), StoredBlob { bytes, content_type: content_type.to_owned() });
        Ok(())
    }

    async fn signed_url(&self, path: &str, expires_in: Duration) -> Result<String, BlobError> {
        if !self.objects.read().await.contains_key(path) {
            return Err(BlobError::NotFound(path.to_owned()));
        }
        Ok(format!("memory://{}/{path}?expiresIn={}", self.bucket, expires_in.as_secs()))
    }

    async fn remove(&self, paths: &[String]) -> Result<(), BlobError> {
        let mut objects = self.objects.write().await;
        for path in paths {
            objects.remove(path);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
