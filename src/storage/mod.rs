//! Blob storage for uploaded documents.
//!
//! DESIGN
//! ======
//! Document bytes live in an object store, their metadata in the KV store.
//! A store is bound to one bucket at construction. Upload, signed-URL
//! creation, and removal are independent calls: callers get no transaction
//! spanning blob and metadata.

pub mod memory;
pub mod supabase;

use std::time::Duration;

use async_trait::async_trait;

pub use memory::MemoryBlobStore;
pub use supabase::SupabaseStorage;

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("object exceeds bucket limit ({size} > {limit} bytes)")]
    TooLarge { size: usize, limit: usize },
    #[error("storage request failed: {0}")]
    Transport(String),
    #[error("storage responded {status}: {body}")]
    Response { status: u16, body: String },
}

#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Create the bucket (private, with `size_limit`) if it does not exist.
    /// Returns `true` when it was created by this call.
    async fn ensure_bucket(&self, size_limit: usize) -> Result<bool, BlobError>;

    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), BlobError>;

    /// A URL granting read access to `path` for `expires_in`.
    async fn signed_url(&self, path: &str, expires_in: Duration) -> Result<String, BlobError>;

    /// Remove objects. Missing paths are not an error.
    async fn remove(&self, paths: &[String]) -> Result<(), BlobError>;
}
