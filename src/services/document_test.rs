use std::sync::Arc;

use async_trait::async_trait;

use super::*;
use crate::auth::Role;
use crate::storage::{BlobError, BlobStore, MemoryBlobStore};
use crate::state::test_helpers::{identity, test_app_state_with_blobs};

fn pdf(name: &str) -> UploadDocument {
    UploadDocument {
        file: Some(UploadFile {
            file_name: Some(name.into()),
            content_type: Some("application/pdf".into()),
            bytes: b"%PDF-1.7".to_vec(),
        }),
        title: Some("Lab Manual".into()),
        description: None,
        category: Some("notes".into()),
    }
}

#[test]
fn sanitize_strips_directories() {
    assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
    assert_eq!(sanitize_file_name("C:\\Users\\me\\report.docx"), "report.docx");
    assert_eq!(sanitize_file_name(""), "upload");
    assert_eq!(sanitize_file_name("dir/.."), "upload");
    assert_eq!(sanitize_file_name("notes.txt"), "notes.txt");
}

#[tokio::test]
async fn upload_stores_blob_and_metadata() {
    let blobs = Arc::new(MemoryBlobStore::new("docs"));
    let state = test_app_state_with_blobs(blobs.clone());
    let owner = identity("u1", Role::Teacher);

    let doc = upload(&state, &owner, pdf("manual.pdf")).await.unwrap();
    assert!(doc.id.starts_with("document:u1:"));
    assert!(doc.storage_path.starts_with("u1/") && doc.storage_path.ends_with("-manual.pdf"));
    assert_eq!(doc.file_size, 8);
    assert_eq!(doc.file_type, "application/pdf");
    assert!(doc.url.as_deref().unwrap().contains("expiresIn=31536000"));

    let blob = blobs.get(&doc.storage_path).await.unwrap();
    assert_eq!(blob.bytes, b"%PDF-1.7");
    assert_eq!(list(&state, &owner).await.unwrap(), vec![serde_json::to_value(&doc).unwrap()]);
}

#[tokio::test]
async fn missing_file_is_rejected() {
    let state = test_app_state_with_blobs(Arc::new(MemoryBlobStore::new("docs")));
    let req = UploadDocument { title: Some("x".into()), ..Default::default() };
    let err = upload(&state, &identity("u1", Role::Student), req).await.unwrap_err();
    assert!(matches!(err, ServiceError::Invalid(msg) if msg == "No file provided"));
}

#[tokio::test]
async fn delete_removes_blob_then_metadata() {
    let blobs = Arc::new(MemoryBlobStore::new("docs"));
    let state = test_app_state_with_blobs(blobs.clone());
    let owner = identity("u1", Role::Teacher);
    let doc = upload(&state, &owner, pdf("a.pdf")).await.unwrap();

    assert!(matches!(delete(&state, &identity("u2", Role::Admin), &doc.id).await, Err(ServiceError::NotFound)));
    assert!(blobs.get(&doc.storage_path).await.is_some());

    delete(&state, &owner, &doc.id).await.unwrap();
    assert!(blobs.get(&doc.storage_path).await.is_none());
    assert!(list(&state, &owner).await.unwrap().is_empty());
}

/// Accepts uploads, fails everything else.
struct FlakyBlobs;

#[async_trait]
impl BlobStore for FlakyBlobs {
    async fn ensure_bucket(&self, _size_limit: usize) -> Result<bool, BlobError> {
        Ok(false)
    }
    async fn put(&self, _path: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<(), BlobError> {
        Ok(())
    }
    async fn signed_url(&self, _path: &str, _expires_in: Duration) -> Result<String, BlobError> {
        Err(BlobError::Transport("timeout".into()))
    }
    async fn remove(&self, _paths: &[String]) -> Result<(), BlobError> {
        Err(BlobError::Response { status: 500, body: "boom".into() })
    }
}

#[tokio::test]
async fn blob_failures_after_upload_do_not_block_metadata() {
    let state = test_app_state_with_blobs(Arc::new(FlakyBlobs));
    let owner = identity("u1", Role::Student);

    let doc = upload(&state, &owner, pdf("a.pdf")).await.unwrap();
    assert!(doc.url.is_none());

    delete(&state, &owner, &doc.id).await.unwrap();
    assert!(list(&state, &owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn oversized_upload_fails_without_metadata() {
    let blobs = Arc::new(MemoryBlobStore::new("docs"));
    blobs.ensure_bucket(4).await.unwrap();
    let state = test_app_state_with_blobs(blobs);
    let owner = identity("u1", Role::Student);

    let err = upload(&state, &owner, pdf("big.pdf")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Blob(BlobError::TooLarge { .. })));
    assert!(list(&state, &owner).await.unwrap().is_empty());
}
