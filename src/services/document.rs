//! Uploaded documents: bytes in the blob store, metadata in the KV store.
//!
//! TRADE-OFFS
//! ==========
//! Upload writes the blob first and the metadata second; delete removes the
//! blob first and the metadata second. Neither pair is atomic and nothing
//! compensates a failed second step. A blob whose metadata write failed is
//! orphaned, and a metadata record whose blob removal failed is still
//! deleted (the failure is logged).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ServiceError, present};
use crate::auth::Identity;
use crate::clock;
use crate::kv::{KvStoreExt, keys};
use crate::state::AppState;

/// Signed download links are valid for one year.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(31_536_000);

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
const DEFAULT_FILE_NAME: &str = "upload";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub storage_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub uploaded_at: String,
}

/// A file pulled out of a multipart form.
#[derive(Debug, Default)]
pub struct UploadFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct UploadDocument {
    pub file: Option<UploadFile>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Last path component of a client-supplied file name, so uploads cannot
/// escape the caller's folder.
#[must_use]
pub fn sanitize_file_name(raw: &str) -> String {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if name.is_empty() || name == "." || name == ".." {
        DEFAULT_FILE_NAME.to_owned()
    } else {
        name.to_owned()
    }
}

/// # Errors
///
/// `Invalid("No file provided")` without a file part, `Blob` when the
/// upload itself fails.
pub async fn upload(state: &AppState, caller: &Identity, req: UploadDocument) -> Result<Document, ServiceError> {
    let Some(file) = req.file else {
        return Err(ServiceError::Invalid("No file provided".into()));
    };

    let millis = state.ids.next_millis();
    let file_name = sanitize_file_name(file.file_name.as_deref().unwrap_or_default());
    let file_type = present(file.content_type).unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned());
    let storage_path = format!("{}/{millis}-{file_name}", caller.id);
    let file_size = file.bytes.len() as u64;

    state.blobs.put(&storage_path, file.bytes, &file_type).await.map_err(|e| {
        tracing::error!(error = %e, path = %storage_path, "document upload failed");
        ServiceError::Blob(e)
    })?;

    let url = match state.blobs.signed_url(&storage_path, SIGNED_URL_TTL).await {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(error = %e, path = %storage_path, "could not sign document url");
            None
        }
    };

    let key = keys::document(&caller.id, millis);
    let document = Document {
        id: key.clone(),
        user_id: caller.id.clone(),
        title: present(req.title),
        description: present(req.description),
        category: present(req.category),
        file_name,
        file_size,
        file_type,
        storage_path,
        url,
        uploaded_at: clock::now_iso(),
    };
    state.kv.set_json(&key, &document).await?;
    tracing::info!(doc_id = %document.id, size = document.file_size, "document stored");
    Ok(document)
}

/// # Errors
///
/// `Store` on KV failure.
pub async fn list(state: &AppState, caller: &Identity) -> Result<Vec<Value>, ServiceError> {
    Ok(state.kv.get_by_prefix(&keys::document_user_prefix(&caller.id)).await?)
}

/// # Errors
///
/// `NotFound` when the document is missing or belongs to someone else.
pub async fn delete(state: &AppState, caller: &Identity, doc_id: &str) -> Result<(), ServiceError> {
    if !doc_id.starts_with(&keys::document_user_prefix(&caller.id)) {
        return Err(ServiceError::NotFound);
    }
    let document = state
        .kv
        .get(doc_id)
        .await?
        .filter(|d| d.get("userId").and_then(Value::as_str) == Some(caller.id.as_str()))
        .ok_or(ServiceError::NotFound)?;

    match document.get("storagePath").and_then(Value::as_str) {
        Some(path) => {
            if let Err(e) = state.blobs.remove(&[path.to_owned()]).await {
                tracing::error!(error = %e, %path, "failed to remove document blob");
            }
        }
        None => tracing::warn!(%doc_id, "document has no storage path"),
    }
    state.kv.del(doc_id).await?;
    Ok(())
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
