//! Document routes. Upload is multipart with `file`, `title`,
//! `description`, and `category` parts.

use axum::extract::multipart::Multipart;
use axum::extract::{Path, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::document::{self, UploadDocument, UploadFile};
use crate::state::AppState;

/// Collect the known form parts. Unknown parts are skipped; an empty file
/// input (no name, no bytes) counts as no file.
pub(crate) async fn read_upload(multipart: &mut Multipart) -> Result<UploadDocument, ApiError> {
    let mut upload = UploadDocument::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await?.to_vec();
                if file_name.as_deref().unwrap_or_default().is_empty() && bytes.is_empty() {
                    continue;
                }
                upload.file = Some(UploadFile { file_name, content_type, bytes });
            }
            "title" => upload.title = Some(field.text().await?),
            "description" => upload.description = Some(field.text().await?),
            "category" => upload.category = Some(field.text().await?),
            _ => {}
        }
    }
    Ok(upload)
}

/// `POST /documents/upload`
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(mut multipart, _): WithRejection<Multipart, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let form = read_upload(&mut multipart).await?;
    let stored = document::upload(&state, &auth.identity, form).await?;
    Ok(Json(json!({ "success": true, "document": stored })))
}

/// `GET /documents`: the caller's documents.
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Value>, ApiError> {
    let documents = document::list(&state, &auth.identity).await?;
    Ok(Json(json!({ "success": true, "documents": documents })))
}

/// `DELETE /documents/{doc_id}`
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(doc_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    document::delete(&state, &auth.identity, &doc_id).await?;
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
#[path = "documents_test.rs"]
mod tests;
