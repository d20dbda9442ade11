//! Analytics routes.

use axum::extract::{Path, State};
use axum::response::Json;
use serde_json::{Value, json};

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::analytics;
use crate::state::AppState;

/// `GET /analytics/student/{student_id}`
pub async fn student(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(student_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let summary = analytics::student(&state, &student_id).await?;
    Ok(Json(json!({ "success": true, "analytics": summary })))
}

/// `GET /analytics/class/{class_id}`
pub async fn class(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(class_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let summary = analytics::class(&state, &class_id).await?;
    Ok(Json(json!({ "success": true, "analytics": summary })))
}
