//! Attendance routes.

use axum::extract::{Path, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::attendance::{self, MarkAttendance};
use crate::state::AppState;

/// `POST /attendance/mark`
pub async fn mark(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<MarkAttendance>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let record = attendance::mark(&state, &auth.identity, body).await?;
    Ok(Json(json!({ "success": true, "record": record })))
}

/// `GET /attendance/{class_id}`
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(class_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let records = attendance::for_class(&state, &class_id).await?;
    Ok(Json(json!({ "success": true, "records": records })))
}
