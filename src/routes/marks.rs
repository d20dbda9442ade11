//! Marks routes.

use axum::extract::{Path, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::marks::{self, AddMarks};
use crate::state::AppState;

/// `POST /marks/add`
pub async fn add(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<AddMarks>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let record = marks::add(&state, &auth.identity, body).await?;
    Ok(Json(json!({ "success": true, "record": record })))
}

/// `GET /marks/{student_id}`
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(student_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let marks = marks::for_student(&state, &student_id).await?;
    Ok(Json(json!({ "success": true, "marks": marks })))
}
