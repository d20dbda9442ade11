//! Certificate routes.

use axum::extract::{Path, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::certificate::{self, IssueCertificate};
use crate::state::AppState;

/// `POST /certificates/issue`
pub async fn issue(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<IssueCertificate>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let issued = certificate::issue(&state, &auth.identity, body).await?;
    Ok(Json(json!({ "success": true, "certificate": issued })))
}

/// `GET /certificates/{student_id}`
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(student_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let certificates = certificate::for_student(&state, &student_id).await?;
    Ok(Json(json!({ "success": true, "certificates": certificates })))
}
