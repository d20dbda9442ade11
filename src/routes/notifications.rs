//! Notification routes.

use axum::extract::{Path, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::notification::{self, SendNotification};
use crate::state::AppState;

/// `POST /notifications/send`
pub async fn send(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<SendNotification>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let sent = notification::send(&state, &auth.identity.id, body).await?;
    Ok(Json(json!({ "success": true, "notification": sent })))
}

/// `GET /notifications`: the caller's inbox.
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Value>, ApiError> {
    let notifications = notification::list_for(&state, &auth.identity.id).await?;
    Ok(Json(json!({ "success": true, "notifications": notifications })))
}

/// `PUT /notifications/{notification_id}/read`
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let read = notification::mark_read(&state, &auth.identity, &notification_id).await?;
    Ok(Json(json!({ "success": true, "notification": read })))
}
