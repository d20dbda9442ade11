//! Feedback routes.

use axum::extract::State;
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde_json::{Map, Value, json};

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::feedback;
use crate::state::AppState;

/// `POST /feedback/submit`
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<Map<String, Value>>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let stored = feedback::submit(&state, &auth.identity, body).await?;
    Ok(Json(json!({ "success": true, "feedback": stored })))
}

/// `GET /feedback`: admins only.
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Value>, ApiError> {
    let all = feedback::list(&state, &auth.identity).await?;
    Ok(Json(json!({ "success": true, "feedback": all })))
}
