//! Chat routes.

use axum::extract::{Path, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::chat::{self, SendMessage};
use crate::state::AppState;

/// `POST /chat/send`
pub async fn send(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<SendMessage>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let message = chat::send(&state, &auth.identity, body).await?;
    Ok(Json(json!({ "success": true, "message": message })))
}

/// `GET /chat/{other_user_id}`
pub async fn conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(other_user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let messages = chat::conversation(&state, &auth.identity, &other_user_id).await?;
    Ok(Json(json!({ "success": true, "messages": messages })))
}
