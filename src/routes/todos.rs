//! To-do routes. All scoped to the caller.

use axum::extract::{Path, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde_json::{Map, Value, json};

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::todo;
use crate::state::AppState;

/// `POST /todos/create`
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<Map<String, Value>>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let created = todo::create(&state, &auth.identity, body).await?;
    Ok(Json(json!({ "success": true, "todo": created })))
}

/// `GET /todos`
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Value>, ApiError> {
    let todos = todo::list(&state, &auth.identity).await?;
    Ok(Json(json!({ "success": true, "todos": todos })))
}

/// `PUT /todos/{todo_id}`
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(todo_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<Map<String, Value>>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let updated = todo::update(&state, &auth.identity, &todo_id, body).await?;
    Ok(Json(json!({ "success": true, "todo": updated })))
}

/// `DELETE /todos/{todo_id}`
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(todo_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    todo::delete(&state, &auth.identity, &todo_id).await?;
    Ok(Json(json!({ "success": true })))
}
