//! Exam, submission, and proctoring routes.

use axum::extract::{Path, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde_json::{Map, Value, json};

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::exam::{self, SubmitExam};
use crate::services::proctor::{self, FocusLost};
use crate::state::AppState;

/// `POST /exams/create`
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<Map<String, Value>>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let created = exam::create(&state, &auth.identity, body).await?;
    Ok(Json(json!({ "success": true, "exam": created })))
}

/// `GET /exams`
pub async fn list(State(state): State<AppState>, _auth: AuthUser) -> Result<Json<Value>, ApiError> {
    let exams = exam::list(&state).await?;
    Ok(Json(json!({ "success": true, "exams": exams })))
}

/// `POST /exams/{exam_id}/submit`
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(exam_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<SubmitExam>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let submission = exam::submit(&state, &auth.identity, &exam_id, body).await?;
    Ok(Json(json!({ "success": true, "submission": submission })))
}

/// `GET /exams/{exam_id}/results/{student_id}`: `submission` is null when absent.
pub async fn results(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((exam_id, student_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let submission = exam::result(&state, &exam_id, &student_id).await?;
    Ok(Json(json!({ "success": true, "submission": submission })))
}

/// `POST /exams/{exam_id}/start`: (re)start tab-switch monitoring.
pub async fn start(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(exam_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let session = proctor::start(&state, &auth.identity, &exam_id).await?;
    Ok(Json(json!({ "success": true, "session": session })))
}

/// `POST /exams/{exam_id}/focus-lost`: count one tab switch.
pub async fn focus_lost(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(exam_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<FocusLost>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let outcome = proctor::focus_lost(&state, &auth.identity, &exam_id, body).await?;
    let mut response = json!({ "success": true, "verdict": outcome.verdict, "session": outcome.session });
    if let Some(submission) = outcome.submission {
        response["submission"] = json!(submission);
    }
    Ok(Json(response))
}
