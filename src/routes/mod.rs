//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every endpoint lives under the configured route prefix (by default the
//! path existing clients already call). CORS is open to any origin, request
//! tracing wraps the whole tree, and the body limit is raised to the
//! document bucket limit so uploads reach the multipart extractor.

pub mod analytics;
pub mod attendance;
pub mod auth;
pub mod certificates;
pub mod chat;
pub mod documents;
pub mod error;
pub mod exams;
pub mod feedback;
pub mod marks;
pub mod notifications;
pub mod todos;

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::Json;
use axum::routing::{delete, get, post, put};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::DOCUMENT_SIZE_LIMIT;
use crate::state::AppState;

const SERVICE_NAME: &str = "ResoVista Backend";
const CORS_MAX_AGE: Duration = Duration::from_secs(600);
/// Headroom for multipart boundaries and the text parts next to the file.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .expose_headers([CONTENT_LENGTH])
        .max_age(CORS_MAX_AGE)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
        .route("/auth/signout", post(auth::signout))
        .route("/auth/profile", get(auth::get_profile).put(auth::update_profile))
        .route("/attendance/mark", post(attendance::mark))
        .route("/attendance/{class_id}", get(attendance::list))
        .route("/exams", get(exams::list))
        .route("/exams/create", post(exams::create))
        .route("/exams/{exam_id}/submit", post(exams::submit))
        .route("/exams/{exam_id}/results/{student_id}", get(exams::results))
        .route("/exams/{exam_id}/start", post(exams::start))
        .route("/exams/{exam_id}/focus-lost", post(exams::focus_lost))
        .route("/marks/add", post(marks::add))
        .route("/marks/{student_id}", get(marks::list))
        .route("/todos", get(todos::list))
        .route("/todos/create", post(todos::create))
        .route("/todos/{todo_id}", put(todos::update).delete(todos::delete))
        .route("/notifications", get(notifications::list))
        .route("/notifications/send", post(notifications::send))
        .route("/notifications/{notification_id}/read", put(notifications::mark_read))
        .route("/feedback", get(feedback::list))
        .route("/feedback/submit", post(feedback::submit))
        .route("/certificates/issue", post(certificates::issue))
        .route("/certificates/{student_id}", get(certificates::list))
        .route("/chat/send", post(chat::send))
        .route("/chat/{other_user_id}", get(chat::conversation))
        .route("/documents", get(documents::list))
        .route("/documents/upload", post(documents::upload))
        .route("/documents/{doc_id}", delete(documents::delete))
        .route("/analytics/student/{student_id}", get(analytics::student))
        .route("/analytics/class/{class_id}", get(analytics::class))
}

/// The complete application router.
pub fn app(state: AppState) -> Router {
    let prefix = state.config.route_prefix.clone();
    let api = api_routes().with_state(state);
    let router = if prefix.is_empty() { api } else { Router::new().nest(&prefix, api) };

    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(DOCUMENT_SIZE_LIMIT + MULTIPART_OVERHEAD))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": SERVICE_NAME }))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
