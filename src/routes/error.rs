//! HTTP error envelope.
//!
//! Every failure leaves the API as `{"error": "<message>"}`. Internal errors
//! are logged here and reach the client as a generic message.

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::auth::AuthError;
use crate::services::ServiceError;

pub const UNAUTHORIZED: &str = "Unauthorized";
pub const NOT_FOUND: &str = "Not found or unauthorized";
const INTERNAL: &str = "Internal server error";
const UPLOAD_FAILED: &str = "Failed to upload file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, UNAUTHORIZED)
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Invalid(message) => Self::bad_request(message),
            ServiceError::NotFound => Self::new(StatusCode::NOT_FOUND, NOT_FOUND),
            ServiceError::Forbidden(message) => Self::new(StatusCode::FORBIDDEN, message),
            ServiceError::Auth(AuthError::Rejected(message)) => Self::bad_request(message),
            ServiceError::Auth(AuthError::InvalidCredentials) => {
                Self::new(StatusCode::UNAUTHORIZED, "Invalid login credentials")
            }
            ServiceError::Auth(AuthError::Unsupported) => {
                Self::bad_request("Password sign-in is not supported by this server")
            }
            ServiceError::Blob(e) => {
                tracing::error!(error = %e, "blob storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, UPLOAD_FAILED)
            }
            err @ (ServiceError::Store(_) | ServiceError::Auth(_)) => {
                tracing::error!(error = %err, "request failed");
                Self::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        if status.is_server_error() {
            tracing::error!(error = %err, "multipart read failed");
        }
        Self::new(status, err.body_text())
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
