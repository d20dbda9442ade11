//! Auth routes: signup, password sign-in, sign-out, and the caller's profile.

use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::request::Parts;
use axum::response::Json;
use axum_extra::TypedHeader;
use axum_extra::extract::WithRejection;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use serde_json::{Map, Value, json};

use super::error::ApiError;
use crate::auth::Identity;
use crate::services::profile::{self, SigninRequest, SignupRequest};
use crate::state::AppState;

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Caller resolved from the `Authorization: Bearer` header.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub identity: Identity,
    pub token: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::unauthorized())?;
        let token = bearer.token().trim();
        if token.is_empty() {
            return Err(ApiError::unauthorized());
        }

        let app_state = AppState::from_ref(state);
        let identity = app_state
            .auth
            .verify(token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "token verification failed");
                ApiError::internal()
            })?
            .ok_or_else(ApiError::unauthorized)?;

        Ok(Self { identity, token: token.to_owned() })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /auth/signup`: create an account and its profile.
pub async fn signup(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<SignupRequest>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let user = profile::signup(&state, body).await?;
    Ok(Json(json!({
        "success": true,
        "user": { "id": user.id, "email": user.email, "name": user.name, "role": user.role },
    })))
}

/// `POST /auth/signin`: exchange credentials for a bearer token.
pub async fn signin(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<SigninRequest>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let session = profile::signin(&state, body).await?;
    Ok(Json(json!({ "success": true, "session": session })))
}

/// `POST /auth/signout`: revoke the presented token.
pub async fn signout(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Value>, ApiError> {
    state.auth.sign_out(&auth.token).await.map_err(|e| {
        tracing::error!(error = %e, user_id = %auth.identity.id, "sign-out failed");
        ApiError::internal()
    })?;
    Ok(Json(json!({ "success": true })))
}

/// `GET /auth/profile`
pub async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Value>, ApiError> {
    let user = profile::get(&state, &auth.identity).await?;
    Ok(Json(json!({ "user": user })))
}

/// `PUT /auth/profile`: shallow-merge the body into the stored profile.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<Map<String, Value>>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let updated = profile::update(&state, &auth.identity, body).await?;
    Ok(Json(json!({ "success": true, "profile": updated })))
}
