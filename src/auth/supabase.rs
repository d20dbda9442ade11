//! Supabase Auth (GoTrue) client.
//!
//! Thin HTTP wrapper over three endpoints: `GET /auth/v1/user` to resolve a
//! bearer token, `POST /auth/v1/admin/users` to create confirmed accounts
//! with the service-role key, and `POST /auth/v1/token?grant_type=password`
//! for sign-in. Response parsing lives in pure functions for testability.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{AuthError, AuthProvider, Identity, NewAccount, Role, Session};
use crate::clock;
use crate::config::{HttpTimeouts, SupabaseConfig};

// =============================================================================
// CLIENT
// =============================================================================

pub struct SupabaseAuth {
    http: reqwest::Client,
    base_url: String,
    service_role_key: String,
}

impl SupabaseAuth {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &SupabaseConfig, timeouts: HttpTimeouts) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request)
            .connect_timeout(timeouts.connect)
            .build()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(Self { http, base_url: config.url.clone(), service_role_key: config.service_role_key.clone() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1{path}", self.base_url)
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn verify(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        if token.is_empty() {
            return Ok(None);
        }
        let response = self
            .http
            .get(self.url("/user"))
            .header("apikey", &self.service_role_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        // GoTrue answers 401/403 for bad or expired JWTs.
        if is_rejection(status) {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AuthError::Transport(format!("{status}: {body}")));
        }
        parse_user(&body).map(Some)
    }

    async fn create_user(&self, account: NewAccount) -> Result<Identity, AuthError> {
        let payload = json!({
            "email": account.email,
            "password": account.password,
            "user_metadata": {
                "name": account.name,
                "role": account.role,
                "created_at": account.created_at,
            },
            // No mail server is configured, so accounts start confirmed.
            "email_confirm": true,
        });

        let response = self
            .http
            .post(self.url("/admin/users"))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if is_rejection(status) {
            return Err(AuthError::Rejected(error_message(&body).unwrap_or_else(|| status.to_string())));
        }
        if !status.is_success() {
            return Err(AuthError::Transport(format!("{status}: {body}")));
        }
        parse_user(&body)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .http
            .post(self.url("/token?grant_type=password"))
            .header("apikey", &self.service_role_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if is_rejection(status) {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(AuthError::Transport(format!("{status}: {body}")));
        }
        parse_token_response(&body)
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.url("/logout"))
            .header("apikey", &self.service_role_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() || status.is_client_error() {
            return Ok(());
        }
        Err(AuthError::Transport(status.to_string()))
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct WireUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: Value,
}

#[derive(Deserialize)]
struct WireToken {
    access_token: String,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: WireUser,
}

// =============================================================================
// PARSING
// =============================================================================

/// Statuses GoTrue uses to refuse the request itself. Anything else that is
/// not a success (rate limits, outages) is a transport failure.
pub(crate) fn is_rejection(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 400 | 401 | 403 | 422)
}

fn identity_from_wire(user: WireUser) -> Identity {
    let meta = &user.user_metadata;
    Identity {
        id: user.id,
        email: user.email,
        name: meta.get("name").and_then(Value::as_str).map(str::to_owned),
        role: meta.get("role").and_then(Value::as_str).and_then(Role::parse),
    }
}

pub(crate) fn parse_user(body: &str) -> Result<Identity, AuthError> {
    // Admin create responses are the bare user; some versions wrap it in `user`.
    let value: Value = serde_json::from_str(body).map_err(|e| AuthError::Transport(e.to_string()))?;
    let user_value = value.get("user").cloned().unwrap_or(value);
    let user: WireUser = serde_json::from_value(user_value).map_err(|e| AuthError::Transport(e.to_string()))?;
    Ok(identity_from_wire(user))
}

pub(crate) fn parse_token_response(body: &str) -> Result<Session, AuthError> {
    let wire: WireToken = serde_json::from_str(body).map_err(|e| AuthError::Transport(e.to_string()))?;
    let expires_at_secs = wire
        .expires_at
        .or_else(|| wire.expires_in.map(|secs| clock::now_millis() / 1000 + secs))
        .unwrap_or_default();
    let expires_at = time::OffsetDateTime::from_unix_timestamp(expires_at_secs)
        .map(clock::format_iso)
        .unwrap_or_default();
    Ok(Session { access_token: wire.access_token, expires_at, user: identity_from_wire(wire.user) })
}

/// Pull a human-readable message out of a GoTrue error body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|field| value.get(*field).and_then(Value::as_str))
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "supabase_test.rs"]
mod tests;
