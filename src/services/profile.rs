//! Account signup and user profiles.
//!
//! A profile is stored at `user:{id}` as an open JSON object: the fields
//! written at signup plus whatever the user later merges in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ServiceError, merge_shallow, present};
use crate::auth::{Identity, NewAccount, Role, Session, normalize_email};
use crate::clock;
use crate::kv::{KvStoreExt, keys};
use crate::state::AppState;

/// Fields a profile update may not touch. `id` is forced to the caller and
/// `role` drives the admin check.
const PROTECTED_FIELDS: &[&str] = &["id", "role"];

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: String,
    #[serde(default)]
    pub profile_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl UserProfile {
    #[must_use]
    pub fn new(id: &str, email: &str, name: &str, role: Role, created_at: String) -> Self {
        Self {
            id: id.to_owned(),
            email: email.to_owned(),
            name: name.to_owned(),
            role,
            created_at,
            profile_complete: false,
            updated_at: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Create the account with the identity provider, then write its profile.
///
/// # Errors
///
/// `Invalid` for missing fields or an unknown role, `Auth` when the provider
/// refuses the account, `Store` when the profile write fails.
pub async fn signup(state: &AppState, req: SignupRequest) -> Result<UserProfile, ServiceError> {
    let (Some(email), Some(password), Some(name), Some(role)) =
        (present(req.email), req.password.filter(|p| !p.is_empty()), present(req.name), present(req.role))
    else {
        return Err(ServiceError::Invalid("Email, password, name, and role are required".into()));
    };
    let role = Role::parse(&role)
        .ok_or_else(|| ServiceError::Invalid("Role must be one of student, teacher, admin".into()))?;

    let created_at = clock::now_iso();
    let identity = state
        .auth
        .create_user(NewAccount {
            email: email.clone(),
            password,
            name: name.clone(),
            role,
            created_at: created_at.clone(),
        })
        .await?;

    let email = identity.email.clone().unwrap_or(email);
    let profile = UserProfile::new(&identity.id, &email, &name, role, created_at);
    state.kv.set_json(&keys::user(&identity.id), &profile).await?;
    tracing::info!(user_id = %profile.id, role = role.as_str(), "account created");
    Ok(profile)
}

/// # Errors
///
/// `Invalid` when either field is missing, otherwise whatever the provider reports.
pub async fn signin(state: &AppState, req: SigninRequest) -> Result<Session, ServiceError> {
    let (Some(email), Some(password)) = (present(req.email), req.password.filter(|p| !p.is_empty())) else {
        return Err(ServiceError::Invalid("Email and password are required".into()));
    };
    let email = normalize_email(&email).unwrap_or(email);
    Ok(state.auth.sign_in(&email, &password).await?)
}

/// The stored profile, or the bare identity when none is stored.
///
/// # Errors
///
/// `Store` on KV failure.
pub async fn get(state: &AppState, caller: &Identity) -> Result<Value, ServiceError> {
    match state.kv.get(&keys::user(&caller.id)).await? {
        Some(profile) => Ok(profile),
        None => Ok(serde_json::to_value(caller).unwrap_or(Value::Null)),
    }
}

/// Shallow-merge `updates` over the stored profile.
///
/// # Errors
///
/// `Store` on KV failure.
pub async fn update(state: &AppState, caller: &Identity, updates: Map<String, Value>) -> Result<Value, ServiceError> {
    let key = keys::user(&caller.id);
    let mut profile = match state.kv.get(&key).await? {
        Some(Value::Object(existing)) => existing,
        _ => Map::new(),
    };
    merge_shallow(&mut profile, updates, PROTECTED_FIELDS);
    profile.insert("id".into(), Value::String(caller.id.clone()));
    profile.insert("updated_at".into(), Value::String(clock::now_iso()));

    let profile = Value::Object(profile);
    state.kv.set(&key, profile.clone()).await?;
    Ok(profile)
}

/// Role recorded on the caller's stored profile, if any.
///
/// # Errors
///
/// `Store` on KV failure.
pub async fn stored_role(state: &AppState, user_id: &str) -> Result<Option<Role>, ServiceError> {
    let profile = state.kv.get(&keys::user(user_id)).await?;
    Ok(profile
        .as_ref()
        .and_then(|p| p.get("role"))
        .and_then(Value::as_str)
        .and_then(Role::parse))
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
