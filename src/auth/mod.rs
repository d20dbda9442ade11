//! Identity providers behind bearer-token authentication.
//!
//! ARCHITECTURE
//! ============
//! Route handlers never see passwords or provider wire formats. They ask an
//! `AuthProvider` to resolve a bearer token into an `Identity`, and the
//! signup/signin routes delegate account creation and credential checks to
//! it. Two implementations exist:
//!
//! - `SupabaseAuth`: the hosted auth service, over its REST API.
//! - `LocalAuth`: accounts and sessions kept in the KV store itself, for
//!   self-hosted runs and tests.

pub mod local;
pub mod supabase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::kv::KvError;

pub use local::LocalAuth;
pub use supabase::SupabaseAuth;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Self::Student),
            "teacher" => Some(Self::Teacher),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }
}

/// An authenticated caller as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Signup request passed to the provider.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub created_at: String,
}

/// A bearer token issued by `sign_in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub expires_at: String,
    pub user: Identity,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider refused the request (duplicate email, weak password...).
    #[error("{0}")]
    Rejected(String),
    #[error("invalid login credentials")]
    InvalidCredentials,
    #[error("password sign-in is not supported by this provider")]
    Unsupported,
    #[error("auth provider request failed: {0}")]
    Transport(String),
    #[error("auth store error: {0}")]
    Store(#[from] KvError),
}

// =============================================================================
// PROVIDER
// =============================================================================

#[async_trait]
pub trait AuthProvider: Send + Sync + 'static {
    /// Resolve a bearer token. `Ok(None)` means the token is unknown or expired.
    async fn verify(&self, token: &str) -> Result<Option<Identity>, AuthError>;

    /// Create a confirmed account.
    async fn create_user(&self, account: NewAccount) -> Result<Identity, AuthError>;

    /// Exchange email + password for a bearer token.
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Session, AuthError> {
        Err(AuthError::Unsupported)
    }

    /// Revoke a bearer token. Unknown tokens are not an error.
    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;
}

/// Lowercased, trimmed email with exactly one `@` and non-empty halves.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
