//! Self-hosted identity provider backed by the KV store.
//!
//! ARCHITECTURE
//! ============
//! Accounts live at `auth:account:{email}` with a salted SHA-256 password
//! hash. Sign-in issues a random 32-byte hex token stored at
//! `auth:session:{token}` together with the identity and an expiry, so
//! verification is a single key read.
//!
//! TRADE-OFFS
//! ==========
//! Account creation is check-then-write with no lock, so two concurrent
//! signups for the same email can both succeed and the later one wins. This
//! matches the overwrite semantics of every other record in the store.

use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{AuthError, AuthProvider, Identity, NewAccount, Role, Session, normalize_email};
use crate::clock;
use crate::kv::{KvStore, KvStoreExt, keys};

const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes_to_hex(&bytes)
}

#[must_use]
pub(crate) fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Constant-time comparison of two equal-length hex digests.
fn digest_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.bytes().zip(b.bytes()).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAccount {
    id: String,
    email: String,
    name: String,
    role: Role,
    password_salt: String,
    password_hash: String,
    created_at: String,
}

impl StoredAccount {
    fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            name: Some(self.name.clone()),
            role: Some(self.role),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    user: Identity,
    expires_at_millis: i64,
}

pub struct LocalAuth {
    kv: Arc<dyn KvStore>,
    session_ttl: Duration,
}

impl LocalAuth {
    #[must_use]
    pub fn new(kv: Arc<dyn KvStore>, session_ttl: Duration) -> Self {
        Self { kv, session_ttl }
    }

    fn ttl_millis(&self) -> i64 {
        i64::try_from(self.session_ttl.as_millis()).unwrap_or(i64::MAX)
    }
}

#[async_trait]
impl AuthProvider for LocalAuth {
    async fn verify(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        if token.is_empty() {
            return Ok(None);
        }
        let key = keys::auth_session(token);
        let Some(session) = self.kv.get_json::<StoredSession>(&key).await? else {
            return Ok(None);
        };
        if session.expires_at_millis <= clock::now_millis() {
            self.kv.del(&key).await?;
            return Ok(None);
        }
        Ok(Some(session.user))
    }

    async fn create_user(&self, account: NewAccount) -> Result<Identity, AuthError> {
        let email = normalize_email(&account.email)
            .ok_or_else(|| AuthError::Rejected("Unable to validate email address: invalid format".into()))?;
        if account.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Rejected(format!(
                "Password should be at least {MIN_PASSWORD_LEN} characters."
            )));
        }

        let key = keys::auth_account(&email);
        if self.kv.get(&key).await?.is_some() {
            return Err(AuthError::Rejected(
                "A user with this email address has already been registered".into(),
            ));
        }

        let salt = generate_salt();
        let stored = StoredAccount {
            id: Uuid::new_v4().to_string(),
            password_hash: hash_password(&salt, &account.password),
            password_salt: salt,
            email,
            name: account.name,
            role: account.role,
            created_at: account.created_at,
        };
        self.kv.set_json(&key, &stored).await?;
        tracing::info!(user_id = %stored.id, "local account created");

        Ok(stored.identity())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email).ok_or(AuthError::InvalidCredentials)?;
        let account = self
            .kv
            .get_json::<StoredAccount>(&keys::auth_account(&email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !digest_eq(&hash_password(&account.password_salt, password), &account.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = generate_token();
        let expires_at_millis = clock::now_millis().saturating_add(self.ttl_millis());
        let session = StoredSession { user: account.identity(), expires_at_millis };
        self.kv.set_json(&keys::auth_session(&token), &session).await?;

        let expires_at = OffsetDateTime::from_unix_timestamp_nanos(i128::from(expires_at_millis) * 1_000_000)
            .map(clock::format_iso)
            .unwrap_or_default();

        Ok(Session { access_token: token, expires_at, user: session.user })
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        self.kv.del(&keys::auth_session(token)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "local_test.rs"]
mod tests;
