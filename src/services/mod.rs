//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own record shapes, key construction, and the read/write
//! rules for one feature area each, so route handlers stay focused on
//! extraction, auth, and response envelopes. Every write follows the same
//! pattern: check required fields, build the key, overwrite unconditionally.

pub mod analytics;
pub mod attendance;
pub mod certificate;
pub mod chat;
pub mod document;
pub mod exam;
pub mod feedback;
pub mod marks;
pub mod notification;
pub mod proctor;
pub mod profile;
pub mod todo;

use serde_json::{Map, Value};

use crate::auth::AuthError;
use crate::kv::KvError;
use crate::storage::BlobError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing or malformed input; the message is shown to the caller.
    #[error("{0}")]
    Invalid(String),
    /// Record missing or owned by someone else. Deliberately indistinguishable.
    #[error("not found or unauthorized")]
    NotFound,
    #[error("{0}")]
    Forbidden(String),
    #[error("store error: {0}")]
    Store(#[from] KvError),
    #[error("blob storage error: {0}")]
    Blob(#[from] BlobError),
    #[error("auth provider error: {0}")]
    Auth(#[from] AuthError),
}

/// `Some(trimmed)` when the field is present and not blank.
pub(crate) fn present(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Ids that become key segments may not contain the `:` separator, or a
/// record could land under another owner's prefix.
pub(crate) fn key_segment(field: &str, value: String) -> Result<String, ServiceError> {
    if value.contains(':') {
        return Err(ServiceError::Invalid(format!("{field} must not contain ':'")));
    }
    Ok(value)
}

/// A JSON number, or a string that parses as one. Stored records were never
/// validated, so numeric fields may arrive either way.
pub(crate) fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Remove fields the server owns from caller-supplied data.
pub(crate) fn strip_reserved(data: &mut Map<String, Value>, reserved: &[&str]) {
    for key in reserved {
        data.remove(*key);
    }
}

/// Shallow merge: top-level keys of `updates` replace those in `base`,
/// except `protected` ones.
pub(crate) fn merge_shallow(base: &mut Map<String, Value>, updates: Map<String, Value>, protected: &[&str]) {
    for (key, value) in updates {
        if !protected.contains(&key.as_str()) {
            base.insert(key, value);
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
