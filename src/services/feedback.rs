//! Free-form feedback, readable only by admins.

use serde_json::{Map, Value};

use super::{ServiceError, profile, strip_reserved};
use crate::auth::{Identity, Role};
use crate::clock;
use crate::kv::keys;
use crate::state::AppState;

const RESERVED_FIELDS: &[&str] = &["id", "userId", "createdAt"];

/// # Errors
///
/// `Store` on KV failure.
pub async fn submit(state: &AppState, caller: &Identity, mut data: Map<String, Value>) -> Result<Value, ServiceError> {
    let key = keys::feedback(state.ids.next_millis());
    strip_reserved(&mut data, RESERVED_FIELDS);
    data.insert("id".into(), Value::String(key.clone()));
    data.insert("userId".into(), Value::String(caller.id.clone()));
    data.insert("createdAt".into(), Value::String(clock::now_iso()));

    let feedback = Value::Object(data);
    state.kv.set(&key, feedback.clone()).await?;
    Ok(feedback)
}

/// All feedback. The caller's stored profile must carry the admin role.
///
/// # Errors
///
/// `Forbidden` for non-admins.
pub async fn list(state: &AppState, caller: &Identity) -> Result<Vec<Value>, ServiceError> {
    if profile::stored_role(state, &caller.id).await? != Some(Role::Admin) {
        return Err(ServiceError::Forbidden("Admin access required".into()));
    }
    Ok(state.kv.get_by_prefix(keys::FEEDBACK_PREFIX).await?)
}

#[cfg(test)]
#[path = "feedback_test.rs"]
mod tests;
