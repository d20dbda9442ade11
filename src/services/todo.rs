//! Personal to-do items. Every operation is scoped to the caller.

use serde_json::{Map, Value};

use super::{ServiceError, merge_shallow, strip_reserved};
use crate::auth::Identity;
use crate::clock;
use crate::kv::keys;
use crate::state::AppState;

const RESERVED_FIELDS: &[&str] = &["id", "userId", "createdAt", "updatedAt"];
const PROTECTED_FIELDS: &[&str] = &["id", "userId", "createdAt"];

/// Store caller data as a new to-do.
///
/// # Errors
///
/// `Store` on KV failure.
pub async fn create(state: &AppState, caller: &Identity, mut data: Map<String, Value>) -> Result<Value, ServiceError> {
    let key = keys::todo(&caller.id, state.ids.next_millis());
    strip_reserved(&mut data, RESERVED_FIELDS);
    data.insert("id".into(), Value::String(key.clone()));
    data.insert("userId".into(), Value::String(caller.id.clone()));
    data.insert("createdAt".into(), Value::String(clock::now_iso()));

    let todo = Value::Object(data);
    state.kv.set(&key, todo.clone()).await?;
    Ok(todo)
}

/// # Errors
///
/// `Store` on KV failure.
pub async fn list(state: &AppState, caller: &Identity) -> Result<Vec<Value>, ServiceError> {
    Ok(state.kv.get_by_prefix(&keys::todo_user_prefix(&caller.id)).await?)
}

/// Shallow-merge `updates` into one of the caller's to-dos.
///
/// # Errors
///
/// `NotFound` when the to-do is missing or belongs to someone else.
pub async fn update(state: &AppState, caller: &Identity, todo_id: &str, updates: Map<String, Value>) -> Result<Value, ServiceError> {
    let mut todo = load_owned(state, caller, todo_id).await?;
    merge_shallow(&mut todo, updates, PROTECTED_FIELDS);
    todo.insert("updatedAt".into(), Value::String(clock::now_iso()));

    let todo = Value::Object(todo);
    state.kv.set(todo_id, todo.clone()).await?;
    Ok(todo)
}

/// # Errors
///
/// `NotFound` when the to-do is missing or belongs to someone else.
pub async fn delete(state: &AppState, caller: &Identity, todo_id: &str) -> Result<(), ServiceError> {
    load_owned(state, caller, todo_id).await?;
    state.kv.del(todo_id).await?;
    Ok(())
}

async fn load_owned(state: &AppState, caller: &Identity, todo_id: &str) -> Result<Map<String, Value>, ServiceError> {
    if !todo_id.starts_with(&keys::todo_user_prefix(&caller.id)) {
        return Err(ServiceError::NotFound);
    }
    match state.kv.get(todo_id).await? {
        Some(Value::Object(todo)) if todo.get("userId").and_then(Value::as_str) == Some(caller.id.as_str()) => Ok(todo),
        _ => Err(ServiceError::NotFound),
    }
}

#[cfg(test)]
#[path = "todo_test.rs"]
mod tests;
