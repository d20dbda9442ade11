//! Notifications addressed to a single recipient.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ServiceError, key_segment, present};
use crate::auth::Identity;
use crate::clock;
use crate::kv::{KvStoreExt, keys};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub recipient_id: String,
    pub sender_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotification {
    pub recipient_id: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub priority: Option<String>,
}

/// # Errors
///
/// `Invalid` when recipient, title, or message is missing.
pub async fn send(state: &AppState, sender_id: &str, req: SendNotification) -> Result<Notification, ServiceError> {
    let (Some(recipient_id), Some(title), Some(message)) =
        (present(req.recipient_id), present(req.title), present(req.message))
    else {
        return Err(ServiceError::Invalid("recipientId, title, and message are required".into()));
    };

    let recipient_id = key_segment("recipientId", recipient_id)?;
    let key = keys::notification(&recipient_id, state.ids.next_millis());
    let notification = Notification {
        id: key.clone(),
        recipient_id,
        sender_id: sender_id.to_owned(),
        title,
        message,
        kind: present(req.kind),
        priority: present(req.priority),
        read: false,
        created_at: clock::now_iso(),
        read_at: None,
    };
    state.kv.set_json(&key, &notification).await?;
    Ok(notification)
}

/// # Errors
///
/// `Store` on KV failure.
pub async fn list_for(state: &AppState, recipient_id: &str) -> Result<Vec<Value>, ServiceError> {
    Ok(state.kv.get_by_prefix(&keys::notification_recipient_prefix(recipient_id)).await?)
}

/// Only the recipient can mark a notification read; anyone else sees `NotFound`.
/// The stored record is updated in place, so fields this server never wrote
/// are kept.
///
/// # Errors
///
/// `NotFound` when the id is unknown or addressed to someone else.
pub async fn mark_read(state: &AppState, caller: &Identity, notification_id: &str) -> Result<Value, ServiceError> {
    if !notification_id.starts_with(&keys::notification_recipient_prefix(&caller.id)) {
        return Err(ServiceError::NotFound);
    }
    let Some(Value::Object(mut notification)) = state.kv.get(notification_id).await? else {
        return Err(ServiceError::NotFound);
    };
    if notification.get("recipientId").and_then(Value::as_str) != Some(caller.id.as_str()) {
        return Err(ServiceError::NotFound);
    }

    notification.insert("read".into(), Value::Bool(true));
    notification.insert("readAt".into(), Value::String(clock::now_iso()));
    let notification = Value::Object(notification);
    state.kv.set(notification_id, notification.clone()).await?;
    Ok(notification)
}

#[cfg(test)]
#[path = "notification_test.rs"]
mod tests;
