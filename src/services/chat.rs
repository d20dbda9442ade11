//! Direct messages between two users.
//!
//! A message is written three times in one batch: once under its own id and
//! once into each participant's view of the conversation, so either side
//! reads the thread with a single prefix scan.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ServiceError, key_segment, present};
use crate::auth::Identity;
use crate::clock;
use crate::kv::{KvError, keys};
use crate::state::AppState;

const DEFAULT_KIND: &str = "text";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: String,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub recipient_id: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// # Errors
///
/// `Invalid` when recipient or message is missing.
pub async fn send(state: &AppState, caller: &Identity, req: SendMessage) -> Result<ChatMessage, ServiceError> {
    let (Some(recipient_id), Some(message)) = (present(req.recipient_id), present(req.message)) else {
        return Err(ServiceError::Invalid("recipientId and message are required".into()));
    };

    let recipient_id = key_segment("recipientId", recipient_id)?;
    let id = keys::message(state.ids.next_millis());
    let chat = ChatMessage {
        sender_id: caller.id.clone(),
        kind: present(req.kind).unwrap_or_else(|| DEFAULT_KIND.to_owned()),
        timestamp: clock::now_iso(),
        read: false,
        message,
        recipient_id,
        id,
    };

    let value = serde_json::to_value(&chat).map_err(|source| KvError::Codec { key: chat.id.clone(), source })?;
    let entries: Vec<(String, Value)> = vec![
        (chat.id.clone(), value.clone()),
        (keys::chat(&chat.sender_id, &chat.recipient_id, &chat.id), value.clone()),
        (keys::chat(&chat.recipient_id, &chat.sender_id, &chat.id), value),
    ];
    state.kv.mset(entries).await?;
    Ok(chat)
}

/// The caller's view of the conversation with `other_id`, oldest first.
///
/// # Errors
///
/// `Store` on KV failure.
pub async fn conversation(state: &AppState, caller: &Identity, other_id: &str) -> Result<Vec<Value>, ServiceError> {
    Ok(state.kv.get_by_prefix(&keys::chat_conversation_prefix(&caller.id, other_id)).await?)
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
