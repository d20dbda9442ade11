use super::*;
use crate::auth::Role;
use crate::state::test_helpers::{identity, test_app_state};

fn req(to: &str, text: &str) -> SendMessage {
    SendMessage { recipient_id: Some(to.into()), message: Some(text.into()), kind: None }
}

#[tokio::test]
async fn both_sides_see_the_thread_in_order() {
    let state = test_app_state();
    let ana = identity("ana", Role::Student);
    let ben = identity("ben", Role::Teacher);

    let first = send(&state, &ana, req("ben", "Is the lab open?")).await.unwrap();
    let second = send(&state, &ben, req("ana", "Yes, until 5")).await.unwrap();
    assert_eq!(first.kind, "text");

    let for_ana = conversation(&state, &ana, "ben").await.unwrap();
    let for_ben = conversation(&state, &ben, "ana").await.unwrap();
    let expected = vec![serde_json::to_value(&first).unwrap(), serde_json::to_value(&second).unwrap()];
    assert_eq!(for_ana, expected);
    assert_eq!(for_ben, for_ana);
    assert!(state.kv.get(&first.id).await.unwrap().is_some());
}

#[tokio::test]
async fn third_parties_see_nothing() {
    let state = test_app_state();
    let ana = identity("ana", Role::Student);
    send(&state, &ana, req("ben", "hi")).await.unwrap();
    assert!(conversation(&state, &identity("cy", Role::Student), "ben").await.unwrap().is_empty());
}

#[tokio::test]
async fn explicit_type_is_kept() {
    let state = test_app_state();
    let mut message = req("ben", "diagram.png");
    message.kind = Some("image".into());
    let sent = send(&state, &identity("ana", Role::Student), message).await.unwrap();
    assert_eq!(sent.kind, "image");
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let state = test_app_state();
    let err = send(&state, &identity("ana", Role::Student), req("ben", "  ")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Invalid(_)));
}

#[tokio::test]
async fn message_to_self_is_stored_once_per_key() {
    let state = test_app_state();
    let ana = identity("ana", Role::Student);
    let sent = send(&state, &ana, req("ana", "note to self")).await.unwrap();
    let thread = conversation(&state, &ana, "ana").await.unwrap();
    assert_eq!(thread, vec![serde_json::to_value(&sent).unwrap()]);
}

#[tokio::test]
async fn recipient_with_separator_is_rejected() {
    let state = test_app_state();
    let err = send(&state, &identity("ana", Role::Student), req("ben:x", "hi")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Invalid(msg) if msg.contains("recipientId")));
}
