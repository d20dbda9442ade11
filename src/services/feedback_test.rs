use super::*;
use crate::state::test_helpers::{identity, seed_user, test_app_state};
use serde_json::json;

fn data(value: Value) -> Map<String, Value> {
    let Value::Object(map) = value else { panic!("expected object") };
    map
}

#[tokio::test]
async fn admin_lists_everyones_feedback() {
    let state = test_app_state();
    let (admin, _) = seed_user(&state, "root", Role::Admin).await;
    let (student, _) = seed_user(&state, "sam", Role::Student).await;

    let stored = submit(&state, &student, data(json!({"rating": 4, "comment": "More labs"}))).await.unwrap();
    assert!(stored["id"].as_str().unwrap().starts_with("feedback:"));
    assert_eq!(stored["userId"], json!(student.id));

    let all = list(&state, &admin).await.unwrap();
    assert_eq!(all, vec![stored]);
}

#[tokio::test]
async fn non_admin_is_forbidden() {
    let state = test_app_state();
    let (teacher, _) = seed_user(&state, "tia", Role::Teacher).await;
    let err = list(&state, &teacher).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(msg) if msg == "Admin access required"));
}

#[tokio::test]
async fn token_role_alone_is_not_enough() {
    // No stored profile: the admin claim on the identity is ignored.
    let state = test_app_state();
    let caller = identity("ghost", Role::Admin);
    assert!(matches!(list(&state, &caller).await, Err(ServiceError::Forbidden(_))));
}
