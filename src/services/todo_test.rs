use super::*;
use crate::auth::Role;
use crate::state::test_helpers::{identity, test_app_state};
use serde_json::json;

fn data(value: Value) -> Map<String, Value> {
    let Value::Object(map) = value else { panic!("expected object") };
    map
}

#[tokio::test]
async fn create_list_update_delete() {
    let state = test_app_state();
    let owner = identity("u1", Role::Student);

    let todo = create(&state, &owner, data(json!({"title": "Lab report", "completed": false}))).await.unwrap();
    let id = todo["id"].as_str().unwrap().to_owned();
    assert!(id.starts_with("todo:u1:"));
    assert_eq!(todo["userId"], "u1");

    let updated = update(&state, &owner, &id, data(json!({"completed": true, "userId": "u2", "id": "x"})))
        .await
        .unwrap();
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["userId"], "u1");
    assert_eq!(updated["id"], json!(id));
    assert!(updated["updatedAt"].is_string());
    assert_eq!(updated["title"], "Lab report");

    assert_eq!(list(&state, &owner).await.unwrap(), vec![updated]);

    delete(&state, &owner, &id).await.unwrap();
    assert!(list(&state, &owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn foreign_todo_is_not_found() {
    let state = test_app_state();
    let owner = identity("u1", Role::Student);
    let other = identity("u2", Role::Student);
    let todo = create(&state, &owner, data(json!({"title": "mine"}))).await.unwrap();
    let id = todo["id"].as_str().unwrap();

    assert!(matches!(update(&state, &other, id, Map::new()).await, Err(ServiceError::NotFound)));
    assert!(matches!(delete(&state, &other, id).await, Err(ServiceError::NotFound)));
    assert_eq!(list(&state, &owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn non_todo_keys_are_not_found() {
    let state = test_app_state();
    let owner = identity("u1", Role::Student);
    state.kv.set("user:u1", json!({"id": "u1", "userId": "u1"})).await.unwrap();

    assert!(matches!(delete(&state, &owner, "user:u1").await, Err(ServiceError::NotFound)));
    assert!(matches!(delete(&state, &owner, "todo:u1:404").await, Err(ServiceError::NotFound)));
    assert!(state.kv.get("user:u1").await.unwrap().is_some());
}

#[tokio::test]
async fn create_ignores_caller_supplied_identity_fields() {
    let state = test_app_state();
    let owner = identity("u1", Role::Student);
    let todo = create(&state, &owner, data(json!({"userId": "u2", "createdAt": "1999"}))).await.unwrap();
    assert_eq!(todo["userId"], "u1");
    assert_ne!(todo["createdAt"], "1999");
    assert!(list(&state, &identity("u2", Role::Student)).await.unwrap().is_empty());
}
