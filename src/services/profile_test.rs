use super::*;
use crate::auth::AuthError;
use crate::state::test_helpers::{identity, test_app_state};
use serde_json::json;

fn signup_req(email: &str, role: &str) -> SignupRequest {
    SignupRequest {
        email: Some(email.into()),
        password: Some("hunter22".into()),
        name: Some("Asha".into()),
        role: Some(role.into()),
    }
}

#[tokio::test]
async fn signup_writes_incomplete_profile() {
    let state = test_app_state();
    let profile = signup(&state, signup_req("Asha@School.test", "teacher")).await.unwrap();

    assert_eq!(profile.email, "asha@school.test");
    assert_eq!(profile.role, Role::Teacher);
    assert!(!profile.profile_complete);

    let stored = state.kv.get(&keys::user(&profile.id)).await.unwrap().unwrap();
    assert_eq!(stored["role"], "teacher");
    assert_eq!(stored["profile_complete"], false);
}

#[tokio::test]
async fn signup_requires_all_fields() {
    let state = test_app_state();
    let mut req = signup_req("a@b.c", "student");
    req.name = Some("  ".into());
    let err = signup(&state, req).await.unwrap_err();
    assert!(matches!(err, ServiceError::Invalid(msg) if msg == "Email, password, name, and role are required"));
}

#[tokio::test]
async fn signup_rejects_unknown_role() {
    let state = test_app_state();
    let err = signup(&state, signup_req("a@b.c", "principal")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Invalid(_)));
}

#[tokio::test]
async fn duplicate_signup_surfaces_provider_message() {
    let state = test_app_state();
    signup(&state, signup_req("dup@school.test", "student")).await.unwrap();
    let err = signup(&state, signup_req("dup@school.test", "student")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Auth(AuthError::Rejected(_))));
}

#[tokio::test]
async fn signin_after_signup() {
    let state = test_app_state();
    let profile = signup(&state, signup_req("kim@school.test", "student")).await.unwrap();
    let session = signin(
        &state,
        SigninRequest { email: Some("KIM@school.test".into()), password: Some("hunter22".into()) },
    )
    .await
    .unwrap();
    assert_eq!(session.user.id, profile.id);

    let bad = signin(&state, SigninRequest { email: Some("kim@school.test".into()), password: Some("nope".into()) })
        .await
        .unwrap_err();
    assert!(matches!(bad, ServiceError::Auth(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn get_falls_back_to_identity() {
    let state = test_app_state();
    let caller = identity("u1", Role::Student);
    let value = get(&state, &caller).await.unwrap();
    assert_eq!(value["id"], "u1");
    assert_eq!(value["role"], "student");
}

#[tokio::test]
async fn update_merges_and_protects_id_and_role() {
    let state = test_app_state();
    let caller = identity("u1", Role::Student);
    state
        .kv
        .set_json(&keys::user("u1"), &UserProfile::new("u1", "u1@x.y", "Uma", Role::Student, clock::now_iso()))
        .await
        .unwrap();

    let updates = json!({"id": "someone-else", "role": "admin", "bio": "hi", "profile_complete": true});
    let Value::Object(updates) = updates else { unreachable!() };
    let merged = update(&state, &caller, updates).await.unwrap();

    assert_eq!(merged["id"], "u1");
    assert_eq!(merged["role"], "student");
    assert_eq!(merged["bio"], "hi");
    assert_eq!(merged["name"], "Uma");
    assert_eq!(merged["profile_complete"], true);
    assert!(merged["updated_at"].is_string());
    assert_eq!(stored_role(&state, "u1").await.unwrap(), Some(Role::Student));
}

#[tokio::test]
async fn update_without_existing_profile_starts_empty() {
    let state = test_app_state();
    let caller = identity("u2", Role::Teacher);
    let Value::Object(updates) = json!({"phone": "123"}) else { unreachable!() };
    let merged = update(&state, &caller, updates).await.unwrap();
    assert_eq!(merged["id"], "u2");
    assert_eq!(merged["phone"], "123");
    assert!(merged.get("role").is_none());
    assert_eq!(stored_role(&state, "u2").await.unwrap(), None);
}
