use super::*;

#[test]
fn role_parses_case_insensitively() {
    assert_eq!(Role::parse("Student"), Some(Role::Student));
    assert_eq!(Role::parse(" TEACHER "), Some(Role::Teacher));
    assert_eq!(Role::parse("admin"), Some(Role::Admin));
    assert_eq!(Role::parse("principal"), None);
}

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_value(Role::Teacher).unwrap(), serde_json::json!("teacher"));
    assert_eq!(Role::Admin.as_str(), "admin");
}

#[test]
fn identity_omits_missing_fields() {
    let id = Identity { id: "u1".into(), email: None, name: None, role: None };
    assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!({"id": "u1"}));
}

#[test]
fn normalize_email_accepts_and_lowercases() {
    assert_eq!(normalize_email("  Priya@School.EDU "), Some("priya@school.edu".into()));
}

#[test]
fn normalize_email_rejects_malformed() {
    assert_eq!(normalize_email(""), None);
    assert_eq!(normalize_email("no-at-sign"), None);
    assert_eq!(normalize_email("@school.edu"), None);
    assert_eq!(normalize_email("priya@"), None);
    assert_eq!(normalize_email("a@b@c"), None);
}

#[test]
fn session_serializes_camel_case() {
    let session = Session {
        access_token: "t".into(),
        expires_at: "2024-01-01T00:00:00.000Z".into(),
        user: Identity { id: "u".into(), email: None, name: None, role: Some(Role::Student) },
    };
    let json = serde_json::to_value(&session).unwrap();
    assert_eq!(json["accessToken"], "t");
    assert_eq!(json["expiresAt"], "2024-01-01T00:00:00.000Z");
    assert_eq!(json["user"]["role"], "student");
}
