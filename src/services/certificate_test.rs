use super::*;
use crate::auth::Role;
use crate::state::test_helpers::{identity, test_app_state};

#[tokio::test]
async fn issued_certificate_number_matches_key() {
    let state = test_app_state();
    let req = IssueCertificate {
        student_id: Some("s1".into()),
        lab_name: Some("Optics Lab".into()),
        score: Some(92.5),
        completion_date: Some("2024-05-02".into()),
    };
    let cert = issue(&state, &identity("t1", Role::Teacher), req).await.unwrap();

    let millis = cert.certificate_number.strip_prefix("RESOVISTA-").unwrap();
    assert_eq!(cert.id, format!("certificate:s1:{millis}"));
    assert_eq!(for_student(&state, "s1").await.unwrap(), vec![serde_json::to_value(&cert).unwrap()]);
}

#[tokio::test]
async fn certificate_numbers_are_unique() {
    let state = test_app_state();
    let teacher = identity("t1", Role::Teacher);
    let mut numbers = Vec::new();
    for _ in 0..3 {
        let req = IssueCertificate { student_id: Some("s1".into()), lab_name: Some("Lab".into()), ..Default::default() };
        numbers.push(issue(&state, &teacher, req).await.unwrap().certificate_number);
    }
    numbers.dedup();
    assert_eq!(numbers.len(), 3);
}

#[tokio::test]
async fn lab_name_is_required() {
    let state = test_app_state();
    let req = IssueCertificate { student_id: Some("s1".into()), ..Default::default() };
    assert!(matches!(issue(&state, &identity("t1", Role::Teacher), req).await, Err(ServiceError::Invalid(_))));
}
