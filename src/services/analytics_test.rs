use super::*;
use crate::auth::Role;
use crate::services::attendance::MarkAttendance;
use crate::services::certificate::IssueCertificate;
use crate::services::marks::AddMarks;
use crate::state::test_helpers::{identity, test_app_state};
use serde_json::json;

fn record(student: &str, date: &str, status: &str) -> Value {
    json!({"classId": "c1", "studentId": student, "status": status, "date": date, "markedBy": "t1"})
}

#[test]
fn empty_inputs_give_zeroes() {
    assert!(average_score(&[]).abs() < f64::EPSILON);
    assert_eq!(
        summarize_class(&[]),
        ClassAnalytics { total_students: 0, total_classes: 0, average_attendance: 0.0 }
    );
}

#[test]
fn class_summary_counts_distinct_students_and_dates() {
    let records = [
        record("s1", "d1", "present"),
        record("s2", "d1", "absent"),
        record("s1", "d2", "late"),
        record("s2", "d2", "present"),
    ];
    let summary = summarize_class(&records);
    assert_eq!(summary.total_students, 2);
    assert_eq!(summary.total_classes, 2);
    assert!((summary.average_attendance - 50.0).abs() < 1e-9);
}

#[tokio::test]
async fn student_summary_across_areas() {
    let state = test_app_state();
    let teacher = identity("t1", Role::Teacher);

    for (score, max) in [(40.0, 50.0), (30.0, 60.0), (5.0, 0.0)] {
        let req = AddMarks {
            student_id: Some("s1".into()),
            subject: Some("math".into()),
            marks: Some(score),
            max_marks: Some(max),
            exam_type: None,
        };
        marks::add(&state, &teacher, req).await.unwrap();
    }
    for (class, student) in [("c1", "s1"), ("c2", "s1"), ("c1", "s2")] {
        let req = MarkAttendance {
            class_id: Some(class.into()),
            student_id: Some(student.into()),
            status: Some("present".into()),
            date: Some("2024-04-01".into()),
        };
        attendance::mark(&state, &teacher, req).await.unwrap();
    }
    let cert = IssueCertificate { student_id: Some("s1".into()), lab_name: Some("Optics".into()), ..Default::default() };
    certificate::issue(&state, &teacher, cert).await.unwrap();

    let summary = student(&state, "s1").await.unwrap();
    assert_eq!(summary.total_marks, 3);
    // (80 + 50) / 2, the zero-max record is skipped.
    assert!((summary.average_score - 65.0).abs() < 1e-9);
    assert_eq!(summary.attendance_records, 2);
    assert_eq!(summary.certificates_earned, 1);

    let class_summary = class(&state, "c1").await.unwrap();
    assert_eq!(class_summary.total_students, 2);
    assert!((class_summary.average_attendance - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn summaries_count_records_outside_the_typed_shape() {
    let state = test_app_state();
    state
        .kv
        .set("attendance:c1:s1:2024-02-01", json!({"studentId": "s1", "status": "excused", "date": "2024-02-01"}))
        .await
        .unwrap();
    state
        .kv
        .set("marks:s1:math:1", json!({"studentId": "s1", "marks": "85", "maxMarks": 100}))
        .await
        .unwrap();

    let class_summary = class(&state, "c1").await.unwrap();
    assert_eq!(class_summary.total_students, 1);
    assert_eq!(class_summary.total_classes, 1);
    assert!(class_summary.average_attendance.abs() < 1e-9);

    let summary = student(&state, "s1").await.unwrap();
    assert_eq!(summary.total_marks, 1);
    assert!((summary.average_score - 85.0).abs() < 1e-9);
    assert_eq!(summary.attendance_records, 1);
}
