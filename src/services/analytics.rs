//! Read-only summaries computed from other areas' records.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use super::{ServiceError, attendance, certificate, marks};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAnalytics {
    pub total_marks: usize,
    pub average_score: f64,
    pub attendance_records: usize,
    pub certificates_earned: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAnalytics {
    pub total_students: usize,
    pub total_classes: usize,
    pub average_attendance: f64,
}

/// Mean percentage over records with readable numbers and a positive
/// maximum, 0 when none.
#[must_use]
pub fn average_score(records: &[Value]) -> f64 {
    let percentages: Vec<f64> = records.iter().filter_map(marks::percentage).collect();
    if percentages.is_empty() {
        return 0.0;
    }
    percentages.iter().sum::<f64>() / percentages.len() as f64
}

/// Distinct-value key for a field; a missing field counts as one value.
fn field_key(record: &Value, field: &str) -> String {
    record.get(field).unwrap_or(&Value::Null).to_string()
}

#[must_use]
pub fn summarize_class(records: &[Value]) -> ClassAnalytics {
    let students: HashSet<String> = records.iter().map(|r| field_key(r, "studentId")).collect();
    let dates: HashSet<String> = records.iter().map(|r| field_key(r, "date")).collect();
    let present = records
        .iter()
        .filter(|r| r.get("status").and_then(Value::as_str) == Some("present"))
        .count();
    let average_attendance = if records.is_empty() {
        0.0
    } else {
        present as f64 / records.len() as f64 * 100.0
    };
    ClassAnalytics { total_students: students.len(), total_classes: dates.len(), average_attendance }
}

/// # Errors
///
/// `Store` on KV failure.
pub async fn student(state: &AppState, student_id: &str) -> Result<StudentAnalytics, ServiceError> {
    let scores = marks::for_student(state, student_id).await?;
    let attended = attendance::all(state)
        .await?
        .iter()
        .filter(|r| r.get("studentId").and_then(Value::as_str) == Some(student_id))
        .count();
    let certificates = certificate::for_student(state, student_id).await?;

    Ok(StudentAnalytics {
        total_marks: scores.len(),
        average_score: average_score(&scores),
        attendance_records: attended,
        certificates_earned: certificates.len(),
    })
}

/// # Errors
///
/// `Store` on KV failure.
pub async fn class(state: &AppState, class_id: &str) -> Result<ClassAnalytics, ServiceError> {
    Ok(summarize_class(&attendance::for_class(state, class_id).await?))
}

#[cfg(test)]
#[path = "analytics_test.rs"]
mod tests;
