//! Marks recorded per student and subject.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ServiceError, key_segment, number, present};
use crate::auth::Identity;
use crate::clock;
use crate::kv::{KvStoreExt, keys};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarksRecord {
    pub student_id: String,
    pub subject: String,
    pub marks: f64,
    pub max_marks: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_type: Option<String>,
    pub added_by: String,
    pub date: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMarks {
    pub student_id: Option<String>,
    pub subject: Option<String>,
    pub marks: Option<f64>,
    pub max_marks: Option<f64>,
    pub exam_type: Option<String>,
}

/// # Errors
///
/// `Invalid` when student, subject, marks, or maxMarks is missing.
pub async fn add(state: &AppState, caller: &Identity, req: AddMarks) -> Result<MarksRecord, ServiceError> {
    let (Some(student_id), Some(subject), Some(marks), Some(max_marks)) =
        (present(req.student_id), present(req.subject), req.marks, req.max_marks)
    else {
        return Err(ServiceError::Invalid("studentId, subject, marks, and maxMarks are required".into()));
    };

    let student_id = key_segment("studentId", student_id)?;
    let record = MarksRecord {
        student_id,
        subject,
        marks,
        max_marks,
        exam_type: present(req.exam_type),
        added_by: caller.id.clone(),
        date: clock::now_iso(),
    };
    let key = keys::marks(&record.student_id, &record.subject, state.ids.next_millis());
    state.kv.set_json(&key, &record).await?;
    Ok(record)
}

/// Score of a stored record as a percentage. `None` when either number is
/// unreadable or `maxMarks` is not positive.
#[must_use]
pub fn percentage(record: &Value) -> Option<f64> {
    let marks = number(record.get("marks")?)?;
    let max = number(record.get("maxMarks")?)?;
    (max > 0.0).then(|| marks / max * 100.0)
}

/// Stored records for a student, as written.
///
/// # Errors
///
/// `Store` on KV failure.
pub async fn for_student(state: &AppState, student_id: &str) -> Result<Vec<Value>, ServiceError> {
    Ok(state.kv.get_by_prefix(&keys::marks_student_prefix(student_id)).await?)
}

#[cfg(test)]
#[path = "marks_test.rs"]
mod tests;
