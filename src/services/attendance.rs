//! Attendance marking, one record per class, student, and date.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ServiceError, key_segment, present};
use crate::auth::Identity;
use crate::clock;
use crate::kv::{KvStoreExt, keys};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            "late" => Some(Self::Late),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub class_id: String,
    pub student_id: String,
    pub status: AttendanceStatus,
    pub date: String,
    pub marked_by: String,
    pub timestamp: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendance {
    pub class_id: Option<String>,
    pub student_id: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
}

/// Overwrite the record for (class, student, date).
///
/// # Errors
///
/// `Invalid` for missing fields or an unknown status.
pub async fn mark(state: &AppState, caller: &Identity, req: MarkAttendance) -> Result<AttendanceRecord, ServiceError> {
    let (Some(class_id), Some(student_id), Some(status), Some(date)) =
        (present(req.class_id), present(req.student_id), present(req.status), present(req.date))
    else {
        return Err(ServiceError::Invalid("classId, studentId, status, and date are required".into()));
    };
    let class_id = key_segment("classId", class_id)?;
    let student_id = key_segment("studentId", student_id)?;
    let status = AttendanceStatus::parse(&status)
        .ok_or_else(|| ServiceError::Invalid("Status must be one of present, absent, late".into()))?;

    let record = AttendanceRecord {
        class_id,
        student_id,
        status,
        date,
        marked_by: caller.id.clone(),
        timestamp: clock::now_iso(),
    };
    state
        .kv
        .set_json(&keys::attendance(&record.class_id, &record.student_id, &record.date), &record)
        .await?;
    Ok(record)
}

/// Every stored record for a class, ordered by student then date. Records
/// are returned as stored, including ones written before status checks.
///
/// # Errors
///
/// `Store` on KV failure.
pub async fn for_class(state: &AppState, class_id: &str) -> Result<Vec<Value>, ServiceError> {
    Ok(state.kv.get_by_prefix(&keys::attendance_class_prefix(class_id)).await?)
}

/// Every attendance record in the store. Used by student analytics.
///
/// # Errors
///
/// `Store` on KV failure.
pub async fn all(state: &AppState) -> Result<Vec<Value>, ServiceError> {
    Ok(state.kv.get_by_prefix(keys::ATTENDANCE_PREFIX).await?)
}

#[cfg(test)]
#[path = "attendance_test.rs"]
mod tests;
