//! Lab completion certificates.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ServiceError, key_segment, present};
use crate::auth::Identity;
use crate::clock;
use crate::kv::{KvStoreExt, keys};
use crate::state::AppState;

const NUMBER_PREFIX: &str = "RESOVISTA-";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub student_id: String,
    pub lab_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    pub issued_by: String,
    pub issued_at: String,
    pub certificate_number: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCertificate {
    pub student_id: Option<String>,
    pub lab_name: Option<String>,
    pub score: Option<f64>,
    pub completion_date: Option<String>,
}

/// # Errors
///
/// `Invalid` when student or lab name is missing.
pub async fn issue(state: &AppState, caller: &Identity, req: IssueCertificate) -> Result<Certificate, ServiceError> {
    let (Some(student_id), Some(lab_name)) = (present(req.student_id), present(req.lab_name)) else {
        return Err(ServiceError::Invalid("studentId and labName are required".into()));
    };

    let student_id = key_segment("studentId", student_id)?;
    let millis = state.ids.next_millis();
    let key = keys::certificate(&student_id, millis);
    let certificate = Certificate {
        id: key.clone(),
        student_id,
        lab_name,
        score: req.score,
        completion_date: present(req.completion_date),
        issued_by: caller.id.clone(),
        issued_at: clock::now_iso(),
        certificate_number: format!("{NUMBER_PREFIX}{millis}"),
    };
    state.kv.set_json(&key, &certificate).await?;
    Ok(certificate)
}

/// # Errors
///
/// `Store` on KV failure.
pub async fn for_student(state: &AppState, student_id: &str) -> Result<Vec<Value>, ServiceError> {
    Ok(state.kv.get_by_prefix(&keys::certificate_student_prefix(student_id)).await?)
}

#[cfg(test)]
#[path = "certificate_test.rs"]
mod tests;
