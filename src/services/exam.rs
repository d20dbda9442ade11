//! Exams, submissions, and multiple-choice auto-grading.
//!
//! Exams are stored exactly as the client sent them, plus the server-owned
//! `id`, `createdBy`, and `createdAt`. Nothing else is validated. Grading
//! reads the `questions` list leniently and skips entries it cannot use.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ServiceError, number, proctor, strip_reserved};
use crate::auth::Identity;
use crate::clock;
use crate::kv::{KvStoreExt, keys};
use crate::state::AppState;

const RESERVED_FIELDS: &[&str] = &["id", "createdBy", "createdAt"];

// =============================================================================
// TYPES
// =============================================================================

/// Question ids arrive as numbers from the quiz UI but may be strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Mcq,
    Short,
    Long,
    #[serde(other)]
    Other,
}

/// The part of a stored question that grading needs. Everything else in
/// the question is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "type", default)]
    pub kind: Option<QuestionKind>,
    #[serde(default)]
    pub correct_answer: Option<Value>,
    #[serde(default)]
    pub marks: Option<Value>,
}

impl Question {
    /// Multiple choice with a known correct answer.
    #[must_use]
    pub fn is_gradable(&self) -> bool {
        self.kind == Some(QuestionKind::Mcq) && self.correct_answer.as_ref().and_then(answer_text).is_some()
    }

    /// Marks awarded for a correct answer; 0 when absent or unreadable.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.marks.as_ref().and_then(number).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub exam_id: String,
    pub student_id: String,
    pub answers: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<f64>,
    pub submitted_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_score_max: Option<f64>,
    #[serde(default)]
    pub auto_submitted: bool,
    #[serde(default)]
    pub tab_switches: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitExam {
    #[serde(default)]
    pub answers: Option<Value>,
    #[serde(default)]
    pub time_spent: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grade {
    pub score: f64,
    pub max: f64,
}

// =============================================================================
// GRADING
// =============================================================================

/// Answers and correct answers compare as trimmed text; numbers count as
/// their decimal form.
fn answer_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The answer given for `id`. Accepts an object keyed by question id
/// (`{"1": "2x"}`) or a list of `{questionId, answer}` entries.
#[must_use]
pub fn answer_for(answers: &Value, id: &QuestionId) -> Option<String> {
    match answers {
        Value::Object(map) => map.get(&id.to_string()).and_then(answer_text),
        Value::Array(entries) => entries.iter().find_map(|entry| {
            let matches = match entry.get("questionId")? {
                Value::Number(n) => matches!(id, QuestionId::Number(q) if n.as_i64() == Some(*q)),
                Value::String(s) => *s == id.to_string(),
                _ => false,
            };
            if matches { entry.get("answer").and_then(answer_text) } else { None }
        }),
        _ => None,
    }
}

/// Score the multiple-choice questions of a stored exam. Questions that do
/// not decode are skipped. `None` when nothing is gradable.
#[must_use]
pub fn grade(exam: &Value, answers: &Value) -> Option<Grade> {
    let gradable: Vec<Question> = exam
        .get("questions")
        .and_then(Value::as_array)?
        .iter()
        .filter_map(|q| Question::deserialize(q).ok())
        .filter(Question::is_gradable)
        .collect();
    if gradable.is_empty() {
        return None;
    }

    let mut result = Grade { score: 0.0, max: 0.0 };
    for question in &gradable {
        result.max += question.weight();
        let correct = question.correct_answer.as_ref().and_then(answer_text);
        if answer_for(answers, &question.id) == correct {
            result.score += question.weight();
        }
    }
    Some(result)
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Store caller-supplied exam data under a fresh id.
///
/// # Errors
///
/// `Store` on KV failure.
pub async fn create(state: &AppState, caller: &Identity, mut data: Map<String, Value>) -> Result<Value, ServiceError> {
    let millis = state.ids.next_millis();
    strip_reserved(&mut data, RESERVED_FIELDS);
    let key = keys::exam(millis);
    data.insert("id".into(), Value::String(key.clone()));
    data.insert("createdBy".into(), Value::String(caller.id.clone()));
    data.insert("createdAt".into(), Value::String(clock::now_iso()));

    let questions = data.get("questions").and_then(Value::as_array).map_or(0, Vec::len);
    let exam = Value::Object(data);
    state.kv.set(&key, exam.clone()).await?;
    tracing::info!(exam_id = %key, questions, "exam created");
    Ok(exam)
}

/// # Errors
///
/// `Store` on KV failure.
pub async fn list(state: &AppState) -> Result<Vec<Value>, ServiceError> {
    Ok(state.kv.get_by_prefix(keys::EXAM_PREFIX).await?)
}

/// # Errors
///
/// `Store` on KV failure.
pub async fn find(state: &AppState, exam_id: &str) -> Result<Option<Value>, ServiceError> {
    if !exam_id.starts_with(keys::EXAM_PREFIX) {
        return Ok(None);
    }
    Ok(state.kv.get(exam_id).await?)
}

/// Submit answers for the caller and close any open proctoring session.
///
/// # Errors
///
/// `Store` on KV failure.
pub async fn submit(state: &AppState, caller: &Identity, exam_id: &str, req: SubmitExam) -> Result<Submission, ServiceError> {
    let tab_switches = proctor::finish(state, exam_id, &caller.id).await?.unwrap_or(0);
    let answers = req.answers.unwrap_or_else(|| Value::Object(Map::new()));
    record_submission(state, exam_id, &caller.id, answers, req.time_spent, false, tab_switches).await
}

/// Grade (when the exam is known) and overwrite the student's submission.
pub(crate) async fn record_submission(
    state: &AppState,
    exam_id: &str,
    student_id: &str,
    answers: Value,
    time_spent: Option<f64>,
    auto_submitted: bool,
    tab_switches: u32,
) -> Result<Submission, ServiceError> {
    let scored = find(state, exam_id).await?.and_then(|exam| grade(&exam, &answers));
    let submission = Submission {
        exam_id: exam_id.to_owned(),
        student_id: student_id.to_owned(),
        answers,
        time_spent,
        submitted_at: clock::now_iso(),
        auto_score: scored.map(|g| g.score),
        auto_score_max: scored.map(|g| g.max),
        auto_submitted,
        tab_switches,
    };
    state.kv.set_json(&keys::submission(exam_id, student_id), &submission).await?;
    tracing::info!(%exam_id, %student_id, auto_submitted, "submission recorded");
    Ok(submission)
}

/// The stored submission as written.
///
/// # Errors
///
/// `Store` on KV failure.
pub async fn result(state: &AppState, exam_id: &str, student_id: &str) -> Result<Option<Value>, ServiceError> {
    Ok(state.kv.get(&keys::submission(exam_id, student_id)).await?)
}

#[cfg(test)]
#[path = "exam_test.rs"]
mod tests;
