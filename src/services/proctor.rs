//! Tab-switch proctoring.
//!
//! DESIGN
//! ======
//! `TabSwitchMonitor` is a plain threshold counter: every loss of focus
//! during an active exam counts, counts below the limit are warnings, and
//! reaching the limit auto-submits and stops the monitor. It is a deterrent,
//! not a security control; the client reports its own focus changes.
//!
//! One monitor is persisted per exam and student at `proctor:{examId}:{studentId}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ServiceError, exam, notification};
use crate::auth::Identity;
use crate::clock;
use crate::kv::{KvStoreExt, keys};
use crate::state::AppState;

pub const DEFAULT_TAB_SWITCH_LIMIT: u32 = 3;

// =============================================================================
// MONITOR
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ProctorVerdict {
    /// No exam in progress.
    Ignored,
    Warning { count: u32, limit: u32 },
    AutoSubmit { count: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSwitchMonitor {
    count: u32,
    limit: u32,
    active: bool,
}

impl Default for TabSwitchMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_SWITCH_LIMIT)
    }
}

impl TabSwitchMonitor {
    /// An inactive monitor. A limit of 0 is treated as 1.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self { count: 0, limit: limit.max(1), active: false }
    }

    pub fn start(&mut self) {
        self.count = 0;
        self.active = true;
    }

    pub fn record_focus_loss(&mut self) -> ProctorVerdict {
        if !self.active {
            return ProctorVerdict::Ignored;
        }
        self.count = self.count.saturating_add(1);
        if self.count < self.limit {
            ProctorVerdict::Warning { count: self.count, limit: self.limit }
        } else {
            self.active = false;
            ProctorVerdict::AutoSubmit { count: self.count }
        }
    }

    pub fn finish(&mut self) {
        self.active = false;
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

// =============================================================================
// PERSISTED SESSION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProctorSession {
    pub exam_id: String,
    pub student_id: String,
    #[serde(flatten)]
    pub monitor: TabSwitchMonitor,
    pub started_at: String,
    pub updated_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusLost {
    #[serde(default)]
    pub answers: Option<Value>,
    #[serde(default)]
    pub time_spent: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FocusOutcome {
    pub verdict: ProctorVerdict,
    pub session: ProctorSession,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<exam::Submission>,
}

/// (Re)start monitoring the caller on `exam_id`.
///
/// # Errors
///
/// `Store` on KV failure.
pub async fn start(state: &AppState, caller: &Identity, exam_id: &str) -> Result<ProctorSession, ServiceError> {
    let now = clock::now_iso();
    let mut monitor = TabSwitchMonitor::default();
    monitor.start();
    let session = ProctorSession {
        exam_id: exam_id.to_owned(),
        student_id: caller.id.clone(),
        monitor,
        started_at: now.clone(),
        updated_at: now,
    };
    state.kv.set_json(&keys::proctor(exam_id, &caller.id), &session).await?;
    tracing::info!(%exam_id, student_id = %caller.id, "proctoring started");
    Ok(session)
}

/// Count one loss of focus. Reaching the limit stores the caller's current
/// answers as an auto-submitted submission and alerts the exam creator.
///
/// # Errors
///
/// `Store` on KV failure. Creator notification failures are only logged.
pub async fn focus_lost(state: &AppState, caller: &Identity, exam_id: &str, req: FocusLost) -> Result<FocusOutcome, ServiceError> {
    let key = keys::proctor(exam_id, &caller.id);
    let Some(mut session) = state.kv.get_json::<ProctorSession>(&key).await? else {
        let now = clock::now_iso();
        let session = ProctorSession {
            exam_id: exam_id.to_owned(),
            student_id: caller.id.clone(),
            monitor: TabSwitchMonitor::default(),
            started_at: now.clone(),
            updated_at: now,
        };
        return Ok(FocusOutcome { verdict: ProctorVerdict::Ignored, session, submission: None });
    };

    let verdict = session.monitor.record_focus_loss();
    if verdict == ProctorVerdict::Ignored {
        return Ok(FocusOutcome { verdict, session, submission: None });
    }
    session.updated_at = clock::now_iso();
    state.kv.set_json(&key, &session).await?;

    let submission = match verdict {
        ProctorVerdict::AutoSubmit { count } => {
            let limit = session.monitor.limit();
            tracing::warn!(%exam_id, student_id = %caller.id, count, limit, "tab-switch limit reached, auto-submitting");
            let answers = req.answers.unwrap_or_else(|| Value::Object(Map::new()));
            let submission =
                exam::record_submission(state, exam_id, &caller.id, answers, req.time_spent, true, count).await?;
            notify_creator(state, caller, exam_id, count).await;
            Some(submission)
        }
        _ => None,
    };
    Ok(FocusOutcome { verdict, session, submission })
}

/// Stop monitoring. Returns the switch count when a session existed.
pub(crate) async fn finish(state: &AppState, exam_id: &str, student_id: &str) -> Result<Option<u32>, ServiceError> {
    let key = keys::proctor(exam_id, student_id);
    let Some(mut session) = state.kv.get_json::<ProctorSession>(&key).await? else {
        return Ok(None);
    };
    if session.monitor.is_active() {
        session.monitor.finish();
        session.updated_at = clock::now_iso();
        state.kv.set_json(&key, &session).await?;
    }
    Ok(Some(session.monitor.count()))
}

async fn notify_creator(state: &AppState, student: &Identity, exam_id: &str, count: u32) {
    let exam = match exam::find(state, exam_id).await {
        Ok(Some(exam)) => exam,
        Ok(None) => return,
        Err(e) => {
            tracing::error!(error = %e, %exam_id, "failed to load exam for proctoring alert");
            return;
        }
    };
    let Some(creator) = exam.get("createdBy").and_then(Value::as_str) else {
        tracing::warn!(%exam_id, "exam has no creator to alert");
        return;
    };
    let who = student.name.as_deref().unwrap_or(&student.id);
    let req = notification::SendNotification {
        recipient_id: Some(creator.to_owned()),
        title: Some("Exam auto-submitted".into()),
        message: Some(format!("{who} switched tabs {count} times during {exam_id}; the exam was auto-submitted.")),
        kind: Some("proctoring".into()),
        priority: Some("high".into()),
    };
    if let Err(e) = notification::send(state, &student.id, req).await {
        tracing::error!(error = %e, %exam_id, "failed to send proctoring alert");
    }
}

#[cfg(test)]
#[path = "proctor_test.rs"]
mod tests;
