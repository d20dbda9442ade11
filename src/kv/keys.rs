//! Key construction. Record identity lives entirely in these strings.
//!
//! Every prefix helper ends with `:` so that scanning `marks:s1:` never
//! picks up `marks:s10:...`.

#[must_use]
pub fn user(user_id: &str) -> String {
    format!("user:{user_id}")
}

#[must_use]
pub fn attendance(class_id: &str, student_id: &str, date: &str) -> String {
    format!("attendance:{class_id}:{student_id}:{date}")
}

#[must_use]
pub fn attendance_class_prefix(class_id: &str) -> String {
    format!("attendance:{class_id}:")
}

pub const ATTENDANCE_PREFIX: &str = "attendance:";

#[must_use]
pub fn exam(millis: i64) -> String {
    format!("exam:{millis}")
}

pub const EXAM_PREFIX: &str = "exam:";

#[must_use]
pub fn submission(exam_id: &str, student_id: &str) -> String {
    format!("submission:{exam_id}:{student_id}")
}

#[must_use]
pub fn proctor(exam_id: &str, student_id: &str) -> String {
    format!("proctor:{exam_id}:{student_id}")
}

#[must_use]
pub fn marks(student_id: &str, subject: &str, millis: i64) -> String {
    format!("marks:{student_id}:{subject}:{millis}")
}

#[must_use]
pub fn marks_student_prefix(student_id: &str) -> String {
    format!("marks:{student_id}:")
}

#[must_use]
pub fn todo(user_id: &str, millis: i64) -> String {
    format!("todo:{user_id}:{millis}")
}

#[must_use]
pub fn todo_user_prefix(user_id: &str) -> String {
    format!("todo:{user_id}:")
}

#[must_use]
pub fn notification(recipient_id: &str, millis: i64) -> String {
    format!("notification:{recipient_id}:{millis}")
}

#[must_use]
pub fn notification_recipient_prefix(recipient_id: &str) -> String {
    format!("notification:{recipient_id}:")
}

#[must_use]
pub fn feedback(millis: i64) -> String {
    format!("feedback:{millis}")
}

pub const FEEDBACK_PREFIX: &str = "feedback:";

#[must_use]
pub fn certificate(student_id: &str, millis: i64) -> String {
    format!("certificate:{student_id}:{millis}")
}

#[must_use]
pub fn certificate_student_prefix(student_id: &str) -> String {
    format!("certificate:{student_id}:")
}

#[must_use]
pub fn message(millis: i64) -> String {
    format!("message:{millis}")
}

/// Conversation copy of a message as seen by `owner`.
#[must_use]
pub fn chat(owner_id: &str, other_id: &str, message_id: &str) -> String {
    format!("chat:{owner_id}:{other_id}:{message_id}")
}

#[must_use]
pub fn chat_conversation_prefix(owner_id: &str, other_id: &str) -> String {
    format!("chat:{owner_id}:{other_id}:")
}

#[must_use]
pub fn document(user_id: &str, millis: i64) -> String {
    format!("document:{user_id}:{millis}")
}

#[must_use]
pub fn document_user_prefix(user_id: &str) -> String {
    format!("document:{user_id}:")
}

/// Local identity provider: account by normalized email.
#[must_use]
pub fn auth_account(email: &str) -> String {
    format!("auth:account:{email}")
}

/// Local identity provider: session by token.
#[must_use]
pub fn auth_session(token: &str) -> String {
    format!("auth:session:{token}")
}

#[cfg(test)]
#[path = "keys_test.rs"]
mod tests;
