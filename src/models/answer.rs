use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One stored answer, keyed by (registration_number, question_id).
/// `question_id` is always the normalized `"Q<n>"` form; `question_order`
/// is denormalized from the question so scoring can match without a join.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub registration_number: String,
    pub question_id: String,
    pub answer: Option<i32>,
    pub skipped: bool,
    pub question_order: i32,
    pub exam_name: String,
    pub source: String,
    pub saved_at: DateTime<Utc>,
}

/// Which submission path wrote an answer. Stored alongside the answer so a
/// later read can tell an early individual save from a timeout sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Individual,
    Completion,
    Timeout,
}

impl AnswerSource {
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerSource::Individual => "individual",
            AnswerSource::Completion => "completion",
            AnswerSource::Timeout => "timeout",
        }
    }
}
