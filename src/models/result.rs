use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Materialized score snapshot for one (exam, candidate) pair. Recomputing
/// overwrites the previous snapshot in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub exam_title: String,
    pub registration_number: String,
    pub candidate_name: String,
    pub total: i32,
    pub correct: i32,
    pub skipped: i32,
    pub wrong: i32,
    pub computed_at: DateTime<Utc>,
}
