use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A multiple-choice question. `position` is assigned once at creation time
/// (current question count + 1) and is never renumbered when siblings are
/// deleted, so gaps are expected.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub exam_title: String,
    pub prompt: String,
    pub options: Json<Vec<String>>,
    pub correct_option: i32,
    pub position: i32,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const OPTION_COUNT: usize = 4;
