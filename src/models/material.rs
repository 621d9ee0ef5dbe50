use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Study material published by an admin: an uploaded PDF/video or an
/// external link, optionally tied to one exam.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudyMaterial {
    pub id: Uuid,
    pub title: String,
    pub kind: String,
    pub file_path: Option<String>,
    pub link_url: Option<String>,
    pub exam_title: Option<String>,
    pub created_at: DateTime<Utc>,
}
