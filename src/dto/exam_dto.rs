use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::question::Question;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertExamRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub exam_date: chrono::NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[validate(range(min = 0))]
    pub total_marks: i32,
    #[validate(range(min = 0))]
    pub price: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1))]
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: i32,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCreatedResponse {
    pub success: bool,
    pub id: Uuid,
    pub position: i32,
}

/// Question as candidates see it: correct index stripped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: Uuid,
    pub prompt: String,
    pub options: Vec<String>,
    pub position: i32,
    pub image_url: Option<String>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            prompt: q.prompt,
            options: q.options.0,
            position: q.position,
            image_url: q.image_url,
        }
    }
}
