use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCandidateResponse {
    pub success: bool,
    pub registration_number: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartExamResponse {
    pub success: bool,
    pub registration_number: String,
    pub exam_title: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
}
