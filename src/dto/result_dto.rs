use serde::Serialize;

use crate::models::answer::Answer;
use crate::models::result::ExamResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayResultsResponse {
    pub success: bool,
    pub exam: String,
    pub results: Vec<ExamResult>,
    pub succeeded: usize,
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsMeta {
    pub total_exams: usize,
    pub total_candidates: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResultGroup {
    pub exam_id: String,
    pub results: Vec<ExamResult>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllResultsResponse {
    pub success: bool,
    pub meta: ResultsMeta,
    pub exams: Vec<ExamResultGroup>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAnswersResponse {
    pub success: bool,
    pub registration_number: String,
    pub count: usize,
    pub answers: Vec<Answer>,
}
