use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};

use crate::dto::answer_dto::{
    AnswerPayload, BulkSaveResponse, CompleteExamRequest, CompleteExamResponse,
    SaveAllAnswersRequest, SaveAnswerResponse,
};
use crate::dto::result_dto::CandidateAnswersResponse;
use crate::error::{Error, Result};
use crate::models::answer::AnswerSource;
use crate::services::answer_service::{normalize, parse_batch};
use crate::AppState;

#[axum::debug_handler]
pub async fn save_answer(
    State(state): State<AppState>,
    Json(payload): Json<AnswerPayload>,
) -> Result<Response> {
    let normalized = normalize(&payload)?;
    let timestamp = state
        .answer_service
        .save_one(&normalized, AnswerSource::Individual)
        .await?;
    tracing::info!(
        registration_number = %normalized.registration_number,
        question_id = %normalized.question_id,
        "Answer saved"
    );
    Ok(Json(SaveAnswerResponse {
        success: true,
        question_id: normalized.question_id,
        timestamp,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn save_all_answers(
    State(state): State<AppState>,
    Json(req): Json<SaveAllAnswersRequest>,
) -> Result<Response> {
    let batch = parse_batch(&req.answers)?;
    if batch.is_empty() {
        return Err(Error::InvalidFormat("answers must not be empty".to_string()));
    }
    let saved = state
        .answer_service
        .ingest_batch(batch, AnswerSource::Individual)
        .await?;
    tracing::info!(saved, "Bulk answer save completed");
    Ok(Json(BulkSaveResponse { success: true, saved }).into_response())
}

/// Exam-clock expiry sweep. Only attempted entries survive the pre-filter;
/// an all-skipped batch is a successful no-op.
#[axum::debug_handler]
pub async fn timeout_save_answers(
    State(state): State<AppState>,
    Json(req): Json<SaveAllAnswersRequest>,
) -> Result<Response> {
    let batch = parse_batch(&req.answers)?;
    let saved = state
        .answer_service
        .ingest_batch(batch, AnswerSource::Timeout)
        .await?;
    tracing::info!(saved, "Timeout answer sweep completed");
    Ok(Json(BulkSaveResponse { success: true, saved }).into_response())
}

#[axum::debug_handler]
pub async fn complete_exam(
    State(state): State<AppState>,
    Json(req): Json<CompleteExamRequest>,
) -> Result<Response> {
    let registration_number = req
        .registration_number
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::MissingField("registrationNumber".to_string()))?
        .to_string();
    let exam_name = req
        .exam_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::MissingField("examName".to_string()))?
        .to_string();
    let batch = parse_batch(&req.answers)?;

    let (saved, submitted_at) = state
        .answer_service
        .complete_exam(&registration_number, batch)
        .await?;
    tracing::info!(
        registration_number = %registration_number,
        exam = %exam_name,
        saved,
        "Exam completed"
    );
    Ok(Json(CompleteExamResponse {
        success: true,
        registration_number,
        saved,
        submitted_at,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn candidate_answers(
    State(state): State<AppState>,
    Path(registration_id): Path<String>,
) -> Result<Response> {
    let answers = state
        .answer_service
        .answers_for_candidate(&registration_id)
        .await?;
    Ok(Json(CandidateAnswersResponse {
        success: true,
        registration_number: registration_id,
        count: answers.len(),
        answers,
    })
    .into_response())
}
