use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::exam_dto::{
    CreateQuestionRequest, PublicQuestion, QuestionCreatedResponse, UpsertExamRequest,
};
use crate::error::Result;
use crate::AppState;

#[axum::debug_handler]
pub async fn upsert_exam(
    State(state): State<AppState>,
    Json(req): Json<UpsertExamRequest>,
) -> Result<Response> {
    req.validate()?;
    let exam = state.exam_service.upsert_exam(&req).await?;
    tracing::info!(title = %exam.title, date = %exam.exam_date, "Exam upserted");
    Ok(Json(json!({ "success": true, "exam": exam })).into_response())
}

#[axum::debug_handler]
pub async fn list_exams(State(state): State<AppState>) -> Result<Response> {
    let exams = state.exam_service.list_exams().await?;
    Ok(Json(json!({ "success": true, "exams": exams })).into_response())
}

#[axum::debug_handler]
pub async fn today_exam(State(state): State<AppState>) -> Result<Response> {
    let exam = state.exam_service.today_exam().await?;
    Ok(Json(json!({ "success": true, "exam": exam })).into_response())
}

#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Path(title): Path<String>,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<Response> {
    req.validate()?;
    state.exam_service.get_exam(&title).await?;
    let question = state.question_service.create_question(&title, &req).await?;
    tracing::info!(exam = %title, position = question.position, "Question created");
    Ok(Json(QuestionCreatedResponse {
        success: true,
        id: question.id,
        position: question.position,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<Response> {
    req.validate()?;
    let question = state.question_service.update_question(id, &req).await?;
    Ok(Json(json!({ "success": true, "question": question })).into_response())
}

#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    state.question_service.delete_question(id).await?;
    tracing::info!(question_id = %id, "Question deleted");
    Ok(Json(json!({ "success": true })).into_response())
}

/// Admin view: full rows including the correct index.
#[axum::debug_handler]
pub async fn list_questions(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Response> {
    state.exam_service.get_exam(&title).await?;
    let questions = state.question_service.questions_for_exam(&title).await?;
    Ok(Json(json!({ "success": true, "questions": questions })).into_response())
}

/// Candidate view: correct indices stripped.
#[axum::debug_handler]
pub async fn public_questions(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Response> {
    state.exam_service.get_exam(&title).await?;
    let questions: Vec<PublicQuestion> = state
        .question_service
        .questions_for_exam(&title)
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();
    Ok(Json(json!({ "success": true, "questions": questions })).into_response())
}
