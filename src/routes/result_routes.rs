use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};

use crate::dto::result_dto::{
    AllResultsResponse, ExamResultGroup, ResultsMeta, TodayResultsResponse,
};
use crate::error::Result;
use crate::AppState;

/// Score every candidate registered for today's exam and materialize each
/// snapshot. Candidates are processed one by one; a failure on one is
/// recorded and the rest continue, so the response always says exactly who
/// was scored and who was not.
#[axum::debug_handler]
pub async fn today_exam_results(State(state): State<AppState>) -> Result<Response> {
    let exam = state.exam_service.today_exam().await?;
    let candidates = state.candidate_service.list_for_exam(&exam.title).await?;

    let mut results = Vec::with_capacity(candidates.len());
    let mut failed = Vec::new();
    for candidate in &candidates {
        let scored = match state
            .scoring_service
            .score_candidate(&exam.title, &candidate.registration_number)
            .await
        {
            Ok(card) => {
                state
                    .result_service
                    .materialize(&exam.title, candidate, &card)
                    .await
            }
            Err(e) => Err(e),
        };
        match scored {
            Ok(row) => results.push(row),
            Err(e) => {
                tracing::error!(
                    registration_number = %candidate.registration_number,
                    error = %e,
                    "Failed to score candidate"
                );
                failed.push(candidate.registration_number.clone());
            }
        }
    }

    tracing::info!(
        exam = %exam.title,
        succeeded = results.len(),
        failed = failed.len(),
        "Scored today's exam"
    );
    Ok(Json(TodayResultsResponse {
        success: true,
        exam: exam.title,
        succeeded: results.len(),
        results,
        failed,
    })
    .into_response())
}

/// Pure reshape of the materialized results, grouped per exam. Nothing is
/// recomputed here.
#[axum::debug_handler]
pub async fn all_exam_results(State(state): State<AppState>) -> Result<Response> {
    let rows = state.result_service.list_all().await?;

    let total_candidates = rows.len();
    let mut groups: Vec<ExamResultGroup> = Vec::new();
    for row in rows {
        match groups.last_mut() {
            Some(group) if group.exam_id == row.exam_title => group.results.push(row),
            _ => groups.push(ExamResultGroup {
                exam_id: row.exam_title.clone(),
                results: vec![row],
            }),
        }
    }

    Ok(Json(AllResultsResponse {
        success: true,
        meta: ResultsMeta {
            total_exams: groups.len(),
            total_candidates,
        },
        exams: groups,
    })
    .into_response())
}
