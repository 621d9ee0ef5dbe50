use chrono::Utc;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::candidate::Candidate;
use crate::models::result::ExamResult;
use crate::services::scoring_service::ScoreCard;

#[derive(Clone)]
pub struct ResultService {
    pool: PgPool,
}

impl ResultService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a score snapshot at (exam, candidate). Pure overwrite:
    /// recomputing replaces the prior snapshot, nothing accumulates.
    pub async fn materialize(
        &self,
        exam_title: &str,
        candidate: &Candidate,
        card: &ScoreCard,
    ) -> Result<ExamResult> {
        let row = sqlx::query_as::<_, ExamResult>(
            r#"
            INSERT INTO exam_results
                (exam_title, registration_number, candidate_name,
                 total, correct, skipped, wrong, computed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (exam_title, registration_number) DO UPDATE SET
                candidate_name = EXCLUDED.candidate_name,
                total = EXCLUDED.total,
                correct = EXCLUDED.correct,
                skipped = EXCLUDED.skipped,
                wrong = EXCLUDED.wrong,
                computed_at = EXCLUDED.computed_at
            RETURNING exam_title, registration_number, candidate_name,
                      total, correct, skipped, wrong, computed_at
            "#,
        )
        .bind(exam_title)
        .bind(&candidate.registration_number)
        .bind(&candidate.full_name)
        .bind(card.total)
        .bind(card.correct)
        .bind(card.skipped)
        .bind(card.wrong)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Every materialized result, ordered so the caller can group by exam
    /// without recomputing anything.
    pub async fn list_all(&self) -> Result<Vec<ExamResult>> {
        let rows = sqlx::query_as::<_, ExamResult>(
            r#"SELECT exam_title, registration_number, candidate_name,
                      total, correct, skipped, wrong, computed_at
               FROM exam_results
               ORDER BY exam_title ASC, registration_number ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
