use sqlx::PgPool;

use crate::dto::exam_dto::UpsertExamRequest;
use crate::error::{Error, Result};
use crate::models::exam::Exam;
use crate::utils::time::{parse_12h, today};

#[derive(Clone)]
pub struct ExamService {
    pool: PgPool,
}

impl ExamService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Admin upsert keyed by title. Start/end times must be 12-hour AM/PM
    /// strings. At most one exam may occupy a calendar date; the constraint
    /// is enforced here so date-based lookup stays unambiguous.
    pub async fn upsert_exam(&self, req: &UpsertExamRequest) -> Result<Exam> {
        parse_12h(&req.start_time)?;
        parse_12h(&req.end_time)?;

        let clash: Option<(String,)> = sqlx::query_as(
            r#"SELECT title FROM exams WHERE exam_date = $1 AND title <> $2"#,
        )
        .bind(req.exam_date)
        .bind(&req.title)
        .fetch_optional(&self.pool)
        .await?;
        if let Some((other,)) = clash {
            return Err(Error::Conflict(format!(
                "Exam '{}' is already scheduled on {}",
                other, req.exam_date
            )));
        }

        let exam = sqlx::query_as::<_, Exam>(
            r#"
            INSERT INTO exams (title, exam_date, start_time, end_time, total_marks, price)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (title) DO UPDATE SET
                exam_date = EXCLUDED.exam_date,
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time,
                total_marks = EXCLUDED.total_marks,
                price = EXCLUDED.price,
                updated_at = NOW()
            RETURNING title, exam_date, start_time, end_time, total_marks, price,
                      created_at, updated_at
            "#,
        )
        .bind(&req.title)
        .bind(req.exam_date)
        .bind(req.start_time.trim())
        .bind(req.end_time.trim())
        .bind(req.total_marks)
        .bind(req.price)
        .fetch_one(&self.pool)
        .await?;
        Ok(exam)
    }

    pub async fn get_exam(&self, title: &str) -> Result<Exam> {
        let exam = sqlx::query_as::<_, Exam>(
            r#"SELECT title, exam_date, start_time, end_time, total_marks, price,
                      created_at, updated_at
               FROM exams WHERE title = $1"#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Exam '{}' does not exist", title)))?;
        Ok(exam)
    }

    pub async fn list_exams(&self) -> Result<Vec<Exam>> {
        let exams = sqlx::query_as::<_, Exam>(
            r#"SELECT title, exam_date, start_time, end_time, total_marks, price,
                      created_at, updated_at
               FROM exams ORDER BY exam_date ASC, title ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(exams)
    }

    /// The exam scheduled for the server-local calendar date. Zero matches
    /// is NotFound; more than one (legacy rows predating the per-date
    /// uniqueness check) is a Conflict, never a silent first-encountered
    /// pick.
    pub async fn today_exam(&self) -> Result<Exam> {
        let mut matches = sqlx::query_as::<_, Exam>(
            r#"SELECT title, exam_date, start_time, end_time, total_marks, price,
                      created_at, updated_at
               FROM exams WHERE exam_date = $1 ORDER BY title ASC"#,
        )
        .bind(today())
        .fetch_all(&self.pool)
        .await?;

        match matches.len() {
            0 => Err(Error::NotFound("No exam is scheduled today".to_string())),
            1 => Ok(matches.remove(0)),
            n => Err(Error::Conflict(format!(
                "{} exams are scheduled today; date-based lookup is ambiguous",
                n
            ))),
        }
    }
}
