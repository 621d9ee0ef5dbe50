use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::candidate::Candidate;
use crate::utils::time::today;
use crate::utils::token::generate_registration_number;

#[derive(Clone)]
pub struct CandidateService {
    pool: PgPool,
}

#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub exam_title: String,
    pub photo_url: Option<String>,
}

impl CandidateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, new: NewCandidate) -> Result<Candidate> {
        let exam_exists: Option<(String,)> =
            sqlx::query_as(r#"SELECT title FROM exams WHERE title = $1"#)
                .bind(&new.exam_title)
                .fetch_optional(&self.pool)
                .await?;
        if exam_exists.is_none() {
            return Err(Error::NotFound(format!(
                "Exam '{}' does not exist",
                new.exam_title
            )));
        }

        let registration_number = generate_registration_number();
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"
            INSERT INTO candidates
                (registration_number, full_name, email, phone, date_of_birth,
                 gender, address, exam_title, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING registration_number, full_name, email, phone, date_of_birth,
                      gender, address, exam_title, photo_url, used, submitted,
                      submitted_at, created_at
            "#,
        )
        .bind(&registration_number)
        .bind(&new.full_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.date_of_birth)
        .bind(&new.gender)
        .bind(&new.address)
        .bind(&new.exam_title)
        .bind(&new.photo_url)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            registration_number = %candidate.registration_number,
            exam = %candidate.exam_title,
            "Candidate registered"
        );
        Ok(candidate)
    }

    pub async fn get(&self, registration_number: &str) -> Result<Candidate> {
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"SELECT registration_number, full_name, email, phone, date_of_birth,
                      gender, address, exam_title, photo_url, used, submitted,
                      submitted_at, created_at
               FROM candidates WHERE registration_number = $1"#,
        )
        .bind(registration_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "Candidate '{}' is not registered",
                registration_number
            ))
        })?;
        Ok(candidate)
    }

    pub async fn list_for_exam(&self, exam_title: &str) -> Result<Vec<Candidate>> {
        let rows = sqlx::query_as::<_, Candidate>(
            r#"SELECT registration_number, full_name, email, phone, date_of_birth,
                      gender, address, exam_title, photo_url, used, submitted,
                      submitted_at, created_at
               FROM candidates WHERE exam_title = $1
               ORDER BY registration_number ASC"#,
        )
        .bind(exam_title)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// A registration opens a session at most once: `used` flips on the
    /// first start and gates every later attempt. Starts before the exam's
    /// scheduled date are rejected outright.
    pub async fn start_session(&self, registration_number: &str) -> Result<Candidate> {
        let candidate = self.get(registration_number).await?;
        if candidate.used {
            return Err(Error::Conflict(format!(
                "Registration '{}' has already been used to start this exam",
                registration_number
            )));
        }

        let exam_date: Option<(chrono::NaiveDate,)> =
            sqlx::query_as(r#"SELECT exam_date FROM exams WHERE title = $1"#)
                .bind(&candidate.exam_title)
                .fetch_optional(&self.pool)
                .await?;
        let exam_date = exam_date
            .map(|(d,)| d)
            .ok_or_else(|| Error::NotFound(format!("Exam '{}' does not exist", candidate.exam_title)))?;

        if today() < exam_date {
            return Err(Error::Conflict(format!(
                "Exam '{}' is scheduled for {}; it cannot be started earlier",
                candidate.exam_title, exam_date
            )));
        }

        let updated = sqlx::query_as::<_, Candidate>(
            r#"UPDATE candidates SET used = TRUE WHERE registration_number = $1
               RETURNING registration_number, full_name, email, phone, date_of_birth,
                         gender, address, exam_title, photo_url, used, submitted,
                         submitted_at, created_at"#,
        )
        .bind(registration_number)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            registration_number = %registration_number,
            exam = %updated.exam_title,
            at = %Utc::now(),
            "Exam session started"
        );
        Ok(updated)
    }
}
