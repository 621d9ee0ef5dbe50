use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::dto::answer_dto::AnswerPayload;
use crate::error::{Error, Result};
use crate::models::answer::{Answer, AnswerSource};

const QUESTION_MARKER: char = 'Q';

/// Unified ingestion for all four submission paths. Each path is the same
/// pipeline — parse, optional pre-filter, normalize, upsert — differing only
/// in the provenance tag and the filter.
#[derive(Clone)]
pub struct AnswerService {
    pool: PgPool,
}

/// A payload that passed validation and coercion, ready to upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAnswer {
    pub registration_number: String,
    pub question_id: String,
    pub answer: Option<i32>,
    pub skipped: bool,
    pub question_order: i32,
    pub exam_name: String,
}

/// Raw question ids arrive both as "5" and as "Q5"; both must land in the
/// same stored slot, so the marker is prepended only when absent.
pub fn normalize_question_id(raw: &str) -> String {
    if raw.starts_with(QUESTION_MARKER) {
        raw.to_string()
    } else {
        format!("{}{}", QUESTION_MARKER, raw)
    }
}

/// Timeout sweeps persist only what was actually attempted: no skip records,
/// no null answers.
pub fn is_attempted(payload: &AnswerPayload) -> bool {
    if payload.skipped.unwrap_or(false) {
        return false;
    }
    matches!(payload.answer, Some(ref v) if !v.is_null())
}

pub fn parse_batch(raw: &JsonValue) -> Result<Vec<AnswerPayload>> {
    let entries = raw
        .as_array()
        .ok_or_else(|| Error::InvalidFormat("answers must be an array".to_string()))?;
    entries
        .iter()
        .map(|entry| {
            serde_json::from_value(entry.clone())
                .map_err(|e| Error::InvalidFormat(format!("answer entry: {}", e)))
        })
        .collect()
}

pub fn normalize(payload: &AnswerPayload) -> Result<NormalizedAnswer> {
    let registration_number = require(&payload.registration_number, "registrationNumber")?;
    let question_id = require(&payload.question_id, "questionId")?;
    let exam_name = require(&payload.exam_name, "examName")?;

    // Present-or-absent is the test here, not truthiness: an explicit null
    // (skip) and an index of 0 are both valid values.
    let raw_answer = payload
        .answer
        .as_ref()
        .ok_or_else(|| Error::MissingField("answer".to_string()))?;

    let skipped = payload.skipped.unwrap_or(false);
    let answer = if skipped {
        None
    } else {
        Some(coerce_option_index(raw_answer)?)
    };

    Ok(NormalizedAnswer {
        registration_number,
        question_id: normalize_question_id(&question_id),
        answer,
        skipped,
        question_order: payload.order.unwrap_or(0),
        exam_name,
    })
}

fn require(field: &Option<String>, name: &str) -> Result<String> {
    field
        .as_ref()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::MissingField(name.to_string()))
}

fn coerce_option_index(value: &JsonValue) -> Result<i32> {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .map(|i| i as i32)
            .ok_or_else(|| Error::InvalidFormat(format!("answer index '{}' is not an integer", n))),
        JsonValue::String(s) => s
            .trim()
            .parse::<i32>()
            .map_err(|_| Error::InvalidFormat(format!("answer index '{}' is not an integer", s))),
        other => Err(Error::InvalidFormat(format!(
            "answer must be an option index, got {}",
            other
        ))),
    }
}

impl AnswerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert a single normalized answer. Last write wins unconditionally:
    /// no read-before-write, no provenance precedence.
    pub async fn save_one(
        &self,
        normalized: &NormalizedAnswer,
        source: AnswerSource,
    ) -> Result<DateTime<Utc>> {
        let timestamp = Utc::now();
        upsert_answer(&self.pool, normalized, source, timestamp).await?;
        Ok(timestamp)
    }

    /// Save a batch sequentially. Validation for the whole batch happens
    /// before the first write, so a malformed entry short-circuits with no
    /// side effects. The Timeout path drops unattempted entries first.
    pub async fn ingest_batch(
        &self,
        payloads: Vec<AnswerPayload>,
        source: AnswerSource,
    ) -> Result<usize> {
        let payloads: Vec<AnswerPayload> = match source {
            AnswerSource::Timeout => payloads.into_iter().filter(is_attempted).collect(),
            _ => payloads,
        };
        let normalized: Vec<NormalizedAnswer> =
            payloads.iter().map(normalize).collect::<Result<_>>()?;

        for entry in &normalized {
            upsert_answer(&self.pool, entry, source, Utc::now()).await?;
        }
        Ok(normalized.len())
    }

    /// Final submission: the submitted flag on the candidate and every
    /// answer write commit together or not at all.
    pub async fn complete_exam(
        &self,
        registration_number: &str,
        payloads: Vec<AnswerPayload>,
    ) -> Result<(usize, DateTime<Utc>)> {
        let normalized: Vec<NormalizedAnswer> =
            payloads.iter().map(normalize).collect::<Result<_>>()?;

        let submitted_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        let updated: Option<(String,)> = sqlx::query_as(
            r#"UPDATE candidates SET submitted = TRUE, submitted_at = $1
               WHERE registration_number = $2
               RETURNING registration_number"#,
        )
        .bind(submitted_at)
        .bind(registration_number)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(Error::NotFound(format!(
                "Candidate '{}' is not registered",
                registration_number
            )));
        }

        for entry in &normalized {
            sqlx::query(UPSERT_ANSWER_SQL)
                .bind(&entry.registration_number)
                .bind(&entry.question_id)
                .bind(entry.answer)
                .bind(entry.skipped)
                .bind(entry.question_order)
                .bind(&entry.exam_name)
                .bind(AnswerSource::Completion.as_str())
                .bind(submitted_at)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok((normalized.len(), submitted_at))
    }

    pub async fn answers_for_candidate(&self, registration_number: &str) -> Result<Vec<Answer>> {
        let rows = sqlx::query_as::<_, Answer>(
            r#"SELECT registration_number, question_id, answer, skipped,
                      question_order, exam_name, source, saved_at
               FROM answers
               WHERE registration_number = $1
               ORDER BY question_order ASC, question_id ASC"#,
        )
        .bind(registration_number)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

const UPSERT_ANSWER_SQL: &str = r#"
INSERT INTO answers
    (registration_number, question_id, answer, skipped, question_order, exam_name, source, saved_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
ON CONFLICT (registration_number, question_id) DO UPDATE SET
    answer = EXCLUDED.answer,
    skipped = EXCLUDED.skipped,
    question_order = EXCLUDED.question_order,
    exam_name = EXCLUDED.exam_name,
    source = EXCLUDED.source,
    saved_at = EXCLUDED.saved_at
"#;

async fn upsert_answer(
    pool: &PgPool,
    entry: &NormalizedAnswer,
    source: AnswerSource,
    timestamp: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(UPSERT_ANSWER_SQL)
        .bind(&entry.registration_number)
        .bind(&entry.question_id)
        .bind(entry.answer)
        .bind(entry.skipped)
        .bind(entry.question_order)
        .bind(&entry.exam_name)
        .bind(source.as_str())
        .bind(timestamp)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(v: serde_json::Value) -> AnswerPayload {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn question_marker_added_only_when_absent() {
        assert_eq!(normalize_question_id("5"), "Q5");
        assert_eq!(normalize_question_id("Q5"), "Q5");
        assert_eq!(normalize_question_id(normalize_question_id("5").as_str()), "Q5");
    }

    #[test]
    fn bare_and_prefixed_ids_land_in_the_same_slot() {
        let a = normalize(&payload(json!({
            "registrationNumber": "REG1", "questionId": "5",
            "answer": 2, "examName": "Math101", "order": 5
        })))
        .unwrap();
        let b = normalize(&payload(json!({
            "registrationNumber": "REG1", "questionId": "Q5",
            "answer": 3, "examName": "Math101", "order": 5
        })))
        .unwrap();
        assert_eq!(a.question_id, b.question_id);
    }

    #[test]
    fn missing_fields_are_named() {
        let err = normalize(&payload(json!({
            "questionId": "1", "answer": 1, "examName": "Math101"
        })))
        .unwrap_err();
        assert!(matches!(err, Error::MissingField(f) if f == "registrationNumber"));

        let err = normalize(&payload(json!({
            "registrationNumber": "REG1", "questionId": "1", "examName": "Math101"
        })))
        .unwrap_err();
        assert!(matches!(err, Error::MissingField(f) if f == "answer"));
    }

    #[test]
    fn answer_index_zero_is_accepted() {
        let n = normalize(&payload(json!({
            "registrationNumber": "REG1", "questionId": "1",
            "answer": 0, "examName": "Math101", "order": 1
        })))
        .unwrap();
        assert_eq!(n.answer, Some(0));
        assert!(!n.skipped);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let n = normalize(&payload(json!({
            "registrationNumber": "REG1", "questionId": "2",
            "answer": "3", "examName": "Math101", "order": 2
        })))
        .unwrap();
        assert_eq!(n.answer, Some(3));
    }

    #[test]
    fn skipped_entries_store_null() {
        let n = normalize(&payload(json!({
            "registrationNumber": "REG1", "questionId": "3",
            "answer": null, "skipped": true, "examName": "Math101", "order": 3
        })))
        .unwrap();
        assert_eq!(n.answer, None);
        assert!(n.skipped);
    }

    #[test]
    fn unskipped_null_answer_is_rejected() {
        let err = normalize(&payload(json!({
            "registrationNumber": "REG1", "questionId": "3",
            "answer": null, "examName": "Math101"
        })))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn timeout_filter_keeps_only_attempted() {
        let batch = vec![
            payload(json!({"registrationNumber": "R", "questionId": "1", "answer": 1, "examName": "E", "order": 1})),
            payload(json!({"registrationNumber": "R", "questionId": "2", "answer": null, "skipped": true, "examName": "E", "order": 2})),
            payload(json!({"registrationNumber": "R", "questionId": "3", "answer": null, "examName": "E", "order": 3})),
            payload(json!({"registrationNumber": "R", "questionId": "4", "answer": 0, "examName": "E", "order": 4})),
        ];
        let attempted: Vec<_> = batch.into_iter().filter(is_attempted).collect();
        assert_eq!(attempted.len(), 2);
        assert_eq!(attempted[0].question_id.as_deref(), Some("1"));
        assert_eq!(attempted[1].question_id.as_deref(), Some("4"));
    }

    #[test]
    fn batch_must_be_an_array() {
        assert!(matches!(
            parse_batch(&json!({"not": "an array"})),
            Err(Error::InvalidFormat(_))
        ));
        assert!(matches!(parse_batch(&json!(null)), Err(Error::InvalidFormat(_))));
        assert!(parse_batch(&json!([])).unwrap().is_empty());
    }
}
