use base64::Engine;
use sqlx::PgPool;
use url::Url;
use uuid::Uuid;

use crate::dto::exam_dto::CreateQuestionRequest;
use crate::error::{Error, Result};
use crate::models::question::{Question, OPTION_COUNT};

#[derive(Clone)]
pub struct QuestionService {
    pool: PgPool,
}

fn validate_choice(req: &CreateQuestionRequest) -> Result<()> {
    if req.options.len() != OPTION_COUNT {
        return Err(Error::InvalidFormat(format!(
            "A question needs exactly {} options, got {}",
            OPTION_COUNT,
            req.options.len()
        )));
    }
    if !(0..OPTION_COUNT as i32).contains(&req.correct_option) {
        return Err(Error::InvalidFormat(format!(
            "correctOption must be between 0 and {}",
            OPTION_COUNT - 1
        )));
    }
    if let Some(image) = &req.image {
        validate_image(image)?;
    }
    Ok(())
}

/// Question images are either a plain http(s) URL or an inline
/// `data:image/...;base64,` payload.
fn validate_image(raw: &str) -> Result<()> {
    if let Some(rest) = raw.strip_prefix("data:image/") {
        let payload = rest
            .split_once(";base64,")
            .map(|(_, p)| p)
            .ok_or_else(|| Error::InvalidFormat("image data URL is not base64-encoded".to_string()))?;
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|_| Error::InvalidFormat("image data URL payload is not valid base64".to_string()))?;
        return Ok(());
    }
    let url = Url::parse(raw)
        .map_err(|_| Error::InvalidFormat(format!("image '{}' is not a URL or data URL", raw)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::InvalidFormat(
            "image URLs must use http or https".to_string(),
        ));
    }
    Ok(())
}

impl QuestionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Position is assigned as current-count + 1 and never reused: deleting
    /// a question leaves a permanent gap in the sequence.
    pub async fn create_question(
        &self,
        exam_title: &str,
        req: &CreateQuestionRequest,
    ) -> Result<Question> {
        validate_choice(req)?;

        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM questions WHERE exam_title = $1"#)
                .bind(exam_title)
                .fetch_one(&self.pool)
                .await?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (id, exam_title, prompt, options, correct_option, position, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, exam_title, prompt, options, correct_option, position,
                      image_url, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(exam_title)
        .bind(&req.prompt)
        .bind(sqlx::types::Json(&req.options))
        .bind(req.correct_option)
        .bind(count as i32 + 1)
        .bind(&req.image)
        .fetch_one(&self.pool)
        .await?;
        Ok(question)
    }

    /// Replaces prompt, options, correct index, and image; position is
    /// immutable.
    pub async fn update_question(&self, id: Uuid, req: &CreateQuestionRequest) -> Result<Question> {
        validate_choice(req)?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET prompt = $2, options = $3, correct_option = $4, image_url = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, exam_title, prompt, options, correct_option, position,
                      image_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&req.prompt)
        .bind(sqlx::types::Json(&req.options))
        .bind(req.correct_option)
        .bind(&req.image)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Question {} does not exist", id)))?;
        Ok(question)
    }

    pub async fn delete_question(&self, id: Uuid) -> Result<()> {
        let outcome = sqlx::query(r#"DELETE FROM questions WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if outcome.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Question {} does not exist", id)));
        }
        Ok(())
    }

    pub async fn questions_for_exam(&self, exam_title: &str) -> Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(
            r#"SELECT id, exam_title, prompt, options, correct_option, position,
                      image_url, created_at, updated_at
               FROM questions WHERE exam_title = $1 ORDER BY position ASC"#,
        )
        .bind(exam_title)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(options: Vec<&str>, correct: i32, image: Option<&str>) -> CreateQuestionRequest {
        CreateQuestionRequest {
            prompt: "What is 2 + 2?".to_string(),
            options: options.into_iter().map(String::from).collect(),
            correct_option: correct,
            image: image.map(String::from),
        }
    }

    #[test]
    fn exactly_four_options_required() {
        assert!(validate_choice(&req(vec!["1", "2", "3", "4"], 0, None)).is_ok());
        assert!(validate_choice(&req(vec!["1", "2", "3"], 0, None)).is_err());
        assert!(validate_choice(&req(vec!["1", "2", "3", "4", "5"], 0, None)).is_err());
    }

    #[test]
    fn correct_index_must_be_in_range() {
        assert!(validate_choice(&req(vec!["1", "2", "3", "4"], 3, None)).is_ok());
        assert!(validate_choice(&req(vec!["1", "2", "3", "4"], 4, None)).is_err());
        assert!(validate_choice(&req(vec!["1", "2", "3", "4"], -1, None)).is_err());
    }

    #[test]
    fn image_accepts_https_and_data_urls() {
        assert!(validate_image("https://cdn.example.com/q1.png").is_ok());
        assert!(validate_image("data:image/png;base64,iVBORw0KGgo=").is_ok());
        assert!(validate_image("ftp://example.com/q1.png").is_err());
        assert!(validate_image("data:image/png;base64,not-base64!!").is_err());
        assert!(validate_image("just words").is_err());
    }
}
