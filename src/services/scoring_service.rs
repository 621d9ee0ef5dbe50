use serde::Serialize;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::answer::Answer;
use crate::models::question::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    pub total: i32,
    pub correct: i32,
    pub skipped: i32,
    pub wrong: i32,
}

#[derive(Clone)]
pub struct ScoringService {
    pool: PgPool,
}

/// Question-driven scoring. Iteration runs over questions, never answers,
/// so stale answers left behind by a deleted question are ignored and a
/// candidate with no answers at all scores as fully skipped.
///
/// Matching is by the denormalized order value, not the question id. Wrong
/// is derived (`total - correct - skipped`) rather than accumulated, which
/// keeps the invariant `correct + skipped + wrong == total` by construction.
pub fn score(questions: &[Question], answers: &[Answer]) -> ScoreCard {
    let total = questions.len() as i32;
    let mut correct = 0;
    let mut skipped = 0;

    for question in questions {
        let matched = answers
            .iter()
            .find(|a| a.question_order == question.position);
        match matched {
            None => skipped += 1,
            Some(a) if a.skipped => skipped += 1,
            Some(a) => {
                if a.answer == Some(question.correct_option) {
                    correct += 1;
                }
            }
        }
    }

    ScoreCard {
        total,
        correct,
        skipped,
        wrong: total - correct - skipped,
    }
}

impl ScoringService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn score_candidate(
        &self,
        exam_title: &str,
        registration_number: &str,
    ) -> Result<ScoreCard> {
        let questions = sqlx::query_as::<_, Question>(
            r#"SELECT id, exam_title, prompt, options, correct_option, position,
                      image_url, created_at, updated_at
               FROM questions WHERE exam_title = $1 ORDER BY position ASC"#,
        )
        .bind(exam_title)
        .fetch_all(&self.pool)
        .await?;

        let answers = sqlx::query_as::<_, Answer>(
            r#"SELECT registration_number, question_id, answer, skipped,
                      question_order, exam_name, source, saved_at
               FROM answers WHERE registration_number = $1"#,
        )
        .bind(registration_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(score(&questions, &answers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn question(position: i32, correct_option: i32) -> Question {
        Question {
            id: Uuid::new_v4(),
            exam_title: "Math101".to_string(),
            prompt: format!("Question {}", position),
            options: Json(vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string(),
            ]),
            correct_option,
            position,
            image_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn answer(order: i32, value: Option<i32>, skipped: bool) -> Answer {
        Answer {
            registration_number: "REG1".to_string(),
            question_id: format!("Q{}", order),
            answer: value,
            skipped,
            question_order: order,
            exam_name: "Math101".to_string(),
            source: "individual".to_string(),
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn math101_scenario() {
        // Correct indices [1, 0, 2] at order [1, 2, 3]; candidate answers
        // 1 (correct), 2 (wrong), and skips the third.
        let questions = vec![question(1, 1), question(2, 0), question(3, 2)];
        let answers = vec![
            answer(1, Some(1), false),
            answer(2, Some(2), false),
            answer(3, None, true),
        ];
        let card = score(&questions, &answers);
        assert_eq!(card.total, 3);
        assert_eq!(card.correct, 1);
        assert_eq!(card.skipped, 1);
        assert_eq!(card.wrong, 1);
    }

    #[test]
    fn no_answers_means_all_skipped() {
        let questions: Vec<Question> = (1..=5).map(|p| question(p, 0)).collect();
        let card = score(&questions, &[]);
        assert_eq!(card.total, 5);
        assert_eq!(card.correct, 0);
        assert_eq!(card.skipped, 5);
        assert_eq!(card.wrong, 0);
    }

    #[test]
    fn stale_answers_beyond_question_set_are_ignored() {
        let questions = vec![question(1, 0)];
        let answers = vec![
            answer(1, Some(0), false),
            answer(7, Some(2), false),
            answer(9, Some(1), false),
        ];
        let card = score(&questions, &answers);
        assert_eq!(card.total, 1);
        assert_eq!(card.correct, 1);
        assert_eq!(card.skipped, 0);
        assert_eq!(card.wrong, 0);
    }

    #[test]
    fn position_gaps_are_tolerated() {
        // Question at position 2 deleted; answers keyed by surviving orders.
        let questions = vec![question(1, 3), question(3, 0)];
        let answers = vec![answer(1, Some(3), false), answer(3, Some(1), false)];
        let card = score(&questions, &answers);
        assert_eq!(card.total, 2);
        assert_eq!(card.correct, 1);
        assert_eq!(card.wrong, 1);
    }

    #[test]
    fn counts_always_sum_to_total() {
        let questions: Vec<Question> = (1..=6).map(|p| question(p, p % 4)).collect();
        let answers = vec![
            answer(1, Some(1), false),
            answer(2, Some(0), false),
            answer(4, None, true),
            answer(5, Some(3), false),
        ];
        let card = score(&questions, &answers);
        assert_eq!(card.correct + card.skipped + card.wrong, card.total);
    }
}
