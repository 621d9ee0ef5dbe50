use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// One incoming answer tuple, shared by all four submission paths.
///
/// `answer` must distinguish "key absent" from "explicitly null": an absent
/// answer is a MissingField error, while null is a legitimate value for a
/// skipped question, and `0` is a legitimate first-option index. Plain
/// `Option<T>` folds null into absent, so null is captured as
/// `Some(JsonValue::Null)` via `value_if_present`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPayload {
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default, deserialize_with = "value_if_present")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<JsonValue>,
    #[serde(default)]
    pub exam_name: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub skipped: Option<bool>,
}

fn value_if_present<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    JsonValue::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAllAnswersRequest {
    #[serde(default)]
    pub answers: JsonValue,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteExamRequest {
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub exam_name: Option<String>,
    #[serde(default)]
    pub answers: JsonValue,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAnswerResponse {
    pub success: bool,
    pub question_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSaveResponse {
    pub success: bool,
    pub saved: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteExamResponse {
    pub success: bool,
    pub registration_number: String,
    pub saved: usize,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_answer_deserializes_to_none() {
        let p: AnswerPayload =
            serde_json::from_str(r#"{"registrationNumber":"REG1","questionId":"Q1"}"#).unwrap();
        assert!(p.answer.is_none());
    }

    #[test]
    fn null_answer_is_present() {
        let p: AnswerPayload = serde_json::from_str(
            r#"{"registrationNumber":"REG1","questionId":"Q1","answer":null,"skipped":true}"#,
        )
        .unwrap();
        assert_eq!(p.answer, Some(JsonValue::Null));
    }

    #[test]
    fn zero_answer_is_present() {
        let p: AnswerPayload =
            serde_json::from_str(r#"{"registrationNumber":"REG1","questionId":"1","answer":0}"#)
                .unwrap();
        assert_eq!(p.answer, Some(serde_json::json!(0)));
    }
}
