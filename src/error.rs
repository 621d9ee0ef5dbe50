use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payment signature verification failed")]
    SignatureMismatch,

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payment gateway error: {0}")]
    Gateway(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, details) = match self {
            Error::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                format!("Missing required field: {}", field),
                None,
            ),
            Error::InvalidFormat(msg) => (
                StatusCode::BAD_REQUEST,
                "Invalid format".to_string(),
                Some(msg),
            ),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            Error::SignatureMismatch => (
                StatusCode::BAD_REQUEST,
                "Payment signature verification failed".to_string(),
                None,
            ),
            Error::Validation(err) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(err.to_string()),
            ),
            Error::Json(err) => (
                StatusCode::BAD_REQUEST,
                "Malformed JSON payload".to_string(),
                Some(err.to_string()),
            ),
            Error::Database(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Storage operation failed".to_string(),
                Some(err.to_string()),
            ),
            Error::Gateway(err) => (
                StatusCode::BAD_GATEWAY,
                "Payment gateway request failed".to_string(),
                Some(err.to_string()),
            ),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "File operation failed".to_string(),
                Some(err.to_string()),
            ),
            Error::Multipart(err) => (
                StatusCode::BAD_REQUEST,
                "Malformed multipart payload".to_string(),
                Some(err.to_string()),
            ),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            Error::Anyhow(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None),
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
        };

        let body = match details {
            Some(d) => Json(json!({ "success": false, "error": error_message, "details": d })),
            None => Json(json!({ "success": false, "error": error_message })),
        };
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
