use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use tokio::fs;
use uuid::Uuid;

use crate::dto::candidate_dto::{RegisterCandidateResponse, StartExamResponse};
use crate::error::{Error, Result};
use crate::services::candidate_service::NewCandidate;
use crate::AppState;

async fn save_photo(uploads_dir: &str, filename: &str, data: &Bytes) -> Result<String> {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let allowed_exts = ["jpg", "jpeg", "png", "webp"];
    if !allowed_exts.contains(&ext.as_str()) {
        return Err(Error::InvalidFormat(format!(
            "Photo type .{} is not allowed",
            ext
        )));
    }
    if (ext == "jpg" || ext == "jpeg") && !data.starts_with(&[0xFF, 0xD8]) {
        return Err(Error::InvalidFormat("Invalid JPEG file content".into()));
    }
    if ext == "png" && !data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Err(Error::InvalidFormat("Invalid PNG file content".into()));
    }

    let dir = format!("{}/photos", uploads_dir);
    fs::create_dir_all(&dir).await?;
    let path = format!("{}/{}.{}", dir, Uuid::new_v4(), ext);
    fs::write(&path, data).await?;
    Ok(path)
}

#[axum::debug_handler]
pub async fn register_candidate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut full_name = None;
    let mut email = None;
    let mut phone = None;
    let mut date_of_birth = None;
    let mut gender = None;
    let mut address = None;
    let mut exam_title = None;
    let mut photo_url = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "fullName" => full_name = Some(field.text().await?),
            "email" => email = Some(field.text().await?),
            "phone" => phone = Some(field.text().await?),
            "dateOfBirth" => {
                let raw = field.text().await?;
                let parsed = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                    Error::InvalidFormat(format!("dateOfBirth '{}' is not YYYY-MM-DD", raw))
                })?;
                date_of_birth = Some(parsed);
            }
            "gender" => gender = Some(field.text().await?),
            "address" => address = Some(field.text().await?),
            "examTitle" => exam_title = Some(field.text().await?),
            "photo" => {
                let filename = field.file_name().unwrap_or("photo").to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    photo_url = Some(save_photo(&state.uploads_dir, &filename, &data).await?);
                }
            }
            _ => {}
        }
    }

    let full_name = full_name
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| Error::MissingField("fullName".to_string()))?;
    let exam_title = exam_title
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| Error::MissingField("examTitle".to_string()))?;

    let candidate = state
        .candidate_service
        .register(NewCandidate {
            full_name,
            email,
            phone,
            date_of_birth,
            gender,
            address,
            exam_title,
            photo_url,
        })
        .await?;

    Ok(Json(RegisterCandidateResponse {
        success: true,
        registration_number: candidate.registration_number,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(registration_id): Path<String>,
) -> Result<Response> {
    let candidate = state.candidate_service.get(&registration_id).await?;
    Ok(Json(json!({ "success": true, "candidate": candidate })).into_response())
}

#[axum::debug_handler]
pub async fn start_exam(
    State(state): State<AppState>,
    Path(registration_id): Path<String>,
) -> Result<Response> {
    let candidate = state.candidate_service.start_session(&registration_id).await?;
    Ok(Json(StartExamResponse {
        success: true,
        registration_number: candidate.registration_number,
        exam_title: candidate.exam_title,
        started_at: Utc::now(),
    })
    .into_response())
}
