use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::AppState;

/// Multipart upload: a `title`, then either a `file` part (PDF or video) or
/// a `link` part, plus an optional `examTitle` association.
#[axum::debug_handler]
pub async fn upload_material(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut title = None;
    let mut exam_title = None;
    let mut link = None;
    let mut file: Option<(String, bytes::Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "title" => title = Some(field.text().await?),
            "examTitle" => exam_title = Some(field.text().await?),
            "link" => {
                let raw = field.text().await?;
                if !raw.trim().is_empty() {
                    link = Some(raw);
                }
            }
            "file" => {
                let filename = field.file_name().unwrap_or("material").to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    file = Some((filename, data));
                }
            }
            _ => {}
        }
    }

    let title = title
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| Error::MissingField("title".to_string()))?;
    if let Some(exam) = &exam_title {
        state.exam_service.get_exam(exam).await?;
    }

    let material = match (file, link) {
        (Some((filename, data)), _) => {
            state
                .material_service
                .save_upload(&title, &filename, &data, exam_title)
                .await?
        }
        (None, Some(link)) => {
            state
                .material_service
                .save_link(&title, &link, exam_title)
                .await?
        }
        (None, None) => {
            return Err(Error::MissingField("file or link".to_string()));
        }
    };

    tracing::info!(id = %material.id, kind = %material.kind, "Study material published");
    Ok(Json(json!({ "success": true, "material": material })).into_response())
}

#[axum::debug_handler]
pub async fn list_materials(State(state): State<AppState>) -> Result<Response> {
    let materials = state.material_service.list().await?;
    Ok(Json(json!({ "success": true, "materials": materials })).into_response())
}

#[axum::debug_handler]
pub async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    state.material_service.delete(id).await?;
    Ok(Json(json!({ "success": true })).into_response())
}
