use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PollQuery {
    pub since: Option<DateTime<Utc>>,
}

#[axum::debug_handler]
pub async fn create_notification(
    State(state): State<AppState>,
    Json(req): Json<CreateNotificationRequest>,
) -> Result<Response> {
    req.validate()?;
    let notification = state
        .notification_service
        .create(&req.title, &req.body)
        .await?;
    tracing::info!(id = %notification.id, "Notification published");
    Ok(Json(json!({ "success": true, "notification": notification })).into_response())
}

#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let notifications = state
        .notification_service
        .list(query.limit.unwrap_or(20).clamp(1, 100))
        .await?;
    Ok(Json(json!({ "success": true, "notifications": notifications })).into_response())
}

#[axum::debug_handler]
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    state.notification_service.delete(id).await?;
    Ok(Json(json!({ "success": true })).into_response())
}

/// Long-poll read. Without `since` this degenerates to the plain list, so
/// clients can bootstrap and then follow the stream with the timestamp of
/// the newest item they hold.
#[axum::debug_handler]
pub async fn poll_notifications(
    State(state): State<AppState>,
    Query(query): Query<PollQuery>,
) -> Result<Response> {
    let notifications = match query.since {
        Some(since) => state.notification_service.poll(since).await?,
        None => state.notification_service.list(20).await?,
    };
    Ok(Json(json!({
        "success": true,
        "notifications": notifications,
        "serverTime": Utc::now(),
    }))
    .into_response())
}
