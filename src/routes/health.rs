use axum::{extract::State, response::Json};
use serde_json::json;

use crate::AppState;

pub async fn health(State(state): State<AppState>) -> crate::error::Result<Json<serde_json::Value>> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}
