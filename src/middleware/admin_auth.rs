use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use subtle::ConstantTimeEq;

/// Shared-secret gate for admin routes, compared in constant time. This is
/// deliberately plumbing, not an account system.
#[derive(Clone)]
pub struct AdminGate {
    key: Arc<String>,
}

pub fn new_admin_state(key: String) -> AdminGate {
    AdminGate { key: Arc::new(key) }
}

pub async fn admin_key_middleware(
    State(gate): State<AdminGate>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let provided = req
        .headers()
        .get("x-admin-key")
        .and_then(|v| v.to_str().ok());

    let Some(provided) = provided else {
        return unauthorized("missing_admin_key");
    };
    if ConstantTimeEq::ct_eq(provided.as_bytes(), gate.key.as_bytes()).into() {
        next.run(req).await
    } else {
        tracing::warn!("Rejected request with invalid admin key");
        unauthorized("invalid_admin_key")
    }
}

fn unauthorized(reason: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "error": reason })),
    )
        .into_response()
}
