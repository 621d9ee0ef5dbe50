use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::dto::payment_dto::{
    CreateOrderRequest, CreateOrderResponse, VerifyPaymentRequest, VerifyPaymentResponse,
};
use crate::error::Result;
use crate::AppState;

/// The order amount always comes from the exam the candidate is registered
/// for; the client never names a price.
#[axum::debug_handler]
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Response> {
    let candidate = state.candidate_service.get(&req.registration_number).await?;
    let exam = state.exam_service.get_exam(&candidate.exam_title).await?;
    let order = state
        .payment_service
        .create_order(&candidate.registration_number, exam.price)
        .await?;

    Ok(Json(CreateOrderResponse {
        success: true,
        order_id: order.order_id,
        amount: order.amount,
        currency: order.currency,
        key_id: state.payment_service.key_id().to_string(),
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<Response> {
    let order = state
        .payment_service
        .confirm_payment(&req.order_id, &req.payment_id, &req.signature)
        .await?;
    Ok(Json(VerifyPaymentResponse {
        success: true,
        order_id: order.order_id,
        status: order.status,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Response> {
    let order = state.payment_service.fetch_order(&order_id).await?;
    Ok(Json(json!({ "success": true, "order": order })).into_response())
}

#[axum::debug_handler]
pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Response> {
    let payment = state.payment_service.fetch_payment(&payment_id).await?;
    Ok(Json(json!({ "success": true, "payment": payment })).into_response())
}
