//! Payment endpoints: QR-code intents, status queries and the provider webhook.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::OrderId;
use domain::OrderStatus;
use payment::{PaymentIntent, PaymentStatus, PaymentWebhook};
use serde::Serialize;

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct PaymentIntentResponse {
    pub order_id: String,
    pub provider_payment_id: String,
    pub qr_code: String,
    pub amount: String,
    pub amount_cents: i64,
}

impl PaymentIntentResponse {
    fn new(order_id: OrderId, intent: PaymentIntent) -> Self {
        Self {
            order_id: order_id.to_string(),
            amount: intent.amount.to_string(),
            amount_cents: intent.amount.cents(),
            provider_payment_id: intent.provider_payment_id,
            qr_code: intent.qr_code,
        }
    }
}

#[derive(Serialize)]
pub struct PaymentStatusResponse {
    pub order_id: String,
    pub payment_status: PaymentStatus,
}

#[derive(Serialize)]
pub struct WebhookResponse {
    pub order_id: String,
    pub status: OrderStatus,
    pub duplicate: bool,
}

/// POST /payments/{order_id}/intent: create a QR-code payment for an order.
#[tracing::instrument(skip(state))]
pub async fn create_intent(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> Result<(StatusCode, Json<PaymentIntentResponse>), ApiError> {
    let order_id = parse_id("order", &order_id, OrderId::parse_str)?;
    let intent = state.payments.request_payment(order_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(PaymentIntentResponse::new(order_id, intent)),
    ))
}

/// GET /payments/{order_id}/status: payment state of an order.
#[tracing::instrument(skip(state))]
pub async fn status(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    let order_id = parse_id("order", &order_id, OrderId::parse_str)?;
    let payment_status = state.payments.payment_status(order_id).await?;
    Ok(Json(PaymentStatusResponse {
        order_id: order_id.to_string(),
        payment_status,
    }))
}

/// POST /payments/webhook: payment confirmation from the provider.
///
/// Redelivered notifications answer 200 with `duplicate: true`.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    Json(webhook): Json<PaymentWebhook>,
) -> Result<Json<WebhookResponse>, ApiError> {
    let receipt = state.payments.handle_webhook(&webhook).await?;
    Ok(Json(WebhookResponse {
        order_id: receipt.order.id().to_string(),
        status: receipt.order.status(),
        duplicate: receipt.duplicate,
    }))
}
