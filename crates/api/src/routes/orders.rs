//! Checkout and kitchen endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{CustomerId, OrderId, ProductId};
use domain::{
    Customer, DomainError, LineItem, MAX_QTY_PER_ITEM, Order, OrderStatus, ValidationError,
};
use serde::{Deserialize, Serialize};

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct CheckoutRequest {
    /// Registered customer; omit for an anonymous order.
    pub customer_id: Option<String>,
    pub items: Vec<CheckoutItemRequest>,
}

#[derive(Deserialize)]
pub struct CheckoutItemRequest {
    pub product_id: String,
    /// Signed; values below 1 are rejected as invalid quantities.
    pub quantity: i64,
}

impl CheckoutItemRequest {
    fn to_line_item(&self) -> Result<LineItem, ApiError> {
        let product_id = parse_id("product", &self.product_id, ProductId::parse_str)?;
        let quantity = u32::try_from(self.quantity)
            .ok()
            .filter(|quantity| *quantity > 0)
            .ok_or(ValidationError::InvalidQuantity {
                product_id,
                quantity: self.quantity,
                max: MAX_QTY_PER_ITEM,
            })
            .map_err(DomainError::from)?;
        Ok(LineItem::new(product_id, quantity))
    }
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub customer_id: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItemResponse>,
    pub total: String,
    pub total_cents: i64,
    pub created_at: String,
    pub status_changed_at: String,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub total_price_cents: i64,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id().to_string(),
            customer_id: order.customer_id().to_string(),
            status: order.status(),
            items: order
                .lines()
                .iter()
                .map(|line| OrderItemResponse {
                    product_id: line.product_id.to_string(),
                    product_name: line.product_name.clone(),
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price.cents(),
                    total_price_cents: line.total_price().cents(),
                })
                .collect(),
            total: order.total().to_string(),
            total_cents: order.total().cents(),
            created_at: order.created_at().to_rfc3339(),
            status_changed_at: order.status_changed_at().to_rfc3339(),
        }
    }
}

// -- Handlers --

/// POST /orders/checkout: place an order.
#[tracing::instrument(skip(state, req))]
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let items = req
        .items
        .iter()
        .map(CheckoutItemRequest::to_line_item)
        .collect::<Result<Vec<_>, _>>()?;

    // Anonymous customers are stored only once their order has been placed.
    let (customer, anonymous) = match req.customer_id.as_deref() {
        Some(raw) => {
            let customer_id = parse_id("customer", raw, CustomerId::parse_str)?;
            (state.customers.get(customer_id).await?, false)
        }
        None => (Customer::create_anonymous(), true),
    };

    let order = state.orders.checkout(customer.id(), items).await?;
    if anonymous {
        state.customers.register(&customer).await?;
    }
    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

/// GET /orders/{id}: load an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_id("order", &id, OrderId::parse_str)?;
    let order = state.orders.order(order_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// GET /orders: list open orders in kitchen-queue order.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.orders.queue().await?;
    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// PATCH /orders/{id}/status: move an order along its lifecycle.
#[tracing::instrument(skip(state, req), fields(target = %req.status))]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_id("order", &id, OrderId::parse_str)?;
    let order = state.orders.update_status(order_id, req.status).await?;
    Ok(Json(OrderResponse::from(&order)))
}
