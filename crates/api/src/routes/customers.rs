//! Customer identification endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::Customer;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterCustomerRequest {
    pub name: String,
    pub email: Option<String>,
    pub tax_id: Option<String>,
}

#[derive(Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub tax_id: Option<String>,
    pub anonymous: bool,
}

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id().to_string(),
            name: customer.name().to_string(),
            email: customer.email().map(String::from),
            tax_id: customer.tax_id().map(|t| t.formatted()),
            anonymous: customer.is_anonymous(),
        }
    }
}

/// POST /customers: register a customer, or return the one holding the tax id.
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let customer = state
        .customers
        .register_or_get(&req.name, req.email.as_deref(), req.tax_id.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(CustomerResponse::from(&customer))))
}

/// GET /customers/tax-id/{tax_id}: identify a customer by tax id.
#[tracing::instrument(skip(state, tax_id))]
pub async fn find_by_tax_id(
    State(state): State<Arc<AppState>>,
    Path(tax_id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state
        .customers
        .find_by_tax_id(&tax_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No customer with this tax id".to_string()))?;
    Ok(Json(CustomerResponse::from(&customer)))
}
