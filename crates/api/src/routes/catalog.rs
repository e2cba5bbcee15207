//! Menu endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use common::CategoryId;
use domain::{Catalog, Category, Product};
use serde::{Deserialize, Serialize};

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id().to_string(),
            name: category.name().to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub price_cents: i64,
    pub category_id: String,
    pub stock: u32,
    pub available: bool,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            price: product.price().to_string(),
            price_cents: product.price().cents(),
            category_id: product.category_id().to_string(),
            stock: product.stock(),
            available: product.is_available(),
        }
    }
}

#[derive(Deserialize)]
pub struct ProductQuery {
    pub category_id: Option<String>,
}

/// GET /categories: list menu categories.
pub async fn categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = state.catalog.list_categories().await?;
    Ok(Json(categories.iter().map(CategoryResponse::from).collect()))
}

/// GET /products: list products, optionally for one category.
#[tracing::instrument(skip(state, query))]
pub async fn products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let category_id = query
        .category_id
        .as_deref()
        .map(|raw| parse_id("category", raw, CategoryId::parse_str))
        .transpose()?;

    let products = state.catalog.list_products(category_id).await?;
    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}
