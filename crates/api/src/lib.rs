//! HTTP API server with observability for the self-service ordering system.
//!
//! Provides REST endpoints for the menu, customer identification, checkout,
//! the kitchen queue and payment confirmation, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod seed;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/categories", get(routes::catalog::categories))
        .route("/products", get(routes::catalog::products))
        .route("/customers", post(routes::customers::register))
        .route(
            "/customers/tax-id/{tax_id}",
            get(routes::customers::find_by_tax_id),
        )
        .route("/orders", get(routes::orders::list))
        .route("/orders/checkout", post(routes::orders::checkout))
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}/status", patch(routes::orders::update_status))
        .route(
            "/payments/{order_id}/intent",
            post(routes::payments::create_intent),
        )
        .route("/payments/{order_id}/status", get(routes::payments::status))
        .route("/payments/webhook", post(routes::payments::webhook))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over in-memory stores, optionally
/// loaded with the demo menu.
pub async fn create_default_state(seed_menu: bool) -> Result<Arc<AppState>, domain::DomainError> {
    let state = AppState::in_memory();
    if seed_menu {
        seed::seed_menu(&state.catalog).await?;
    }
    Ok(Arc::new(state))
}
