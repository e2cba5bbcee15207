//! Prometheus metrics endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics::Unit;
use metrics_exporter_prometheus::PrometheusHandle;

/// Registers help text for the metrics the services emit.
pub fn describe() {
    metrics::describe_counter!("orders_created_total", "Orders placed at checkout");
    metrics::describe_counter!(
        "order_status_transitions_total",
        "Order status changes, labelled by from and to status"
    );
    metrics::describe_counter!(
        "payment_webhooks_total",
        "Payment webhook deliveries, labelled by outcome and result"
    );
    metrics::describe_histogram!(
        "checkout_duration_seconds",
        Unit::Seconds,
        "Time spent placing an order"
    );
}

/// GET /metrics: returns Prometheus-formatted metrics.
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        handle.render(),
    )
}
