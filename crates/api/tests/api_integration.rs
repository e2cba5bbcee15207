//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

async fn setup() -> axum::Router {
    setup_with_state().await.0
}

async fn setup_with_state() -> (axum::Router, Arc<api::AppState>) {
    let state = api::create_default_state(true).await.unwrap();
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state)
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn product_id(app: &axum::Router, name: &str) -> String {
    let (_, products) = send(app, "GET", "/products", None).await;
    products
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == name)
        .map(|p| p["id"].as_str().unwrap().to_string())
        .unwrap()
}

async fn checkout(app: &axum::Router, items: Value) -> (StatusCode, Value) {
    send(app, "POST", "/orders/checkout", Some(json!({ "items": items }))).await
}

async fn place_order(app: &axum::Router) -> String {
    let burger = product_id(app, "X-Bacon").await;
    let (status, order) = checkout(app, json!([{ "product_id": burger, "quantity": 2 }])).await;
    assert_eq!(status, StatusCode::CREATED);
    order["id"].as_str().unwrap().to_string()
}

async fn set_status(app: &axum::Router, order_id: &str, status: &str) -> (StatusCode, Value) {
    send(
        app,
        "PATCH",
        &format!("/orders/{order_id}/status"),
        Some(json!({ "status": status })),
    )
    .await
}

async fn webhook(app: &axum::Router, order_reference: &str, outcome: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/payments/webhook",
        Some(json!({
            "orderReference": order_reference,
            "outcome": outcome,
            "providerPaymentId": "MP-123",
        })),
    )
    .await
}

#[tokio::test]
async fn test_health_check() {
    let app = setup().await;
    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_menu_is_seeded() {
    let app = setup().await;

    let (status, categories) = send(&app, "GET", "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(categories.as_array().unwrap().len(), 4);

    let drinks = categories
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "drinks")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, products) = send(&app, "GET", &format!("/products?category_id={drinks}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products.as_array().unwrap().len(), 3);

    let (status, _) = send(&app, "GET", "/products?category_id=bebidas", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_and_identify_customer() {
    let app = setup().await;

    let (status, created) = send(
        &app,
        "POST",
        "/customers",
        Some(json!({ "name": "Maria", "email": "maria@example.com", "tax_id": "529.982.247-25" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["tax_id"], "529.982.247-25");
    assert_eq!(created["anonymous"], false);

    let (status, found) = send(&app, "GET", "/customers/tax-id/52998224725", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], created["id"]);

    let (status, again) = send(
        &app,
        "POST",
        "/customers",
        Some(json!({ "name": "Maria S.", "tax_id": "52998224725" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(again["id"], created["id"]);
}

#[tokio::test]
async fn test_customer_validation_errors() {
    let app = setup().await;

    let (status, body) = send(
        &app,
        "POST",
        "/customers",
        Some(json!({ "name": "", "email": "a@b.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    let (status, _) = send(
        &app,
        "POST",
        "/customers",
        Some(json!({ "name": "Joe", "email": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/customers/tax-id/12345678909", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/customers/tax-id/12345678901", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_anonymous_checkout() {
    let app = setup().await;
    let burger = product_id(&app, "X-Bacon").await;
    let fries = product_id(&app, "Batata Frita").await;

    let (status, order) = checkout(
        &app,
        json!([
            { "product_id": burger, "quantity": 2 },
            { "product_id": fries, "quantity": 1 }
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "RECEIVED");
    assert_eq!(order["total_cents"], 1890 * 2 + 850);
    assert_eq!(order["total"], "46.30");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);

    let (status, fetched) = send(&app, "GET", &format!("/orders/{}", order["id"].as_str().unwrap()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], order["id"]);
}

#[tokio::test]
async fn test_checkout_for_registered_customer() {
    let app = setup().await;
    let (_, customer) = send(
        &app,
        "POST",
        "/customers",
        Some(json!({ "name": "João" })),
    )
    .await;
    let water = product_id(&app, "Água").await;

    let (status, order) = send(
        &app,
        "POST",
        "/orders/checkout",
        Some(json!({
            "customer_id": customer["id"],
            "items": [{ "product_id": water, "quantity": 1 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["customer_id"], customer["id"]);

    let (status, _) = send(
        &app,
        "POST",
        "/orders/checkout",
        Some(json!({
            "customer_id": uuid::Uuid::new_v4().to_string(),
            "items": [{ "product_id": water, "quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_checkout_validation_errors() {
    let app = setup().await;
    let burger = product_id(&app, "X-Bacon").await;

    let (status, _) = checkout(&app, json!([])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = checkout(&app, json!([{ "product_id": burger, "quantity": 0 }])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = checkout(
        &app,
        json!([{ "product_id": uuid::Uuid::new_v4().to_string(), "quantity": 1 }]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = checkout(&app, json!([{ "product_id": "SKU-001", "quantity": 1 }])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = checkout(&app, json!([{ "product_id": burger, "quantity": -1 }])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid quantity"));
}

#[tokio::test]
async fn test_rejected_anonymous_checkout_stores_no_customer() {
    let (app, state) = setup_with_state().await;
    let burger = product_id(&app, "X-Bacon").await;

    let (status, _) = checkout(&app, json!([])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let too_many = Value::Array(vec![json!({ "product_id": burger, "quantity": 1 }); 21]);
    let (status, _) = checkout(&app, too_many).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = checkout(
        &app,
        json!([{ "product_id": uuid::Uuid::new_v4().to_string(), "quantity": 1 }]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(state.customers.repository().customer_count().await, 0);

    let (status, order) = checkout(&app, json!([{ "product_id": burger, "quantity": 1 }])).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(state.customers.repository().customer_count().await, 1);

    let customer_id = common::CustomerId::parse_str(order["customer_id"].as_str().unwrap()).unwrap();
    let customer = state.customers.get(customer_id).await.unwrap();
    assert!(customer.is_anonymous());
}

#[tokio::test]
async fn test_get_nonexistent_order() {
    let app = setup().await;
    let fake_id = uuid::Uuid::new_v4();

    let (status, _) = send(&app, "GET", &format!("/orders/{fake_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/orders/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_kitchen_flow_and_queue() {
    let app = setup().await;
    let first = place_order(&app).await;
    let second = place_order(&app).await;

    let (status, _) = webhook(&app, &second, "APPROVED").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = set_status(&app, &second, "PREPARING").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "PREPARING");

    let (status, queue) = send(&app, "GET", "/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = queue
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![second.clone(), first.clone()]);

    let (status, _) = set_status(&app, &second, "READY").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = set_status(&app, &second, "FINALIZED").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "FINALIZED");

    let (_, queue) = send(&app, "GET", "/orders", None).await;
    assert_eq!(queue.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_transition_is_conflict() {
    let app = setup().await;
    let order_id = place_order(&app).await;

    let (status, body) = set_status(&app, &order_id, "READY").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("RECEIVED"));

    let (status, _) = set_status(&app, &order_id, "SHIPPED").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_payment_flow() {
    let app = setup().await;
    let order_id = place_order(&app).await;

    let (status, payment) = send(&app, "GET", &format!("/payments/{order_id}/status"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payment["payment_status"], "PENDING");

    let (status, intent) = send(&app, "POST", &format!("/payments/{order_id}/intent"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(intent["amount_cents"], 1890 * 2);
    assert!(intent["qr_code"].as_str().is_some());

    let (status, first) = webhook(&app, &order_id, "APPROVED").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["status"], "PAID");
    assert_eq!(first["duplicate"], false);

    let (status, second) = webhook(&app, &order_id, "APPROVED").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["status"], "PAID");
    assert_eq!(second["duplicate"], true);

    let (_, payment) = send(&app, "GET", &format!("/payments/{order_id}/status"), None).await;
    assert_eq!(payment["payment_status"], "APPROVED");

    let (status, _) = send(&app, "POST", &format!("/payments/{order_id}/intent"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_rejected_payment_cancels_order() {
    let (app, state) = setup_with_state().await;
    let order_id = place_order(&app).await;

    let (status, body) = webhook(&app, &order_id, "REJECTED").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CANCELLED");

    let (status, _) = set_status(&app, &order_id, "PAID").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = webhook(&app, &order_id, "APPROVED").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let bacon = product_id(&app, "X-Bacon").await;
    let product = domain::Catalog::get_product(
        &state.catalog,
        common::ProductId::parse_str(&bacon).unwrap(),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(product.stock(), 100);
}

#[tokio::test]
async fn test_webhook_errors() {
    let app = setup().await;

    let (status, _) = webhook(&app, "pedido-42", "APPROVED").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = webhook(&app, &uuid::Uuid::new_v4().to_string(), "APPROVED").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/payments/webhook",
        Some(json!({ "orderReference": "x", "outcome": "MAYBE", "providerPaymentId": "p" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup().await;
    place_order(&app).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("orders_created_total"));
}
