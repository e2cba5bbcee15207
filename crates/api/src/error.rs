//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use payment::ReconciliationError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
    /// Payment handling error.
    Payment(ReconciliationError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Payment(err) => payment_error_to_response(err),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            tracing::error!(error = %message, "internal server error");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    let status = match &err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Transition(_)
        | DomainError::DuplicateTaxId(_)
        | DomainError::ConcurrencyConflict { .. } => StatusCode::CONFLICT,
        DomainError::OrderNotFound(_)
        | DomainError::ProductNotFound(_)
        | DomainError::CustomerNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

fn payment_error_to_response(err: ReconciliationError) -> (StatusCode, String) {
    match err {
        ReconciliationError::Domain(inner) => domain_error_to_response(inner),
        ReconciliationError::OrderNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        ReconciliationError::UnexpectedState { .. }
        | ReconciliationError::NotAwaitingPayment { .. } => (StatusCode::CONFLICT, err.to_string()),
        ReconciliationError::InvalidOrderReference(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        ReconciliationError::Gateway(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<ReconciliationError> for ApiError {
    fn from(err: ReconciliationError) -> Self {
        ApiError::Payment(err)
    }
}
