//! Payment error types.

use common::OrderId;
use domain::{DomainError, OrderStatus};
use thiserror::Error;

use crate::webhook::PaymentOutcome;

/// Errors raised by the payment gateway collaborator.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The provider could not be reached or answered with an error.
    #[error("Payment provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while reconciling payments.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    /// The referenced order does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order's status does not fit the requested payment operation.
    #[error("Order {order_id} is {status}; cannot apply {outcome}")]
    UnexpectedState {
        order_id: OrderId,
        status: OrderStatus,
        outcome: PaymentOutcome,
    },

    /// A payment intent was requested for an order that is past payment.
    #[error("Order {order_id} is {status}; payment is only possible while RECEIVED")]
    NotAwaitingPayment {
        order_id: OrderId,
        status: OrderStatus,
    },

    /// The webhook's order reference is not a valid order id.
    #[error("Invalid order reference: {0:?}")]
    InvalidOrderReference(String),

    /// Gateway error.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Domain error.
    #[error("Domain error: {0}")]
    Domain(DomainError),
}

impl From<DomainError> for ReconciliationError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::OrderNotFound(order_id) => ReconciliationError::OrderNotFound(order_id),
            other => ReconciliationError::Domain(other),
        }
    }
}

/// Convenience type alias for payment results.
pub type Result<T> = std::result::Result<T, ReconciliationError>;
