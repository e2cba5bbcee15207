//! Domain error types.

use common::{CustomerId, OrderId, ProductId, Version};
use thiserror::Error;

use crate::money::Money;
use crate::order::OrderStatus;

/// Malformed input to entity construction.
///
/// Always a client-input problem; never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name is blank.
    #[error("Name must not be empty")]
    EmptyName,

    /// Name exceeds the length ceiling.
    #[error("Name is too long: {length} characters (max {max})")]
    NameTooLong { length: usize, max: usize },

    /// Email is present but not well-formed.
    #[error("Invalid email address: {0:?}")]
    InvalidEmail(String),

    /// Tax id is present but fails the checksum.
    #[error("Invalid tax id: {0:?}")]
    InvalidTaxId(String),

    /// Price is not positive or exceeds the ceiling.
    #[error("Invalid price: {price} (must be greater than 0 and at most {max})")]
    InvalidPrice { price: Money, max: Money },

    /// Stock is negative.
    #[error("Invalid stock: {stock} (must not be negative)")]
    InvalidStock { stock: i64 },

    /// Order has no items.
    #[error("Order has no items")]
    EmptyOrder,

    /// Order has more items than allowed.
    #[error("Too many items: {count} (max {max})")]
    TooManyItems { count: usize, max: usize },

    /// Item quantity is not positive or above the per-item cap.
    #[error("Invalid quantity for product {product_id}: {quantity} (must be between 1 and {max})")]
    InvalidQuantity {
        product_id: ProductId,
        quantity: i64,
        max: u32,
    },

    /// An item references a product the catalog does not know.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// Not enough stock to cover the requested quantity.
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },
}

/// A status change that is not in the lifecycle transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid state transition: cannot move order from {from} to {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Entity construction rejected the input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A lifecycle transition was rejected.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Another customer is already registered with this tax id.
    #[error("Tax id already registered: {0}")]
    DuplicateTaxId(String),

    /// The stored order moved on since it was loaded.
    #[error(
        "Concurrency conflict for order {order_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        order_id: OrderId,
        expected: Version,
        actual: Version,
    },

    /// A storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),
}
