//! HTTP route handlers.

pub mod catalog;
pub mod customers;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod payments;

use crate::error::ApiError;

/// Parses a path or query id, naming the kind of id in the error.
pub(crate) fn parse_id<T>(
    kind: &str,
    raw: &str,
    parse: fn(&str) -> Result<T, uuid::Error>,
) -> Result<T, ApiError> {
    parse(raw).map_err(|e| ApiError::BadRequest(format!("Invalid {kind} id: {e}")))
}
