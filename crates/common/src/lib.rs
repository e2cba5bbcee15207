//! Shared identifier and versioning types for the ordering system.

pub mod types;
pub mod version;

pub use types::{CategoryId, CustomerId, OrderId, ProductId};
pub use version::Version;
