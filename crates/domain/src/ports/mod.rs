//! Storage and catalog seams.
//!
//! Each trait ships with an in-memory implementation; nothing in the domain
//! depends on a concrete backend.

mod catalog;
mod customers;
mod orders;

pub use catalog::{Catalog, InMemoryCatalog};
pub use customers::{CustomerRepository, InMemoryCustomerRepository};
pub use orders::{InMemoryOrderRepository, OrderRepository};
