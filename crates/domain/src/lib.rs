//! Domain layer for the self-service ordering system.
//!
//! This crate provides:
//! - Customer, Category and Product entities with their validation rules
//! - The Order aggregate and its status state machine
//! - Order and customer services built on repository traits
//! - In-memory implementations of every repository trait

pub mod customer;
pub mod error;
pub mod money;
pub mod order;
pub mod ports;
pub mod product;

pub use customer::{Customer, CustomerService, TaxId};
pub use error::{DomainError, InvalidTransition, ValidationError};
pub use money::{Money, ParseMoneyError};
pub use order::{
    LineItem, MAX_ITEMS, MAX_QTY_PER_ITEM, Order, OrderLine, OrderLocks, OrderService,
    OrderStatus, ParseStatusError, StatusUpdate,
};
pub use ports::{
    Catalog, CustomerRepository, InMemoryCatalog, InMemoryCustomerRepository,
    InMemoryOrderRepository, OrderRepository,
};
pub use product::{Category, MAX_PRICE, Product};
