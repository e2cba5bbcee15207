//! Order aggregate and related types.

mod aggregate;
mod locks;
mod service;
mod state;
mod value_objects;

pub use aggregate::{MAX_ITEMS, MAX_QTY_PER_ITEM, Order};
pub use locks::OrderLocks;
pub use service::{OrderService, StatusUpdate};
pub use state::{OrderStatus, ParseStatusError};
pub use value_objects::{LineItem, OrderLine};
