//! Order aggregate implementation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, ProductId, Version};
use serde::Serialize;

use crate::error::{InvalidTransition, ValidationError};
use crate::money::Money;
use crate::product::Product;

use super::{LineItem, OrderLine, OrderStatus};

/// Maximum number of line items in one order.
pub const MAX_ITEMS: usize = 20;

/// Maximum quantity of a single line item.
pub const MAX_QTY_PER_ITEM: u32 = 20;

/// Order aggregate root.
///
/// Composition is fixed at creation: there is no way to add, remove or
/// re-quantify lines afterwards. The status field is private and only
/// [`Order::update_status`] produces an order with a different status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    lines: Vec<OrderLine>,
    total: Money,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    status_changed_at: DateTime<Utc>,

    /// Stored version for optimistic concurrency.
    version: Version,
}

// Construction
impl Order {
    /// Checks the composition rules that need no catalog data.
    pub fn check_items(items: &[LineItem]) -> Result<(), ValidationError> {
        if items.is_empty() {
            return Err(ValidationError::EmptyOrder);
        }

        if items.len() > MAX_ITEMS {
            return Err(ValidationError::TooManyItems {
                count: items.len(),
                max: MAX_ITEMS,
            });
        }

        if let Some(item) = items
            .iter()
            .find(|item| item.quantity == 0 || item.quantity > MAX_QTY_PER_ITEM)
        {
            return Err(ValidationError::InvalidQuantity {
                product_id: item.product_id,
                quantity: i64::from(item.quantity),
                max: MAX_QTY_PER_ITEM,
            });
        }

        Ok(())
    }

    /// Creates a new order in the initial status.
    ///
    /// Every item must reference a product in `products`; the order total is
    /// computed from those prices and never recomputed afterwards.
    pub fn create(
        customer_id: CustomerId,
        items: Vec<LineItem>,
        products: &HashMap<ProductId, Product>,
    ) -> Result<Self, ValidationError> {
        Self::create_at(customer_id, items, products, Utc::now())
    }

    /// Like [`Order::create`] with an explicit creation time.
    pub fn create_at(
        customer_id: CustomerId,
        items: Vec<LineItem>,
        products: &HashMap<ProductId, Product>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Self::check_items(&items)?;

        let lines = items
            .into_iter()
            .map(|item| {
                products
                    .get(&item.product_id)
                    .map(|product| OrderLine::from_product(product, item.quantity))
                    .ok_or(ValidationError::UnknownProduct(item.product_id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total = lines.iter().map(OrderLine::total_price).sum();

        Ok(Self {
            id: OrderId::new(),
            customer_id,
            lines,
            total,
            status: OrderStatus::Received,
            created_at: now,
            status_changed_at: now,
            version: Version::initial(),
        })
    }
}

// Lifecycle
impl Order {
    /// Returns a copy of this order moved to `target`.
    ///
    /// Fails if `(status, target)` is not in the transition table; `self` is
    /// never modified.
    pub fn update_status(&self, target: OrderStatus) -> Result<Order, InvalidTransition> {
        self.update_status_at(target, Utc::now())
    }

    /// Like [`Order::update_status`] with an explicit change time.
    pub fn update_status_at(
        &self,
        target: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<Order, InvalidTransition> {
        if !self.status.can_transition_to(target) {
            return Err(InvalidTransition {
                from: self.status,
                to: target,
            });
        }

        Ok(Order {
            status: target,
            status_changed_at: at,
            ..self.clone()
        })
    }

    /// Records the version assigned by the repository on save.
    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the priced lines in submission order.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Returns product and quantity pairs, e.g. for stock release.
    pub fn line_items(&self) -> Vec<LineItem> {
        self.lines.iter().map(OrderLine::line_item).collect()
    }

    /// Returns the number of lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Returns the total snapshotted at creation.
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status_changed_at(&self) -> DateTime<Utc> {
        self.status_changed_at
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns true if the order is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
