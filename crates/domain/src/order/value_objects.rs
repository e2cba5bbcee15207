//! Value objects for the order domain.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::product::Product;

/// A requested product and quantity, as submitted at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The product identifier.
    pub product_id: ProductId,

    /// Quantity ordered.
    pub quantity: u32,
}

impl LineItem {
    /// Creates a new line item.
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// A line of a placed order, priced at the moment the order was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// The product identifier.
    pub product_id: ProductId,

    /// Product name at creation time.
    pub product_name: String,

    /// Quantity ordered.
    pub quantity: u32,

    /// Price per unit at creation time.
    pub unit_price: Money,
}

impl OrderLine {
    /// Snapshots `product` for `quantity` units.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id(),
            product_name: product.name().to_string(),
            quantity,
            unit_price: product.price(),
        }
    }

    /// Returns the total price for this line (quantity * unit_price).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }

    /// Returns the product and quantity without the price snapshot.
    pub fn line_item(&self) -> LineItem {
        LineItem::new(self.product_id, self.quantity)
    }
}
