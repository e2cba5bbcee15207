//! Catalog products and categories.

use common::{CategoryId, ProductId};
use serde::Serialize;

use crate::customer::validate_name;
use crate::error::ValidationError;
use crate::money::Money;

/// Policy ceiling for a single product price (1000.00).
pub const MAX_PRICE: Money = Money::from_cents(100_000);

/// A menu section such as burgers or drinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    id: CategoryId,
    name: String,
}

impl Category {
    /// Creates a category with a fresh id.
    pub fn create(name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: CategoryId::new(),
            name: validate_name(name)?,
        })
    }

    pub fn id(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A catalog item that can be ordered.
///
/// Price is always within `(0, MAX_PRICE]`; stock is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    price: Money,
    category_id: CategoryId,
    stock: u32,
}

impl Product {
    /// Creates a product with a fresh id.
    ///
    /// Pass a stock of `0` for items that are listed but not yet stocked.
    pub fn create(
        name: &str,
        description: impl Into<String>,
        price: Money,
        category_id: CategoryId,
        stock: i64,
    ) -> Result<Self, ValidationError> {
        let name = validate_name(name)?;
        validate_price(price)?;
        let stock = u32::try_from(stock).map_err(|_| ValidationError::InvalidStock { stock })?;

        Ok(Self {
            id: ProductId::new(),
            name,
            description: description.into().trim().to_string(),
            price,
            category_id,
            stock,
        })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// Returns true while there is stock left to sell.
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }

    /// Changes the list price. Existing orders keep the price they snapshotted.
    pub fn reprice(&mut self, price: Money) -> Result<(), ValidationError> {
        validate_price(price)?;
        self.price = price;
        Ok(())
    }

    /// Takes `quantity` units out of stock, or fails leaving stock untouched.
    pub fn reserve(&mut self, quantity: u32) -> Result<(), ValidationError> {
        if quantity > self.stock {
            return Err(ValidationError::InsufficientStock {
                product_id: self.id,
                requested: quantity,
                available: self.stock,
            });
        }
        self.stock -= quantity;
        Ok(())
    }

    /// Puts `quantity` units back into stock.
    pub fn release(&mut self, quantity: u32) {
        self.stock = self.stock.saturating_add(quantity);
    }
}

fn validate_price(price: Money) -> Result<(), ValidationError> {
    if !price.is_positive() || price > MAX_PRICE {
        return Err(ValidationError::InvalidPrice {
            price,
            max: MAX_PRICE,
        });
    }
    Ok(())
}
