//! Product catalog trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{CategoryId, ProductId};
use tokio::sync::RwLock;

use crate::error::{DomainError, ValidationError};
use crate::money::Money;
use crate::order::LineItem;
use crate::product::{Category, Product};

/// Read access to the menu plus stock bookkeeping.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Looks a product up by id.
    async fn get_product(&self, product_id: ProductId) -> Result<Option<Product>, DomainError>;

    /// Lists products, optionally restricted to one category, sorted by name.
    async fn list_products(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<Product>, DomainError>;

    /// Lists categories sorted by name.
    async fn list_categories(&self) -> Result<Vec<Category>, DomainError>;

    /// Takes stock for every item, or for none of them.
    ///
    /// Quantities for the same product are summed before checking.
    async fn reserve_stock(&self, items: &[LineItem]) -> Result<(), DomainError>;

    /// Returns stock previously taken by [`Catalog::reserve_stock`].
    async fn release_stock(&self, items: &[LineItem]) -> Result<(), DomainError>;
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    categories: HashMap<CategoryId, Category>,
    products: HashMap<ProductId, Product>,
}

/// In-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_category(&self, category: Category) {
        self.state
            .write()
            .await
            .categories
            .insert(category.id(), category);
    }

    pub async fn add_product(&self, product: Product) {
        self.state
            .write()
            .await
            .products
            .insert(product.id(), product);
    }

    /// Changes a product's price. Orders already placed keep their snapshot.
    pub async fn reprice(&self, product_id: ProductId, price: Money) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let product = state
            .products
            .get_mut(&product_id)
            .ok_or(DomainError::ProductNotFound(product_id))?;
        product.reprice(price)?;
        Ok(())
    }

    /// Returns the number of products.
    pub async fn product_count(&self) -> usize {
        self.state.read().await.products.len()
    }
}

fn summed(items: &[LineItem]) -> HashMap<ProductId, u32> {
    let mut totals: HashMap<ProductId, u32> = HashMap::new();
    for item in items {
        *totals.entry(item.product_id).or_default() += item.quantity;
    }
    totals
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn get_product(&self, product_id: ProductId) -> Result<Option<Product>, DomainError> {
        Ok(self.state.read().await.products.get(&product_id).cloned())
    }

    async fn list_products(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<Product>, DomainError> {
        let state = self.state.read().await;
        let mut products: Vec<_> = state
            .products
            .values()
            .filter(|p| category_id.is_none_or(|id| p.category_id() == id))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(products)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        let state = self.state.read().await;
        let mut categories: Vec<_> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(categories)
    }

    async fn reserve_stock(&self, items: &[LineItem]) -> Result<(), DomainError> {
        let totals = summed(items);
        let mut state = self.state.write().await;

        // Check everything first so a failure leaves stock untouched.
        for (product_id, requested) in &totals {
            let product = state
                .products
                .get(product_id)
                .ok_or(ValidationError::UnknownProduct(*product_id))?;
            if product.stock() < *requested {
                return Err(ValidationError::InsufficientStock {
                    product_id: *product_id,
                    requested: *requested,
                    available: product.stock(),
                }
                .into());
            }
        }

        for (product_id, requested) in totals {
            if let Some(product) = state.products.get_mut(&product_id) {
                product.reserve(requested)?;
            }
        }

        Ok(())
    }

    async fn release_stock(&self, items: &[LineItem]) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        for (product_id, quantity) in summed(items) {
            // Products removed from the menu since the order was placed are skipped.
            if let Some(product) = state.products.get_mut(&product_id) {
                product.release(quantity);
            }
        }
        Ok(())
    }
}
