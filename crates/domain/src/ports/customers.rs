//! Customer repository trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::CustomerId;
use tokio::sync::RwLock;

use crate::customer::{Customer, TaxId};
use crate::error::DomainError;

/// Persistence for registered customers.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Stores a customer.
    ///
    /// Fails with [`DomainError::DuplicateTaxId`] when a different customer
    /// already holds the same tax id.
    async fn save(&self, customer: &Customer) -> Result<(), DomainError>;

    /// Looks a customer up by id.
    async fn find_by_id(&self, customer_id: CustomerId) -> Result<Option<Customer>, DomainError>;

    /// Looks a customer up by normalized tax id.
    async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Customer>, DomainError>;
}

#[derive(Debug, Default)]
struct InMemoryCustomerState {
    customers: HashMap<CustomerId, Customer>,
    by_tax_id: HashMap<TaxId, CustomerId>,
}

/// In-memory customer repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerRepository {
    state: Arc<RwLock<InMemoryCustomerState>>,
}

impl InMemoryCustomerRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored customers.
    pub async fn customer_count(&self) -> usize {
        self.state.read().await.customers.len()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn save(&self, customer: &Customer) -> Result<(), DomainError> {
        let mut state = self.state.write().await;

        if let Some(tax_id) = customer.tax_id() {
            match state.by_tax_id.get(tax_id).copied() {
                Some(owner) if owner != customer.id() => {
                    return Err(DomainError::DuplicateTaxId(tax_id.to_string()));
                }
                _ => {
                    state.by_tax_id.insert(tax_id.clone(), customer.id());
                }
            }
        }

        state.customers.insert(customer.id(), customer.clone());
        Ok(())
    }

    async fn find_by_id(&self, customer_id: CustomerId) -> Result<Option<Customer>, DomainError> {
        Ok(self.state.read().await.customers.get(&customer_id).cloned())
    }

    async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Customer>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .by_tax_id
            .get(tax_id)
            .and_then(|id| state.customers.get(id))
            .cloned())
    }
}
