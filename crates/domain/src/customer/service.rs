//! Customer registration and lookup.

use common::CustomerId;

use crate::error::DomainError;
use crate::ports::CustomerRepository;

use super::{Customer, TaxId};

/// Registers customers and resolves them for checkout.
pub struct CustomerService<R: CustomerRepository> {
    repository: R,
}

impl<R: CustomerRepository> CustomerService<R> {
    /// Creates a new customer service over the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Returns the customer already registered under `tax_id`, or registers a
    /// new one from the supplied details.
    #[tracing::instrument(skip(self, email, tax_id))]
    pub async fn register_or_get(
        &self,
        name: &str,
        email: Option<&str>,
        tax_id: Option<&str>,
    ) -> Result<Customer, DomainError> {
        let customer = Customer::create(name, email, tax_id)?;

        if let Some(tax_id) = customer.tax_id()
            && let Some(existing) = self.repository.find_by_tax_id(tax_id).await?
        {
            tracing::debug!(customer_id = %existing.id(), "customer already registered");
            return Ok(existing);
        }

        match self.repository.save(&customer).await {
            Ok(()) => {
                tracing::info!(customer_id = %customer.id(), "customer registered");
                Ok(customer)
            }
            // Lost a race with a concurrent registration of the same tax id.
            Err(DomainError::DuplicateTaxId(_)) => self.existing_by_tax_id(&customer).await,
            Err(e) => Err(e),
        }
    }

    /// Registers a fresh anonymous customer.
    pub async fn register_anonymous(&self) -> Result<Customer, DomainError> {
        let customer = Customer::create_anonymous();
        self.register(&customer).await?;
        Ok(customer)
    }

    /// Stores an already constructed customer.
    ///
    /// Lets callers create an anonymous customer up front and persist it only
    /// once the work it was created for has succeeded.
    pub async fn register(&self, customer: &Customer) -> Result<(), DomainError> {
        self.repository.save(customer).await?;
        tracing::debug!(customer_id = %customer.id(), anonymous = customer.is_anonymous(), "customer stored");
        Ok(())
    }

    /// Loads a customer, failing if it does not exist.
    pub async fn get(&self, customer_id: CustomerId) -> Result<Customer, DomainError> {
        self.repository
            .find_by_id(customer_id)
            .await?
            .ok_or(DomainError::CustomerNotFound(customer_id))
    }

    /// Looks a customer up by a raw (possibly punctuated) tax id.
    pub async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Customer>, DomainError> {
        let tax_id = TaxId::parse(tax_id)?;
        self.repository.find_by_tax_id(&tax_id).await
    }

    async fn existing_by_tax_id(&self, customer: &Customer) -> Result<Customer, DomainError> {
        let Some(tax_id) = customer.tax_id() else {
            return Err(DomainError::Storage(
                "duplicate tax id reported for customer without tax id".to_string(),
            ));
        };
        self.repository
            .find_by_tax_id(tax_id)
            .await?
            .ok_or_else(|| DomainError::DuplicateTaxId(tax_id.to_string()))
    }
}
