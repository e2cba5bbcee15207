//! Customer entity and registration.

mod service;
mod tax_id;

pub use service::CustomerService;
pub use tax_id::TaxId;

use common::CustomerId;
use serde::Serialize;
use validator::ValidateEmail;

use crate::error::ValidationError;

/// Maximum number of characters in a customer or product name.
pub const MAX_NAME_LEN: usize = 100;

/// Display name given to anonymous customers.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// A customer placing orders at the kiosk.
///
/// Named customers always carry a non-empty name; anonymous customers never
/// carry an email or tax id. Customers are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    email: Option<String>,
    tax_id: Option<TaxId>,
    anonymous: bool,
}

impl Customer {
    /// Creates a named customer, validating every supplied field.
    pub fn create(
        name: &str,
        email: Option<&str>,
        tax_id: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let name = validate_name(name)?;

        let email = email
            .map(|raw| {
                let email = raw.trim().to_string();
                if email.validate_email() {
                    Ok(email)
                } else {
                    Err(ValidationError::InvalidEmail(raw.to_string()))
                }
            })
            .transpose()?;

        let tax_id = tax_id.map(TaxId::parse).transpose()?;

        Ok(Self {
            id: CustomerId::new(),
            name,
            email,
            tax_id,
            anonymous: false,
        })
    }

    /// Creates an anonymous customer. Never fails.
    pub fn create_anonymous() -> Self {
        Self {
            id: CustomerId::new(),
            name: ANONYMOUS_NAME.to_string(),
            email: None,
            tax_id: None,
            anonymous: true,
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn tax_id(&self) -> Option<&TaxId> {
        self.tax_id.as_ref()
    }

    /// Returns true for customers created through [`Customer::create_anonymous`].
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }
}

/// Trims a display name and enforces the non-empty and length rules.
pub(crate) fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let length = trimmed.chars().count();
    if length > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            length,
            max: MAX_NAME_LEN,
        });
    }

    Ok(trimmed.to_string())
}
