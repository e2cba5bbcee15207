//! Record of applied payment outcomes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::OrderId;
use domain::DomainError;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::webhook::PaymentOutcome;

/// An outcome that changed an order's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub order_id: OrderId,
    pub provider_payment_id: Option<String>,
    pub outcome: PaymentOutcome,
    pub received_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Creates a record stamped with the current time.
    pub fn new(
        order_id: OrderId,
        provider_payment_id: Option<String>,
        outcome: PaymentOutcome,
    ) -> Self {
        Self {
            order_id,
            provider_payment_id,
            outcome,
            received_at: Utc::now(),
        }
    }
}

/// Payment state of an order as customers see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// No outcome received yet.
    Pending,
    Approved,
    Rejected,
}

impl From<PaymentOutcome> for PaymentStatus {
    fn from(outcome: PaymentOutcome) -> Self {
        match outcome {
            PaymentOutcome::Approved => PaymentStatus::Approved,
            PaymentOutcome::Rejected => PaymentStatus::Rejected,
        }
    }
}

/// Storage for payment records.
#[async_trait]
pub trait PaymentLedger: Send + Sync {
    async fn record(&self, record: PaymentRecord) -> Result<(), DomainError>;

    /// Returns the most recent record for an order.
    async fn latest_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<PaymentRecord>, DomainError>;
}

/// In-memory payment ledger.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentLedger {
    records: Arc<RwLock<HashMap<OrderId, Vec<PaymentRecord>>>>,
}

impl InMemoryPaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every record for an order, oldest first.
    pub async fn records_for(&self, order_id: OrderId) -> Vec<PaymentRecord> {
        self.records
            .read()
            .await
            .get(&order_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl PaymentLedger for InMemoryPaymentLedger {
    async fn record(&self, record: PaymentRecord) -> Result<(), DomainError> {
        self.records
            .write()
            .await
            .entry(record.order_id)
            .or_default()
            .push(record);
        Ok(())
    }

    async fn latest_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<PaymentRecord>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .get(&order_id)
            .and_then(|records| records.last().cloned()))
    }
}
