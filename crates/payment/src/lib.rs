//! Payment handling for the ordering system.
//!
//! This crate provides:
//! - The payment provider's webhook contract
//! - Idempotent reconciliation of payment outcomes onto order status
//! - A gateway trait for payment intents (QR codes)
//! - A ledger of applied payment outcomes

pub mod error;
pub mod gateway;
pub mod ledger;
pub mod reconciler;
pub mod webhook;

pub use error::{GatewayError, ReconciliationError, Result};
pub use gateway::{InMemoryPaymentGateway, PaymentGateway, PaymentIntent};
pub use ledger::{InMemoryPaymentLedger, PaymentLedger, PaymentRecord, PaymentStatus};
pub use reconciler::{PaymentReconciler, WebhookReceipt};
pub use webhook::{PaymentOutcome, PaymentWebhook};
