//! Webhook contract of the payment provider.

use domain::OrderStatus;
use serde::{Deserialize, Serialize};

/// Result of a payment attempt as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentOutcome {
    Approved,
    Rejected,
}

impl PaymentOutcome {
    /// The order status this outcome moves a `RECEIVED` order to.
    pub fn target_status(&self) -> OrderStatus {
        match self {
            PaymentOutcome::Approved => OrderStatus::Paid,
            PaymentOutcome::Rejected => OrderStatus::Cancelled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentOutcome::Approved => "APPROVED",
            PaymentOutcome::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for PaymentOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment notification delivered by the provider.
///
/// Authentication happens before this type is built. The provider may deliver
/// the same notification more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWebhook {
    /// Order id as the provider echoes it back.
    pub order_reference: String,

    pub outcome: PaymentOutcome,

    /// The provider's own payment id.
    pub provider_payment_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_status() {
        assert_eq!(PaymentOutcome::Approved.target_status(), OrderStatus::Paid);
        assert_eq!(
            PaymentOutcome::Rejected.target_status(),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn test_webhook_wire_format() {
        let json = r#"{
            "orderReference": "0b6c7f0e-8d0a-4d4c-9f5e-2f1f3a7f9c11",
            "outcome": "APPROVED",
            "providerPaymentId": "PAY-0001"
        }"#;

        let webhook: PaymentWebhook = serde_json::from_str(json).unwrap();
        assert_eq!(webhook.outcome, PaymentOutcome::Approved);
        assert_eq!(webhook.provider_payment_id, "PAY-0001");

        let value = serde_json::to_value(&webhook).unwrap();
        assert_eq!(value["orderReference"], webhook.order_reference.as_str());
    }

    #[test]
    fn test_unknown_outcome_is_rejected() {
        let json = r#"{"orderReference": "x", "outcome": "PENDING", "providerPaymentId": "p"}"#;
        assert!(serde_json::from_str::<PaymentWebhook>(json).is_err());
    }
}
