//! Payment gateway trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::OrderId;
use domain::Money;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::GatewayError;

/// A payment the customer can settle by scanning a QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentIntent {
    /// The payment ID assigned by the provider.
    pub provider_payment_id: String,

    /// Payload to render as a QR code.
    pub qr_code: String,

    pub amount: Money,
}

/// Trait for the payment provider's outbound API.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Asks the provider for a payment intent covering `amount`.
    async fn create_payment_intent(
        &self,
        order_id: OrderId,
        amount: Money,
    ) -> Result<PaymentIntent, GatewayError>;
}

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    intents: HashMap<String, (OrderId, Money)>,
    next_id: u32,
    fail: bool,
}

/// In-memory payment gateway for tests and the demo server.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentGateway {
    state: Arc<Mutex<InMemoryGatewayState>>,
}

impl InMemoryPaymentGateway {
    /// Creates a new in-memory gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following intent request fail.
    pub async fn set_unavailable(&self, fail: bool) {
        self.state.lock().await.fail = fail;
    }

    /// Returns the number of intents created.
    pub async fn intent_count(&self) -> usize {
        self.state.lock().await.intents.len()
    }

    /// Returns the order an intent was created for.
    pub async fn order_for(&self, provider_payment_id: &str) -> Option<OrderId> {
        self.state
            .lock()
            .await
            .intents
            .get(provider_payment_id)
            .map(|(order_id, _)| *order_id)
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn create_payment_intent(
        &self,
        order_id: OrderId,
        amount: Money,
    ) -> Result<PaymentIntent, GatewayError> {
        let mut state = self.state.lock().await;

        if state.fail {
            return Err(GatewayError::Unavailable(
                "provider did not respond".to_string(),
            ));
        }

        state.next_id += 1;
        let provider_payment_id = format!("PAY-{:04}", state.next_id);
        state
            .intents
            .insert(provider_payment_id.clone(), (order_id, amount));

        Ok(PaymentIntent {
            qr_code: format!("pay://{provider_payment_id}?order={order_id}&amount={amount}"),
            provider_payment_id,
            amount,
        })
    }
}
