//! Applies payment outcomes to orders.

use std::sync::Arc;

use common::OrderId;
use domain::{Catalog, Order, OrderRepository, OrderService, OrderStatus, StatusUpdate};
use serde::Serialize;

use crate::error::{ReconciliationError, Result};
use crate::gateway::{PaymentGateway, PaymentIntent};
use crate::ledger::{PaymentLedger, PaymentRecord, PaymentStatus};
use crate::webhook::{PaymentOutcome, PaymentWebhook};

/// What a webhook delivery did.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookReceipt {
    pub order: Order,

    /// True when the order was already in the outcome's target status.
    pub duplicate: bool,
}

/// Turns provider notifications into order status changes.
///
/// Each outcome is applied at most once per order: the check for an earlier
/// delivery runs under the order's lock, so concurrent duplicates cannot both
/// transition.
pub struct PaymentReconciler<C, R, L, G>
where
    C: Catalog,
    R: OrderRepository,
    L: PaymentLedger,
    G: PaymentGateway,
{
    orders: Arc<OrderService<C, R>>,
    ledger: L,
    gateway: G,
}

impl<C, R, L, G> PaymentReconciler<C, R, L, G>
where
    C: Catalog,
    R: OrderRepository,
    L: PaymentLedger,
    G: PaymentGateway,
{
    /// Creates a reconciler sharing the given order service.
    pub fn new(orders: Arc<OrderService<C, R>>, ledger: L, gateway: G) -> Self {
        Self {
            orders,
            ledger,
            gateway,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Applies `outcome` to an order.
    ///
    /// A `RECEIVED` order moves to the outcome's target status. An order
    /// already in that status is returned unchanged. Any other status is an
    /// [`ReconciliationError::UnexpectedState`].
    #[tracing::instrument(skip(self))]
    pub async fn reconcile(&self, order_id: OrderId, outcome: PaymentOutcome) -> Result<Order> {
        self.apply(order_id, outcome, None)
            .await
            .map(|update| update.order)
    }

    /// Handles one webhook delivery.
    #[tracing::instrument(skip(self, webhook), fields(
        order_reference = %webhook.order_reference,
        outcome = %webhook.outcome,
    ))]
    pub async fn handle_webhook(&self, webhook: &PaymentWebhook) -> Result<WebhookReceipt> {
        let result = match OrderId::parse_str(webhook.order_reference.trim()) {
            Ok(order_id) => {
                self.apply(
                    order_id,
                    webhook.outcome,
                    Some(webhook.provider_payment_id.clone()),
                )
                .await
            }
            Err(_) => Err(ReconciliationError::InvalidOrderReference(
                webhook.order_reference.clone(),
            )),
        };

        let label = match &result {
            Ok(update) if update.changed => "applied",
            Ok(_) => "duplicate",
            Err(ReconciliationError::UnexpectedState { .. }) => "unexpected_state",
            Err(ReconciliationError::OrderNotFound(_)) => "not_found",
            Err(ReconciliationError::InvalidOrderReference(_)) => "invalid_reference",
            Err(_) => "error",
        };
        metrics::counter!(
            "payment_webhooks_total",
            "outcome" => webhook.outcome.as_str(),
            "result" => label
        )
        .increment(1);

        result.map(|update| WebhookReceipt {
            duplicate: !update.changed,
            order: update.order,
        })
    }

    /// Returns the payment state of an order.
    pub async fn payment_status(&self, order_id: OrderId) -> Result<PaymentStatus> {
        self.orders.order(order_id).await?;
        let latest = self.ledger.latest_for_order(order_id).await?;
        Ok(latest.map_or(PaymentStatus::Pending, |record| record.outcome.into()))
    }

    /// Requests a QR-code payment for an order awaiting payment.
    #[tracing::instrument(skip(self))]
    pub async fn request_payment(&self, order_id: OrderId) -> Result<PaymentIntent> {
        let order = self.orders.order(order_id).await?;
        if order.status() != OrderStatus::Received {
            return Err(ReconciliationError::NotAwaitingPayment {
                order_id,
                status: order.status(),
            });
        }

        let intent = self
            .gateway
            .create_payment_intent(order_id, order.total())
            .await?;
        tracing::info!(
            order_id = %order_id,
            provider_payment_id = %intent.provider_payment_id,
            amount = %intent.amount,
            "payment intent created"
        );
        Ok(intent)
    }

    async fn apply(
        &self,
        order_id: OrderId,
        outcome: PaymentOutcome,
        provider_payment_id: Option<String>,
    ) -> Result<StatusUpdate> {
        let target = outcome.target_status();

        self.orders
            .execute_then(
                order_id,
                |order| match order.status() {
                    OrderStatus::Received => Ok(Some(target)),
                    status if status == target => Ok(None),
                    status => {
                        tracing::warn!(
                            order_id = %order_id,
                            status = %status,
                            outcome = %outcome,
                            "payment outcome does not fit order status"
                        );
                        Err(ReconciliationError::UnexpectedState {
                            order_id,
                            status,
                            outcome,
                        })
                    }
                },
                move |update| async move {
                    self.record_outcome(&update, outcome, provider_payment_id)
                        .await?;
                    Ok::<_, ReconciliationError>(update)
                },
            )
            .await
    }

    /// Writes the ledger entry for an applied outcome.
    ///
    /// Runs under the order's lock. A redelivery of an outcome whose record is
    /// missing, because the write failed after the status change was saved,
    /// records it then.
    async fn record_outcome(
        &self,
        update: &StatusUpdate,
        outcome: PaymentOutcome,
        provider_payment_id: Option<String>,
    ) -> Result<()> {
        let order_id = update.order.id();
        if !update.changed {
            let latest = self.ledger.latest_for_order(order_id).await?;
            if latest.is_some_and(|record| record.outcome == outcome) {
                tracing::info!(order_id = %order_id, outcome = %outcome, "duplicate payment outcome ignored");
                return Ok(());
            }
            tracing::warn!(order_id = %order_id, outcome = %outcome, "recording payment outcome missing from ledger");
        }

        self.ledger
            .record(PaymentRecord::new(order_id, provider_payment_id, outcome))
            .await?;
        Ok(())
    }
}
