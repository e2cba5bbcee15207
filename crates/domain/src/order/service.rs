//! Order service: checkout and status progression.

use std::collections::HashMap;
use std::future::{self, Future};
use std::sync::Arc;
use std::time::Instant;

use common::{CustomerId, OrderId};

use crate::error::{DomainError, ValidationError};
use crate::ports::{Catalog, OrderRepository};

use super::{LineItem, Order, OrderLocks, OrderStatus};

/// Outcome of [`OrderService::execute`].
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    /// The order as stored after the call.
    pub order: Order,

    /// Status before the call.
    pub previous: OrderStatus,

    /// False when the decision was a no-op and nothing was saved.
    pub changed: bool,
}

/// Service for placing and progressing orders.
///
/// Every status change goes through [`OrderService::execute`], which holds the
/// per-order lock from load to save. The repository's version check backs the
/// lock up across processes.
pub struct OrderService<C: Catalog, R: OrderRepository> {
    catalog: C,
    repository: R,
    locks: Arc<OrderLocks>,
}

impl<C: Catalog, R: OrderRepository> OrderService<C, R> {
    /// Creates a new order service with its own lock registry.
    pub fn new(catalog: C, repository: R) -> Self {
        Self::with_locks(catalog, repository, Arc::new(OrderLocks::new()))
    }

    /// Creates a new order service sharing an existing lock registry.
    pub fn with_locks(catalog: C, repository: R, locks: Arc<OrderLocks>) -> Self {
        Self {
            catalog,
            repository,
            locks,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn locks(&self) -> &Arc<OrderLocks> {
        &self.locks
    }

    /// Places an order: validates composition, prices it from the catalog,
    /// reserves stock and stores it in `RECEIVED`.
    #[tracing::instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn checkout(
        &self,
        customer_id: CustomerId,
        items: Vec<LineItem>,
    ) -> Result<Order, DomainError> {
        let started = Instant::now();

        // Reject malformed requests before touching the catalog.
        Order::check_items(&items)?;

        let mut products = HashMap::with_capacity(items.len());
        for item in &items {
            if products.contains_key(&item.product_id) {
                continue;
            }
            let product = self
                .catalog
                .get_product(item.product_id)
                .await?
                .ok_or(ValidationError::UnknownProduct(item.product_id))?;
            products.insert(item.product_id, product);
        }

        let mut order = Order::create(customer_id, items, &products)?;
        let reserved = order.line_items();
        self.catalog.reserve_stock(&reserved).await?;

        match self.repository.save(&order).await {
            Ok(version) => order.set_version(version),
            Err(e) => {
                self.release(order.id(), &reserved).await;
                return Err(e);
            }
        }

        metrics::counter!("orders_created_total").increment(1);
        metrics::histogram!("checkout_duration_seconds").record(started.elapsed().as_secs_f64());
        tracing::info!(order_id = %order.id(), total = %order.total(), "order received");

        Ok(order)
    }

    /// Loads an order, returning None if it doesn't exist.
    pub async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>, DomainError> {
        self.repository.find_by_id(order_id).await
    }

    /// Loads an order, failing if it doesn't exist.
    pub async fn order(&self, order_id: OrderId) -> Result<Order, DomainError> {
        self.get_order(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))
    }

    /// Returns open orders in kitchen-queue order.
    pub async fn queue(&self) -> Result<Vec<Order>, DomainError> {
        self.repository.list_ordered_by_priority().await
    }

    /// Moves an order to `target`, failing with
    /// [`DomainError::Transition`] if the lifecycle forbids it.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: OrderId,
        target: OrderStatus,
    ) -> Result<Order, DomainError> {
        self.execute(order_id, |_| Ok::<_, DomainError>(Some(target)))
            .await
            .map(|update| update.order)
    }

    /// Runs a status decision against the current order under its lock.
    ///
    /// `decide` sees the freshly loaded order and returns the target status,
    /// or `None` to leave the order as it is. A chosen target still has to
    /// pass the transition table. Cancelling returns the order's stock to the
    /// catalog.
    pub async fn execute<F, E>(&self, order_id: OrderId, decide: F) -> Result<StatusUpdate, E>
    where
        F: FnOnce(&Order) -> Result<Option<OrderStatus>, E>,
        E: From<DomainError>,
    {
        self.execute_then(order_id, decide, |update| future::ready(Ok(update)))
            .await
    }

    /// Like [`OrderService::execute`], then hands the result to `after`
    /// before the order's lock is released.
    ///
    /// `after` also runs when `decide` chose no change, so follow-up writes
    /// that failed on an earlier call can be completed by a retry.
    pub async fn execute_then<F, A, Fut, E>(
        &self,
        order_id: OrderId,
        decide: F,
        after: A,
    ) -> Result<StatusUpdate, E>
    where
        F: FnOnce(&Order) -> Result<Option<OrderStatus>, E>,
        A: FnOnce(StatusUpdate) -> Fut,
        Fut: Future<Output = Result<StatusUpdate, E>>,
        E: From<DomainError>,
    {
        let _guard = self.locks.acquire(order_id).await;

        let order = self
            .repository
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))?;
        let previous = order.status();

        let Some(target) = decide(&order)? else {
            return after(StatusUpdate {
                order,
                previous,
                changed: false,
            })
            .await;
        };

        let mut updated = order.update_status(target).map_err(DomainError::from)?;
        let version = self.repository.save(&updated).await?;
        updated.set_version(version);

        metrics::counter!(
            "order_status_transitions_total",
            "from" => previous.as_str(),
            "to" => target.as_str()
        )
        .increment(1);
        tracing::info!(order_id = %order_id, from = %previous, to = %target, "order status changed");

        if target == OrderStatus::Cancelled {
            self.release(order_id, &updated.line_items()).await;
        }

        after(StatusUpdate {
            order: updated,
            previous,
            changed: true,
        })
        .await
    }

    async fn release(&self, order_id: OrderId, items: &[LineItem]) {
        if let Err(e) = self.catalog.release_stock(items).await {
            tracing::error!(order_id = %order_id, error = %e, "failed to release reserved stock");
        }
    }
}
