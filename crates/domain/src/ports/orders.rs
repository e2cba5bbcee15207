//! Order repository trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, Version};
use tokio::sync::RwLock;

use crate::error::DomainError;
use crate::order::Order;

/// Persistence for orders with optimistic concurrency.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Stores an order and returns its new version.
    ///
    /// The stored version must equal `order.version()` (initial for a new
    /// order), otherwise this fails with [`DomainError::ConcurrencyConflict`].
    async fn save(&self, order: &Order) -> Result<Version, DomainError>;

    /// Looks an order up by id.
    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, DomainError>;

    /// Lists non-terminal orders: ready first, then preparing, paid and
    /// received, oldest first within each status.
    async fn list_ordered_by_priority(&self) -> Result<Vec<Order>, DomainError>;
}

/// In-memory order repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders, terminal ones included.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &Order) -> Result<Version, DomainError> {
        let mut orders = self.orders.write().await;

        let current = orders
            .get(&order.id())
            .map(Order::version)
            .unwrap_or(Version::initial());

        if current != order.version() {
            return Err(DomainError::ConcurrencyConflict {
                order_id: order.id(),
                expected: order.version(),
                actual: current,
            });
        }

        let next = current.next();
        let mut stored = order.clone();
        stored.set_version(next);
        orders.insert(order.id(), stored);

        Ok(next)
    }

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.read().await.get(&order_id).cloned())
    }

    async fn list_ordered_by_priority(&self) -> Result<Vec<Order>, DomainError> {
        let orders = self.orders.read().await;
        let mut queued: Vec<_> = orders
            .values()
            .filter_map(|order| {
                order
                    .status()
                    .queue_priority()
                    .map(|priority| (priority, order))
            })
            .collect();
        queued.sort_by_key(|(priority, order)| (*priority, order.created_at(), order.id()));
        Ok(queued.into_iter().map(|(_, order)| order.clone()).collect())
    }
}
