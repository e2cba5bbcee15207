//! Per-order mutual exclusion.

use std::collections::HashMap;
use std::sync::Arc;

use common::OrderId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Hands out one async mutex per order id.
///
/// Orders are independent aggregates, so holding the guard for one order never
/// blocks work on another. Entries nobody holds or waits on are pruned on the
/// next acquisition.
#[derive(Debug, Default)]
pub struct OrderLocks {
    locks: Mutex<HashMap<OrderId, Arc<Mutex<()>>>>,
}

impl OrderLocks {
    /// Creates an empty lock registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `order_id`. Released when the guard drops.
    pub async fn acquire(&self, order_id: OrderId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(order_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Returns the number of orders currently locked or awaited.
    pub async fn active(&self) -> usize {
        self.locks
            .lock()
            .await
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }
}
