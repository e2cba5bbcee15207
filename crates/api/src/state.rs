//! Shared application state.

use std::sync::Arc;

use domain::{
    CustomerService, InMemoryCatalog, InMemoryCustomerRepository, InMemoryOrderRepository,
    OrderService,
};
use payment::{InMemoryPaymentGateway, InMemoryPaymentLedger, PaymentReconciler};

pub type Orders = OrderService<InMemoryCatalog, InMemoryOrderRepository>;
pub type Customers = CustomerService<InMemoryCustomerRepository>;
pub type Payments = PaymentReconciler<
    InMemoryCatalog,
    InMemoryOrderRepository,
    InMemoryPaymentLedger,
    InMemoryPaymentGateway,
>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub catalog: InMemoryCatalog,
    pub customers: Customers,
    pub orders: Arc<Orders>,
    pub payments: Payments,
}

impl AppState {
    /// Wires the services over fresh in-memory stores.
    ///
    /// Kitchen updates and payment reconciliation share one order service,
    /// and with it one set of per-order locks.
    pub fn in_memory() -> Self {
        let catalog = InMemoryCatalog::new();
        let orders = Arc::new(OrderService::new(
            catalog.clone(),
            InMemoryOrderRepository::new(),
        ));
        let payments = PaymentReconciler::new(
            orders.clone(),
            InMemoryPaymentLedger::new(),
            InMemoryPaymentGateway::new(),
        );

        Self {
            catalog,
            customers: CustomerService::new(InMemoryCustomerRepository::new()),
            orders,
            payments,
        }
    }
}
