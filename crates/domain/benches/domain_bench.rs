use std::collections::HashMap;

use common::{CustomerId, ProductId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    Category, InMemoryCatalog, InMemoryOrderRepository, LineItem, Money, Order, OrderService,
    OrderStatus, Product,
};

fn menu(count: usize) -> HashMap<ProductId, Product> {
    let category = Category::create("Bench").unwrap();
    (0..count)
        .map(|i| {
            let product = Product::create(
                &format!("Product {i}"),
                "",
                Money::from_cents(100 * (i as i64 + 1)),
                category.id(),
                1_000_000,
            )
            .unwrap();
            (product.id(), product)
        })
        .collect()
}

fn bench_create_order(c: &mut Criterion) {
    let products = menu(20);
    let items: Vec<_> = products.keys().map(|id| LineItem::new(*id, 2)).collect();

    c.bench_function("domain/create_order_20_items", |b| {
        b.iter(|| Order::create(CustomerId::new(), items.clone(), &products).unwrap());
    });
}

fn bench_transition_table(c: &mut Criterion) {
    let products = menu(1);
    let items: Vec<_> = products.keys().map(|id| LineItem::new(*id, 1)).collect();
    let order = Order::create(CustomerId::new(), items, &products).unwrap();

    c.bench_function("domain/full_lifecycle_in_memory", |b| {
        b.iter(|| {
            order
                .update_status(OrderStatus::Paid)
                .and_then(|o| o.update_status(OrderStatus::Preparing))
                .and_then(|o| o.update_status(OrderStatus::Ready))
                .and_then(|o| o.update_status(OrderStatus::Finalized))
                .unwrap()
        });
    });
}

fn bench_checkout(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let catalog = InMemoryCatalog::new();
    let products = menu(5);
    let items: Vec<_> = products.keys().map(|id| LineItem::new(*id, 1)).collect();
    rt.block_on(async {
        for product in products.into_values() {
            catalog.add_product(product).await;
        }
    });
    let service = OrderService::new(catalog, InMemoryOrderRepository::new());

    c.bench_function("domain/checkout_5_items", |b| {
        b.iter(|| {
            rt.block_on(async {
                service
                    .checkout(CustomerId::new(), items.clone())
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_checkout_and_progress(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let catalog = InMemoryCatalog::new();
    let products = menu(1);
    let items: Vec<_> = products.keys().map(|id| LineItem::new(*id, 1)).collect();
    rt.block_on(async {
        for product in products.into_values() {
            catalog.add_product(product).await;
        }
    });
    let service = OrderService::new(catalog, InMemoryOrderRepository::new());

    c.bench_function("domain/checkout_to_finalized", |b| {
        b.iter(|| {
            rt.block_on(async {
                let order = service
                    .checkout(CustomerId::new(), items.clone())
                    .await
                    .unwrap();
                for status in [
                    OrderStatus::Paid,
                    OrderStatus::Preparing,
                    OrderStatus::Ready,
                    OrderStatus::Finalized,
                ] {
                    service.update_status(order.id(), status).await.unwrap();
                }
            });
        });
    });
}

criterion_group!(
    benches,
    bench_create_order,
    bench_transition_table,
    bench_checkout,
    bench_checkout_and_progress,
);
criterion_main!(benches);
