use std::hint::black_box;

use common::{Address, ProductId, ProductQuantities, ShoppingCartId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{DeliveryCostConfig, Dimension, Order, OrderOperation, Parcel, Stock, WarehouseProduct};

fn bench_delivery_cost(c: &mut Criterion) {
    let config = DeliveryCostConfig::default();
    let warehouse = Address::marker("ADDRESS_2");
    let destination = Address::new("RU", "Moscow", "Tverskaya", "1", "10");
    let parcel = Parcel::new(10.0, 5.0, true);

    c.bench_function("domain/delivery_cost", |b| {
        b.iter(|| config.calculate(black_box(&warehouse), black_box(&destination), black_box(parcel)));
    });
}

fn bench_order_lifecycle(c: &mut Criterion) {
    let products: ProductQuantities = (0..10).map(|_| (ProductId::new(), 2)).collect();

    c.bench_function("domain/order_lifecycle", |b| {
        b.iter(|| {
            let mut order = Order::new("bench", ShoppingCartId::new(), products.clone(), None).unwrap();
            for op in [
                OrderOperation::SendToAssembly,
                OrderOperation::Pay,
                OrderOperation::SendToDelivery,
                OrderOperation::Complete,
                OrderOperation::ReturnProducts,
            ] {
                order.apply(op).unwrap();
            }
            black_box(order)
        });
    });
}

fn bench_stock_check(c: &mut Criterion) {
    let mut stock = Stock::new();
    let mut cart = ProductQuantities::new();
    for _ in 0..50 {
        let product = WarehouseProduct {
            product_id: ProductId::new(),
            fragile: false,
            dimension: Dimension {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            weight: 1.0,
            quantity: 100,
        };
        cart.insert(product.product_id, 3);
        stock.add_new_product(product).unwrap();
    }

    c.bench_function("domain/stock_check_50_products", |b| {
        b.iter(|| stock.check(black_box(&cart)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_delivery_cost,
    bench_order_lifecycle,
    bench_stock_check
);
criterion_main!(benches);
