//! Builds the services and connects them through in-process clients.

use std::sync::{Arc, Weak};

use common::Address;
use document_store::{InMemoryRepository, Repository};
use domain::{Delivery, DeliveryCostConfig, Order, Payment};

use crate::clients::{
    LocalDeliveryClient, LocalOrderClient, LocalPaymentClient, LocalWarehouseClient,
    ProductCatalog,
};
use crate::services::{DeliveryService, OrderService, PaymentService, WarehouseService};

/// Settings shared by the wired services.
#[derive(Debug, Clone, PartialEq)]
pub struct ServicesConfig {
    pub delivery_cost: DeliveryCostConfig,
    pub warehouse_address: Address,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            delivery_cost: DeliveryCostConfig::default(),
            warehouse_address: Address::marker("ADDRESS_1"),
        }
    }
}

/// One repository per service.
pub struct Stores<O, D, P> {
    pub orders: O,
    pub deliveries: D,
    pub payments: P,
}

impl Stores<InMemoryRepository<Order>, InMemoryRepository<Delivery>, InMemoryRepository<Payment>> {
    pub fn in_memory() -> Self {
        Self {
            orders: InMemoryRepository::new(),
            deliveries: InMemoryRepository::new(),
            payments: InMemoryRepository::new(),
        }
    }
}

/// The clients each service uses to reach the others.
pub struct Links<O: Repository<Order>, D: Repository<Delivery>, P: Repository<Payment>> {
    pub warehouse: Arc<LocalWarehouseClient>,
    pub payment: Arc<LocalPaymentClient<P>>,
    pub delivery: Arc<LocalDeliveryClient<D>>,
    pub order: Arc<LocalOrderClient<O>>,
}

/// All services, wired together.
pub struct Services<O: Repository<Order>, D: Repository<Delivery>, P: Repository<Payment>> {
    pub orders: Arc<OrderService<O>>,
    pub deliveries: Arc<DeliveryService<D>>,
    pub payments: Arc<PaymentService<P>>,
    pub warehouse: Arc<WarehouseService>,
    pub links: Links<O, D, P>,
}

/// Wires the services together.
///
/// Order and delivery call each other, so the order service is built with
/// [`Arc::new_cyclic`] and the delivery side reaches it through a weak
/// reference.
pub fn wire<O, D, P>(
    stores: Stores<O, D, P>,
    config: ServicesConfig,
    catalog: Arc<dyn ProductCatalog>,
) -> Services<O, D, P>
where
    O: Repository<Order> + 'static,
    D: Repository<Delivery> + 'static,
    P: Repository<Payment> + 'static,
{
    let Stores {
        orders,
        deliveries,
        payments,
    } = stores;

    let warehouse = Arc::new(WarehouseService::new(config.warehouse_address));
    let warehouse_client = Arc::new(LocalWarehouseClient::new(warehouse.clone()));

    let payments = Arc::new(PaymentService::new(payments, catalog));
    let payment_client = Arc::new(LocalPaymentClient::new(payments.clone()));

    let mut delivery_side = None;
    let orders = Arc::new_cyclic(|weak: &Weak<OrderService<O>>| {
        let order_client = Arc::new(LocalOrderClient::new(weak.clone()));
        let deliveries = Arc::new(DeliveryService::new(
            deliveries,
            warehouse_client.clone(),
            order_client.clone(),
            config.delivery_cost,
        ));
        let delivery_client = Arc::new(LocalDeliveryClient::new(deliveries.clone()));

        let service = OrderService::new(
            orders,
            warehouse_client.clone(),
            payment_client.clone(),
            delivery_client.clone(),
        );
        delivery_side = Some((deliveries, delivery_client, order_client));
        service
    });

    let Some((deliveries, delivery_client, order_client)) = delivery_side else {
        unreachable!("Arc::new_cyclic runs its initializer exactly once");
    };

    tracing::debug!("services wired");

    Services {
        orders,
        deliveries,
        payments,
        warehouse,
        links: Links {
            warehouse: warehouse_client,
            payment: payment_client,
            delivery: delivery_client,
            order: order_client,
        },
    }
}
