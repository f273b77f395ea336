//! In-process client adapters.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use common::{Address, DeliveryId, OrderId, ProductQuantities};
use document_store::Repository;
use domain::{BookedProducts, Booking, Delivery, Order, Payment};

use super::{
    DeliveryClient, DeliveryCostRequest, NewDelivery, OrderClient, OrderCost, PaymentClient,
    WarehouseClient,
};
use crate::error::{Result, SagaError};
use crate::services::{DeliveryService, OrderService, PaymentService, WarehouseService};

/// The connection to one downstream service.
///
/// Every outbound call goes through [`Link::call`], which counts it,
/// classifies its error and records failures. A link can be switched off
/// to simulate the service being down.
#[derive(Debug)]
pub struct Link {
    service: &'static str,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl Link {
    pub fn new(service: &'static str) -> Self {
        Self {
            service,
            unavailable: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Name of the service on the other end.
    pub fn service(&self) -> &'static str {
        self.service
    }

    /// Makes every following call fail with `UpstreamUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of calls attempted over this link.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Sends one request over the link.
    pub async fn call<T, F>(&self, request: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let result = if self.unavailable.load(Ordering::SeqCst) {
            Err(SagaError::UpstreamUnavailable {
                service: self.service,
                reason: "connection refused".to_string(),
            })
        } else {
            request.await.map_err(|err| err.from_upstream(self.service))
        };

        if let Err(err) = &result {
            metrics::counter!(
                "downstream_failures_total",
                "service" => self.service,
                "kind" => err.kind().as_str()
            )
            .increment(1);
            tracing::warn!(service = self.service, error = %err, "downstream call failed");
        }

        result
    }
}

/// Warehouse client backed by an in-process [`WarehouseService`].
pub struct LocalWarehouseClient {
    service: Arc<WarehouseService>,
    link: Link,
}

impl LocalWarehouseClient {
    pub fn new(service: Arc<WarehouseService>) -> Self {
        Self {
            service,
            link: Link::new("warehouse"),
        }
    }

    pub fn link(&self) -> &Link {
        &self.link
    }
}

#[async_trait]
impl WarehouseClient for LocalWarehouseClient {
    async fn check_products_quantity(&self, cart: &ProductQuantities) -> Result<BookedProducts> {
        self.link
            .call(self.service.check_products_quantity(cart))
            .await
    }

    async fn assembly_products_for_order(
        &self,
        order_id: OrderId,
        products: &ProductQuantities,
    ) -> Result<Booking> {
        self.link
            .call(self.service.assembly_products_for_order(order_id, products))
            .await
    }

    async fn ship_products_to_delivery(&self, order_id: OrderId, delivery_id: DeliveryId) -> Result<()> {
        self.link
            .call(self.service.ship_products_to_delivery(order_id, delivery_id))
            .await
    }

    async fn return_products(&self, products: &ProductQuantities) -> Result<()> {
        self.link.call(self.service.return_products(products)).await
    }

    async fn warehouse_address(&self) -> Result<Address> {
        self.link
            .call(async { Ok(self.service.warehouse_address().clone()) })
            .await
    }
}

/// Payment client backed by an in-process [`PaymentService`].
pub struct LocalPaymentClient<R: Repository<Payment>> {
    service: Arc<PaymentService<R>>,
    link: Link,
}

impl<R: Repository<Payment>> LocalPaymentClient<R> {
    pub fn new(service: Arc<PaymentService<R>>) -> Self {
        Self {
            service,
            link: Link::new("payment"),
        }
    }

    pub fn link(&self) -> &Link {
        &self.link
    }
}

#[async_trait]
impl<R: Repository<Payment>> PaymentClient for LocalPaymentClient<R> {
    async fn calculate_total_cost(
        &self,
        products: &ProductQuantities,
        delivery_cost: f64,
    ) -> Result<OrderCost> {
        self.link
            .call(self.service.calculate_order_cost(products, delivery_cost))
            .await
    }
}

/// Delivery client backed by an in-process [`DeliveryService`].
pub struct LocalDeliveryClient<R: Repository<Delivery>> {
    service: Arc<DeliveryService<R>>,
    link: Link,
}

impl<R: Repository<Delivery>> LocalDeliveryClient<R> {
    pub fn new(service: Arc<DeliveryService<R>>) -> Self {
        Self {
            service,
            link: Link::new("delivery"),
        }
    }

    pub fn link(&self) -> &Link {
        &self.link
    }
}

#[async_trait]
impl<R: Repository<Delivery>> DeliveryClient for LocalDeliveryClient<R> {
    async fn create_delivery(&self, request: NewDelivery) -> Result<Delivery> {
        self.link.call(self.service.create_delivery(request)).await
    }

    async fn calculate_cost(&self, request: DeliveryCostRequest) -> Result<f64> {
        self.link.call(self.service.calculate_cost(request)).await
    }
}

/// Order client for delivery callbacks.
///
/// Holds the order service weakly: the order service owns the delivery
/// service, which owns this client.
pub struct LocalOrderClient<R: Repository<Order>> {
    service: Weak<OrderService<R>>,
    link: Link,
}

impl<R: Repository<Order>> LocalOrderClient<R> {
    pub fn new(service: Weak<OrderService<R>>) -> Self {
        Self {
            service,
            link: Link::new("order"),
        }
    }

    pub fn link(&self) -> &Link {
        &self.link
    }

    fn service(&self) -> Result<Arc<OrderService<R>>> {
        self.service
            .upgrade()
            .ok_or_else(|| SagaError::UpstreamUnavailable {
                service: self.link.service(),
                reason: "order service has shut down".to_string(),
            })
    }
}

#[async_trait]
impl<R: Repository<Order>> OrderClient for LocalOrderClient<R> {
    async fn delivered(&self, order_id: OrderId) -> Result<()> {
        let service = self.service()?;
        self.link
            .call(async move { service.delivered(order_id).await.map(|_| ()) })
            .await
    }

    async fn delivery_failed(&self, order_id: OrderId) -> Result<()> {
        let service = self.service()?;
        self.link
            .call(async move { service.delivery_failed(order_id).await.map(|_| ()) })
            .await
    }
}
