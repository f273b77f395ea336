//! Order service.

use std::sync::Arc;

use common::{Address, DeliveryId, OrderId, PaymentId, ProductQuantities, ShoppingCartId};
use document_store::{Page, Repository};
use domain::{Order, OrderOperation};
use serde::{Deserialize, Serialize};

use crate::clients::{
    DeliveryClient, DeliveryCostRequest, NewDelivery, PaymentClient, WarehouseClient,
};
use crate::error::{Result, SagaError};

/// Request to place an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub shopping_cart_id: ShoppingCartId,
    pub products: ProductQuantities,
    #[serde(default)]
    pub delivery_address: Option<Address>,
}

/// Owns orders and drives them through fulfillment.
///
/// Each operation loads the order, checks the transition table, makes at
/// most one downstream call and commits only after that call succeeded. A
/// failed call leaves the order exactly as it was; anything the downstream
/// service already did is not undone.
pub struct OrderService<R: Repository<Order>> {
    orders: R,
    warehouse: Arc<dyn WarehouseClient>,
    payment: Arc<dyn PaymentClient>,
    delivery: Arc<dyn DeliveryClient>,
}

impl<R: Repository<Order>> OrderService<R> {
    pub fn new(
        orders: R,
        warehouse: Arc<dyn WarehouseClient>,
        payment: Arc<dyn PaymentClient>,
        delivery: Arc<dyn DeliveryClient>,
    ) -> Self {
        Self {
            orders,
            warehouse,
            payment,
            delivery,
        }
    }

    /// Places a new order for `username`.
    #[tracing::instrument(skip(self, request))]
    pub async fn create_order(&self, username: &str, request: NewOrder) -> Result<Order> {
        let order = Order::new(
            username,
            request.shopping_cart_id,
            request.products,
            request.delivery_address,
        )?;
        self.orders.save(&order).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id(), "order created");
        Ok(order)
    }

    pub async fn get_order(&self, order_id: OrderId) -> Result<Order> {
        self.orders
            .get(order_id)
            .await?
            .ok_or_else(|| SagaError::not_found("Order", order_id))
    }

    /// Lists a user's orders, oldest first.
    pub async fn list_orders(&self, username: &str, page: Page) -> Result<Vec<Order>> {
        if username.trim().is_empty() {
            return Err(SagaError::Validation("username is required".to_string()));
        }

        if page.size == 0 {
            return Err(SagaError::Validation("page size must be positive".to_string()));
        }

        Ok(self.orders.find_where("username", username, page).await?)
    }

    /// Books the products in the warehouse.
    #[tracing::instrument(skip(self))]
    pub async fn send_to_assembly(&self, order_id: OrderId) -> Result<Order> {
        let op = OrderOperation::SendToAssembly;
        let mut order = self.get_order(order_id).await?;
        self.guard(&order, op)?;

        let booking = self
            .warehouse
            .assembly_products_for_order(order_id, order.products())
            .await?;

        order.attach_booking(booking.id, booking.booked());
        self.commit(&mut order, op).await?;
        Ok(order)
    }

    #[tracing::instrument(skip(self))]
    pub async fn assembly_failed(&self, order_id: OrderId) -> Result<Order> {
        self.transition(order_id, OrderOperation::AssemblyFailed).await
    }

    /// Moves the order to payment, recording the payment if one is known.
    #[tracing::instrument(skip(self))]
    pub async fn pay(&self, order_id: OrderId, payment_id: Option<PaymentId>) -> Result<Order> {
        let op = OrderOperation::Pay;
        let mut order = self.get_order(order_id).await?;
        self.guard(&order, op)?;

        if let Some(payment_id) = payment_id {
            order.attach_payment(payment_id);
        }
        self.commit(&mut order, op).await?;
        Ok(order)
    }

    #[tracing::instrument(skip(self))]
    pub async fn payment_failed(&self, order_id: OrderId) -> Result<Order> {
        self.transition(order_id, OrderOperation::PaymentFailed).await
    }

    /// Hands the order to delivery, registering the delivery if needed.
    #[tracing::instrument(skip(self))]
    pub async fn send_to_delivery(&self, order_id: OrderId) -> Result<Order> {
        let op = OrderOperation::SendToDelivery;
        let mut order = self.get_order(order_id).await?;
        self.guard(&order, op)?;

        self.ensure_delivery(&mut order).await?;
        self.commit(&mut order, op).await?;
        Ok(order)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delivery_failed(&self, order_id: OrderId) -> Result<Order> {
        self.transition(order_id, OrderOperation::DeliveryFailed).await
    }

    /// Callback from the delivery service.
    #[tracing::instrument(skip(self))]
    pub async fn delivered(&self, order_id: OrderId) -> Result<Order> {
        self.transition(order_id, OrderOperation::Delivered).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn complete(&self, order_id: OrderId) -> Result<Order> {
        self.transition(order_id, OrderOperation::Complete).await
    }

    /// Sends products back to the warehouse; `None` returns all of them.
    #[tracing::instrument(skip(self, products))]
    pub async fn return_products(
        &self,
        order_id: OrderId,
        products: Option<ProductQuantities>,
    ) -> Result<Order> {
        let op = OrderOperation::ReturnProducts;
        let mut order = self.get_order(order_id).await?;
        self.guard(&order, op)?;

        let to_return = order.products_to_return(products)?;
        self.warehouse.return_products(&to_return).await?;

        self.commit(&mut order, op).await?;
        Ok(order)
    }

    /// Asks the payment service for the product subtotal and grand total.
    ///
    /// Needs the delivery price to be calculated first.
    #[tracing::instrument(skip(self))]
    pub async fn calculate_total_price(&self, order_id: OrderId) -> Result<Order> {
        let mut order = self.get_order(order_id).await?;
        let delivery_price = order.require_delivery_price()?;

        let cost = self
            .payment
            .calculate_total_cost(order.products(), delivery_price)
            .await?;

        order.set_prices(cost.product_cost, cost.total_cost);
        self.orders.save(&order).await?;
        tracing::info!(total_price = cost.total_cost, "order priced");
        Ok(order)
    }

    /// Asks the delivery service to price the order's delivery.
    #[tracing::instrument(skip(self))]
    pub async fn calculate_delivery_price(&self, order_id: OrderId) -> Result<Order> {
        let mut order = self.get_order(order_id).await?;
        let delivery_id = self.ensure_delivery(&mut order).await?;

        let price = self
            .delivery
            .calculate_cost(DeliveryCostRequest {
                delivery_id: Some(delivery_id),
                weight: order.total_weight(),
                volume: order.total_volume(),
                fragile: order.is_fragile(),
            })
            .await?;

        order.set_delivery_price(price);
        self.orders.save(&order).await?;
        tracing::info!(delivery_price = price, "delivery priced");
        Ok(order)
    }

    /// Returns the order's delivery, registering one with the delivery
    /// service if the order has none yet.
    ///
    /// A newly registered delivery is saved on the order right away, so a
    /// later failure in the same operation does not lose it.
    async fn ensure_delivery(&self, order: &mut Order) -> Result<DeliveryId> {
        if let Some(delivery_id) = order.delivery_id() {
            return Ok(delivery_id);
        }

        let delivery_address = order.require_delivery_address()?.clone();
        let warehouse_address = self.warehouse.warehouse_address().await?;
        let delivery = self
            .delivery
            .create_delivery(NewDelivery {
                order_id: order.id(),
                warehouse_address,
                delivery_address,
            })
            .await?;

        order.attach_delivery(delivery.id());
        self.orders.save(order).await?;
        tracing::info!(delivery_id = %delivery.id(), "delivery attached");
        Ok(delivery.id())
    }

    async fn transition(&self, order_id: OrderId, op: OrderOperation) -> Result<Order> {
        let mut order = self.get_order(order_id).await?;
        self.guard(&order, op)?;
        self.commit(&mut order, op).await?;
        Ok(order)
    }

    fn guard(&self, order: &Order, op: OrderOperation) -> Result<()> {
        if let Err(err) = order.check(op) {
            metrics::counter!("order_transitions_rejected_total", "operation" => op.as_str())
                .increment(1);
            tracing::warn!(state = %order.state(), operation = %op, "transition rejected");
            return Err(err.into());
        }
        Ok(())
    }

    async fn commit(&self, order: &mut Order, op: OrderOperation) -> Result<()> {
        let from = order.state();
        let to = order.apply(op)?;
        self.orders.save(order).await?;

        metrics::counter!("order_transitions_total", "operation" => op.as_str()).increment(1);
        tracing::info!(%from, %to, operation = %op, "order state changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use common::ProductId;
    use document_store::InMemoryRepository;
    use domain::{BookedProducts, Booking, Delivery};

    use super::*;
    use crate::clients::OrderCost;
    use crate::error::ErrorKind;

    struct StubWarehouse;

    #[async_trait]
    impl WarehouseClient for StubWarehouse {
        async fn check_products_quantity(&self, _: &ProductQuantities) -> Result<BookedProducts> {
            Ok(BookedProducts::default())
        }

        async fn assembly_products_for_order(
            &self,
            order_id: OrderId,
            products: &ProductQuantities,
        ) -> Result<Booking> {
            Ok(Booking::new(order_id, products.clone(), BookedProducts::default()))
        }

        async fn ship_products_to_delivery(&self, _: OrderId, _: DeliveryId) -> Result<()> {
            Ok(())
        }

        async fn return_products(&self, _: &ProductQuantities) -> Result<()> {
            Ok(())
        }

        async fn warehouse_address(&self) -> Result<Address> {
            Ok(Address::marker("ADDRESS_1"))
        }
    }

    struct StubPayment;

    #[async_trait]
    impl PaymentClient for StubPayment {
        async fn calculate_total_cost(
            &self,
            _: &ProductQuantities,
            delivery_cost: f64,
        ) -> Result<OrderCost> {
            Ok(OrderCost {
                product_cost: 100.0,
                total_cost: 110.0 + delivery_cost,
            })
        }
    }

    /// Registers deliveries but cannot price them.
    #[derive(Default)]
    struct UnpricedDelivery {
        created: Mutex<Vec<DeliveryId>>,
    }

    #[async_trait]
    impl DeliveryClient for UnpricedDelivery {
        async fn create_delivery(&self, request: NewDelivery) -> Result<Delivery> {
            let delivery = Delivery::new(
                request.order_id,
                request.warehouse_address,
                request.delivery_address,
            );
            self.created.lock().unwrap().push(delivery.id());
            Ok(delivery)
        }

        async fn calculate_cost(&self, _: DeliveryCostRequest) -> Result<f64> {
            Err(SagaError::UpstreamUnavailable {
                service: "delivery",
                reason: "pricing is down".to_string(),
            })
        }
    }

    fn service(delivery: Arc<UnpricedDelivery>) -> OrderService<InMemoryRepository<Order>> {
        OrderService::new(
            InMemoryRepository::new(),
            Arc::new(StubWarehouse),
            Arc::new(StubPayment),
            delivery,
        )
    }

    fn new_order(delivery_address: Option<Address>) -> NewOrder {
        NewOrder {
            shopping_cart_id: ShoppingCartId::new(),
            products: [(ProductId::new(), 2)].into_iter().collect(),
            delivery_address,
        }
    }

    #[tokio::test]
    async fn test_failed_delivery_pricing_keeps_the_registered_delivery() {
        let delivery = Arc::new(UnpricedDelivery::default());
        let orders = service(delivery.clone());
        let address = Address::new("RU", "Moscow", "Tverskaya", "1", "10");
        let order = orders.create_order("alice", new_order(Some(address))).await.unwrap();

        for _ in 0..3 {
            let err = orders.calculate_delivery_price(order.id()).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
        }

        let created = delivery.created.lock().unwrap().clone();
        assert_eq!(created.len(), 1);

        let stored = orders.get_order(order.id()).await.unwrap();
        assert_eq!(stored.delivery_id(), Some(created[0]));
        assert_eq!(stored.delivery_price(), None);
    }

    #[tokio::test]
    async fn test_delivery_pricing_without_address_registers_nothing() {
        let delivery = Arc::new(UnpricedDelivery::default());
        let orders = service(delivery.clone());
        let order = orders.create_order("alice", new_order(None)).await.unwrap();

        let err = orders.calculate_delivery_price(order.id()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(delivery.created.lock().unwrap().is_empty());
        let stored = orders.get_order(order.id()).await.unwrap();
        assert_eq!(stored.delivery_id(), None);
    }
}
