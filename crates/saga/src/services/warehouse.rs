//! In-memory warehouse service.

use std::collections::HashMap;

use common::{Address, DeliveryId, OrderId, ProductId, ProductQuantities};
use domain::{BookedProducts, Booking, Stock, WarehouseError, WarehouseProduct};
use tokio::sync::RwLock;

use crate::error::{Result, SagaError};

#[derive(Debug, Default)]
struct WarehouseState {
    stock: Stock,
    bookings: HashMap<OrderId, Booking>,
}

/// A single warehouse holding stock and per-order bookings in memory.
#[derive(Debug)]
pub struct WarehouseService {
    address: Address,
    state: RwLock<WarehouseState>,
}

impl WarehouseService {
    /// Creates an empty warehouse at `address`.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            state: RwLock::new(WarehouseState::default()),
        }
    }

    pub fn warehouse_address(&self) -> &Address {
        &self.address
    }

    #[tracing::instrument(skip(self, product), fields(product_id = %product.product_id))]
    pub async fn add_new_product(&self, product: WarehouseProduct) -> Result<()> {
        self.state.write().await.stock.add_new_product(product)?;
        tracing::info!("product registered");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_product_quantity(&self, product_id: ProductId, quantity: u64) -> Result<()> {
        self.state
            .write()
            .await
            .stock
            .add_quantity(product_id, quantity)?;
        Ok(())
    }

    /// Returns a stocked product.
    pub async fn product(&self, product_id: ProductId) -> Result<WarehouseProduct> {
        self.state
            .read()
            .await
            .stock
            .get(&product_id)
            .cloned()
            .ok_or_else(|| SagaError::not_found("Product", product_id))
    }

    #[tracing::instrument(skip(self, cart))]
    pub async fn check_products_quantity(&self, cart: &ProductQuantities) -> Result<BookedProducts> {
        if cart.is_empty() {
            return Err(SagaError::Validation("cart has no products".to_string()));
        }

        Ok(self.state.read().await.stock.check(cart)?)
    }

    /// Takes the order's products off the shelf and books them.
    #[tracing::instrument(skip(self, products))]
    pub async fn assembly_products_for_order(
        &self,
        order_id: OrderId,
        products: &ProductQuantities,
    ) -> Result<Booking> {
        if products.is_empty() {
            return Err(SagaError::Validation("order has no products".to_string()));
        }

        let mut state = self.state.write().await;
        if state.bookings.contains_key(&order_id) {
            return Err(WarehouseError::AlreadyBooked { order_id }.into());
        }

        let booked = state.stock.reserve(products)?;
        let booking = Booking::new(order_id, products.clone(), booked);
        state.bookings.insert(order_id, booking.clone());

        metrics::counter!("warehouse_bookings_total").increment(1);
        tracing::info!(booking_id = %booking.id, "products booked");
        Ok(booking)
    }

    /// Hands an order's booking over to a delivery.
    #[tracing::instrument(skip(self))]
    pub async fn ship_products_to_delivery(
        &self,
        order_id: OrderId,
        delivery_id: DeliveryId,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let booking = state
            .bookings
            .get_mut(&order_id)
            .ok_or(WarehouseError::BookingNotFound { order_id })?;

        booking.ship(delivery_id)?;
        tracing::info!("booking shipped");
        Ok(())
    }

    /// Puts returned products back on the shelf.
    #[tracing::instrument(skip(self, products))]
    pub async fn return_products(&self, products: &ProductQuantities) -> Result<()> {
        if products.is_empty() {
            return Err(SagaError::Validation("nothing to return".to_string()));
        }

        self.state.write().await.stock.restock(products)?;
        metrics::counter!("warehouse_returns_total").increment(1);
        Ok(())
    }

    /// Returns the booking for an order, if any.
    pub async fn booking(&self, order_id: OrderId) -> Option<Booking> {
        self.state.read().await.bookings.get(&order_id).cloned()
    }

    /// Units on hand for a product.
    pub async fn quantity(&self, product_id: ProductId) -> Option<u64> {
        self.state.read().await.stock.quantity(&product_id)
    }
}

#[cfg(test)]
mod tests {
    use domain::Dimension;

    use super::*;
    use crate::error::ErrorKind;

    fn warehouse() -> WarehouseService {
        WarehouseService::new(Address::marker("ADDRESS_1"))
    }

    fn product(quantity: u64) -> WarehouseProduct {
        WarehouseProduct {
            product_id: ProductId::new(),
            fragile: false,
            dimension: Dimension {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            weight: 2.0,
            quantity,
        }
    }

    fn cart(product_id: ProductId, count: u64) -> ProductQuantities {
        [(product_id, count)].into_iter().collect()
    }

    #[tokio::test]
    async fn test_assembly_books_and_decrements() {
        let w = warehouse();
        let p = product(5);
        w.add_new_product(p.clone()).await.unwrap();
        let order_id = OrderId::new();

        let booking = w
            .assembly_products_for_order(order_id, &cart(p.product_id, 2))
            .await
            .unwrap();

        assert_eq!(booking.order_id, order_id);
        assert_eq!(booking.delivery_weight, 4.0);
        assert!(!booking.shipped);
        assert_eq!(w.quantity(p.product_id).await, Some(3));
        assert_eq!(w.booking(order_id).await, Some(booking));
    }

    #[tokio::test]
    async fn test_assembly_twice_for_same_order_fails() {
        let w = warehouse();
        let p = product(5);
        w.add_new_product(p.clone()).await.unwrap();
        let order_id = OrderId::new();
        w.assembly_products_for_order(order_id, &cart(p.product_id, 1))
            .await
            .unwrap();

        let err = w
            .assembly_products_for_order(order_id, &cart(p.product_id, 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
        assert_eq!(w.quantity(p.product_id).await, Some(4));
    }

    #[tokio::test]
    async fn test_insufficient_stock() {
        let w = warehouse();
        let p = product(1);
        w.add_new_product(p.clone()).await.unwrap();

        let err = w
            .check_products_quantity(&cart(p.product_id, 2))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let w = warehouse();
        let err = w
            .check_products_quantity(&cart(ProductId::new(), 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_ship_without_booking_is_not_found() {
        let w = warehouse();
        let err = w
            .ship_products_to_delivery(OrderId::new(), DeliveryId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_ship_marks_booking() {
        let w = warehouse();
        let p = product(1);
        w.add_new_product(p.clone()).await.unwrap();
        let order_id = OrderId::new();
        w.assembly_products_for_order(order_id, &cart(p.product_id, 1))
            .await
            .unwrap();
        let delivery_id = DeliveryId::new();

        w.ship_products_to_delivery(order_id, delivery_id)
            .await
            .unwrap();

        let booking = w.booking(order_id).await.unwrap();
        assert!(booking.shipped);
        assert_eq!(booking.delivery_id, Some(delivery_id));
    }

    #[tokio::test]
    async fn test_return_restocks() {
        let w = warehouse();
        let p = product(0);
        w.add_new_product(p.clone()).await.unwrap();

        w.return_products(&cart(p.product_id, 3)).await.unwrap();
        assert_eq!(w.quantity(p.product_id).await, Some(3));

        let err = w.return_products(&ProductQuantities::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
