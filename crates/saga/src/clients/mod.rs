//! Contracts between services.
//!
//! A service never holds another service directly; it talks to it through
//! one of these traits. The `local` adapters implement them in-process and
//! apply the same error classification a remote transport would.

mod local;

pub use local::{
    Link, LocalDeliveryClient, LocalOrderClient, LocalPaymentClient, LocalWarehouseClient,
};

use async_trait::async_trait;
use common::{Address, DeliveryId, OrderId, ProductId, ProductQuantities};
use domain::{BookedProducts, Booking, Delivery};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Request to register a delivery for an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDelivery {
    pub order_id: OrderId,
    pub warehouse_address: Address,
    pub delivery_address: Address,
}

/// Request to price a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryCostRequest {
    pub delivery_id: Option<DeliveryId>,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub fragile: bool,
}

/// Product subtotal and grand total of an order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderCost {
    pub product_cost: f64,
    pub total_cost: f64,
}

/// Warehouse operations used by the order and delivery services.
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    /// Checks stock for a cart and returns the parcel dimensions.
    async fn check_products_quantity(&self, cart: &ProductQuantities) -> Result<BookedProducts>;

    /// Takes the products off the shelf and books them for the order.
    async fn assembly_products_for_order(
        &self,
        order_id: OrderId,
        products: &ProductQuantities,
    ) -> Result<Booking>;

    /// Hands an order's booked goods to a delivery.
    async fn ship_products_to_delivery(&self, order_id: OrderId, delivery_id: DeliveryId) -> Result<()>;

    /// Puts products back on the shelf.
    async fn return_products(&self, products: &ProductQuantities) -> Result<()>;

    /// Address goods ship from.
    async fn warehouse_address(&self) -> Result<Address>;
}

/// Payment pricing used by the order service.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Prices the products and adds tax and delivery.
    async fn calculate_total_cost(
        &self,
        products: &ProductQuantities,
        delivery_cost: f64,
    ) -> Result<OrderCost>;
}

/// Delivery operations used by the order service.
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    async fn create_delivery(&self, request: NewDelivery) -> Result<Delivery>;

    async fn calculate_cost(&self, request: DeliveryCostRequest) -> Result<f64>;
}

/// Order callbacks issued by the delivery service.
#[async_trait]
pub trait OrderClient: Send + Sync {
    /// The delivery reached the customer.
    async fn delivered(&self, order_id: OrderId) -> Result<()>;

    /// The delivery was abandoned.
    async fn delivery_failed(&self, order_id: OrderId) -> Result<()>;
}

/// Unit prices for products.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn unit_price(&self, product_id: ProductId) -> Result<f64>;
}
