//! Warehouse stock and bookings.

mod booking;
mod stock;

pub use booking::{BookedProducts, Booking};
pub use stock::{Dimension, Stock, WarehouseProduct};

use common::{DeliveryId, OrderId, ProductId};
use thiserror::Error;

/// Errors that can occur during warehouse operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WarehouseError {
    /// Product is not stocked by this warehouse.
    #[error("Product not found in warehouse: {product_id}")]
    ProductNotFound { product_id: ProductId },

    /// Product is already stocked.
    #[error("Product already registered in warehouse: {product_id}")]
    ProductAlreadyExists { product_id: ProductId },

    /// Not enough units on hand.
    #[error("Insufficient quantity of product {product_id}: requested {requested}, available {available}")]
    InsufficientQuantity {
        product_id: ProductId,
        requested: u64,
        available: u64,
    },

    /// Dimensions and weight must be positive.
    #[error("Invalid product {product_id}: dimensions and weight must be positive")]
    InvalidProduct { product_id: ProductId },

    /// No booking for the order.
    #[error("No booking found for order {order_id}")]
    BookingNotFound { order_id: OrderId },

    /// Booking was already handed to a different delivery.
    #[error("Booking for order {order_id} already shipped with delivery {delivery_id}")]
    AlreadyShipped {
        order_id: OrderId,
        delivery_id: DeliveryId,
    },

    /// Order already has a booking.
    #[error("Order {order_id} is already booked")]
    AlreadyBooked { order_id: OrderId },
}
