//! Order entity and its state machine.

mod model;
mod state;

pub use model::Order;
pub use state::{OrderOperation, OrderState};

use common::ProductId;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    /// Username is required.
    #[error("Username is required")]
    UsernameRequired,

    /// Order has no products.
    #[error("Order has no products")]
    NoProducts,

    /// A product was requested with a zero count.
    #[error("Invalid quantity for product {product_id}: must be greater than 0")]
    InvalidQuantity { product_id: ProductId },

    /// Operation has no edge out of the current state.
    #[error("Invalid state transition: cannot {operation} from {state} state")]
    InvalidTransition {
        state: OrderState,
        operation: OrderOperation,
    },

    /// Products to return exceed what the order holds.
    #[error("Cannot return {requested} of product {product_id}: order holds {ordered}")]
    ReturnExceedsOrder {
        product_id: ProductId,
        requested: u64,
        ordered: u64,
    },

    /// Delivery needs a destination.
    #[error("Order has no delivery address")]
    DeliveryAddressMissing,

    /// Total price needs the delivery price first.
    #[error("Order has no delivery price")]
    DeliveryPriceMissing,
}
