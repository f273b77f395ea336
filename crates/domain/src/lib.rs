//! Domain layer for the order-fulfillment services.
//!
//! Each service owns exactly one of these entities:
//! - [`Order`] with its guarded transition table
//! - [`Delivery`] and the delivery cost rule
//! - [`Payment`] and the tax rule
//! - warehouse [`Stock`] and [`Booking`]s
//!
//! Nothing here performs I/O; the `saga` crate wires the services together.

pub mod delivery;
pub mod order;
pub mod payment;
pub mod warehouse;

pub use delivery::{Delivery, DeliveryCostConfig, DeliveryError, DeliveryState, Parcel};
pub use order::{Order, OrderError, OrderOperation, OrderState};
pub use payment::{Payment, PaymentError, PaymentState, TAX_RATE};
pub use warehouse::{
    BookedProducts, Booking, Dimension, Stock, WarehouseError, WarehouseProduct,
};
