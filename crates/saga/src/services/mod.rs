//! The four services and the product catalog.

pub mod catalog;
pub mod delivery;
pub mod order;
pub mod payment;
pub mod warehouse;

pub use catalog::InMemoryCatalog;
pub use delivery::DeliveryService;
pub use order::{NewOrder, OrderService};
pub use payment::{NewPayment, PaymentService};
pub use warehouse::WarehouseService;
