//! Choreographed order fulfillment.
//!
//! Four services each own one entity and advance it only in response to
//! calls from the others:
//! - [`OrderService`] drives an order through assembly, payment and delivery
//! - [`WarehouseService`] books, ships and restocks products
//! - [`PaymentService`] prices orders and settles payments
//! - [`DeliveryService`] prices deliveries and reports their outcome back
//!   to the order service
//!
//! There is no coordinator and no saga log. Every step commits on its own
//! once its single downstream call succeeded; a later failure does not
//! undo earlier steps.

pub mod clients;
pub mod error;
pub mod services;
pub mod wiring;

pub use clients::{
    DeliveryClient, DeliveryCostRequest, Link, NewDelivery, OrderClient, OrderCost,
    PaymentClient, ProductCatalog, WarehouseClient,
};
pub use error::{ErrorKind, Result, SagaError};
pub use services::{
    DeliveryService, InMemoryCatalog, NewOrder, NewPayment, OrderService, PaymentService,
    WarehouseService,
};
pub use wiring::{Links, Services, ServicesConfig, Stores, wire};
