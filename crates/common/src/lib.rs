//! Shared identifiers and value types.
//!
//! Every service owns its own entity; other services only ever hold one of
//! these ids, never the entity itself.

pub mod address;
pub mod types;

pub use address::Address;
pub use types::{BookingId, DeliveryId, OrderId, PaymentId, ProductId, ShoppingCartId};

use std::collections::HashMap;

/// Product id → requested count.
pub type ProductQuantities = HashMap<ProductId, u64>;
