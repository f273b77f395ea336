//! Payment entity and cost rules.

mod cost;
mod model;

pub use cost::{TAX_RATE, product_cost, total_cost};
pub use model::{Payment, PaymentState};

use thiserror::Error;

/// Errors that can occur during payment operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaymentError {
    /// Payment already settled the other way.
    #[error("Invalid state transition: cannot move payment from {from} to {to}")]
    InvalidStateTransition { from: PaymentState, to: PaymentState },

    /// Costs must be finite and non-negative.
    #[error("Invalid {field}: {value}")]
    InvalidAmount { field: &'static str, value: f64 },
}
