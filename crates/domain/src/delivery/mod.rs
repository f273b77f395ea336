//! Delivery entity, state machine and pricing.

mod cost;
mod model;
mod state;

pub use cost::{DeliveryCostConfig, Parcel};
pub use model::Delivery;
pub use state::DeliveryState;

use thiserror::Error;

/// Errors that can occur during delivery operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeliveryError {
    /// Delivery is not in a state that allows the action.
    #[error("Invalid state transition: cannot {action} from {current_state} state")]
    InvalidStateTransition {
        current_state: DeliveryState,
        action: &'static str,
    },

    /// Weight or volume is negative or not a number.
    #[error("Invalid parcel: weight {weight}, volume {volume}")]
    InvalidParcel { weight: f64, volume: f64 },
}
