//! Delivery state machine.

use serde::{Deserialize, Serialize};

/// The state of a delivery.
///
/// ```text
/// Created ──► InProgress ──► Delivered
///    │            │
///    └────────────┴──► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryState {
    /// Delivery registered, goods still at the warehouse.
    #[default]
    Created,

    /// Courier has picked up the goods.
    InProgress,

    /// Goods reached the customer (terminal state).
    Delivered,

    /// Delivery was abandoned (terminal state).
    Failed,
}

impl DeliveryState {
    /// Returns true if the courier can pick up the goods.
    pub fn can_accept(&self) -> bool {
        matches!(self, DeliveryState::Created)
    }

    /// Returns true if the delivery can be confirmed.
    pub fn can_mark_delivered(&self) -> bool {
        matches!(self, DeliveryState::InProgress)
    }

    /// Returns true if the delivery can be marked as failed.
    pub fn can_mark_failed(&self) -> bool {
        matches!(self, DeliveryState::Created | DeliveryState::InProgress)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryState::Delivered | DeliveryState::Failed)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryState::Created => "CREATED",
            DeliveryState::InProgress => "IN_PROGRESS",
            DeliveryState::Delivered => "DELIVERED",
            DeliveryState::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
