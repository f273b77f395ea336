//! Payment entity and its settlement states.

use chrono::{DateTime, Utc};
use common::{OrderId, PaymentId};
use document_store::Document;
use serde::{Deserialize, Serialize};

use super::{PaymentError, total_cost};

/// The state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    /// Awaiting the payment provider.
    #[default]
    Pending,

    /// Funds were captured (terminal state).
    Success,

    /// Payment was declined (terminal state).
    Failed,
}

impl PaymentState {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentState::Pending)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentState::Pending => "PENDING",
            PaymentState::Success => "SUCCESS",
            PaymentState::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for PaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payment for one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    order_id: OrderId,
    product_cost: f64,
    delivery_cost: f64,
    total_cost: f64,
    state: PaymentState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Document for Payment {
    type Id = PaymentId;

    fn kind() -> &'static str {
        "Payment"
    }

    fn id(&self) -> PaymentId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Payment {
    /// Opens a pending payment; the total includes tax.
    pub fn new(order_id: OrderId, product_cost: f64, delivery_cost: f64) -> Result<Self, PaymentError> {
        check_amount("product cost", product_cost)?;
        check_amount("delivery cost", delivery_cost)?;

        let now = Utc::now();
        Ok(Self {
            id: PaymentId::new(),
            order_id,
            product_cost,
            delivery_cost,
            total_cost: total_cost(product_cost, delivery_cost),
            state: PaymentState::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> PaymentId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn product_cost(&self) -> f64 {
        self.product_cost
    }

    pub fn delivery_cost(&self) -> f64 {
        self.delivery_cost
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn state(&self) -> PaymentState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Settles the payment in `target`.
    ///
    /// Settling again in the same state is a no-op and returns `Ok(false)`.
    /// Moving a settled payment to the opposite outcome is rejected.
    pub fn settle(&mut self, target: PaymentState) -> Result<bool, PaymentError> {
        if self.state == target {
            return Ok(false);
        }

        if self.state.is_terminal() || !target.is_terminal() {
            return Err(PaymentError::InvalidStateTransition {
                from: self.state,
                to: target,
            });
        }

        self.state = target;
        self.updated_at = Utc::now();
        Ok(true)
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<(), PaymentError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PaymentError::InvalidAmount { field, value })
    }
}
