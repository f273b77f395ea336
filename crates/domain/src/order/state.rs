//! Order state machine.

use serde::{Deserialize, Serialize};

/// The state of an order in its lifecycle.
///
/// State transitions:
/// ```text
/// New ──► Assembled ──► OnPayment ──► OnDelivery ──► Completed ──► ProductReturned
///  │          │             │              │
///  └──────────┴► AssemblyFailed            ├──► DeliveryFailed
///                           └► PaymentFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    /// Order placed, nothing reserved yet.
    #[default]
    New,

    /// Warehouse has booked and assembled the products.
    Assembled,

    /// Warehouse could not assemble the order (terminal state).
    AssemblyFailed,

    /// Awaiting payment.
    OnPayment,

    /// Payment was declined (terminal state).
    PaymentFailed,

    /// Handed to delivery.
    OnDelivery,

    /// Delivery did not reach the customer (terminal state).
    DeliveryFailed,

    /// Delivered to the customer.
    Completed,

    /// Products came back to the warehouse (terminal state).
    ProductReturned,
}

/// An operation that moves an order from one state to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderOperation {
    SendToAssembly,
    AssemblyFailed,
    Pay,
    PaymentFailed,
    SendToDelivery,
    DeliveryFailed,
    Delivered,
    Complete,
    ReturnProducts,
}

impl OrderOperation {
    /// All state-changing operations.
    pub const ALL: [OrderOperation; 9] = [
        OrderOperation::SendToAssembly,
        OrderOperation::AssemblyFailed,
        OrderOperation::Pay,
        OrderOperation::PaymentFailed,
        OrderOperation::SendToDelivery,
        OrderOperation::DeliveryFailed,
        OrderOperation::Delivered,
        OrderOperation::Complete,
        OrderOperation::ReturnProducts,
    ];

    /// Returns the operation name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderOperation::SendToAssembly => "send_to_assembly",
            OrderOperation::AssemblyFailed => "assembly_failed",
            OrderOperation::Pay => "pay",
            OrderOperation::PaymentFailed => "payment_failed",
            OrderOperation::SendToDelivery => "send_to_delivery",
            OrderOperation::DeliveryFailed => "delivery_failed",
            OrderOperation::Delivered => "delivered",
            OrderOperation::Complete => "complete",
            OrderOperation::ReturnProducts => "return_products",
        }
    }
}

impl std::fmt::Display for OrderOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl OrderState {
    /// The transition table. Returns the state reached by applying
    /// `operation` in this state, or `None` if the edge does not exist.
    pub fn next(&self, operation: OrderOperation) -> Option<OrderState> {
        use OrderOperation as Op;
        use OrderState as S;

        match (self, operation) {
            (S::New, Op::SendToAssembly) => Some(S::Assembled),
            (S::New | S::Assembled, Op::AssemblyFailed) => Some(S::AssemblyFailed),
            (S::Assembled, Op::Pay) => Some(S::OnPayment),
            (S::OnPayment, Op::PaymentFailed) => Some(S::PaymentFailed),
            (S::OnPayment, Op::SendToDelivery) => Some(S::OnDelivery),
            (S::OnDelivery, Op::DeliveryFailed) => Some(S::DeliveryFailed),
            (S::OnDelivery, Op::Delivered | Op::Complete) => Some(S::Completed),
            (S::Completed, Op::ReturnProducts) => Some(S::ProductReturned),
            _ => None,
        }
    }

    /// Returns true if `operation` is allowed in this state.
    pub fn allows(&self, operation: OrderOperation) -> bool {
        self.next(operation).is_some()
    }

    /// Returns true if no operation leads out of this state.
    pub fn is_terminal(&self) -> bool {
        OrderOperation::ALL.iter().all(|op| !self.allows(*op))
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::New => "NEW",
            OrderState::Assembled => "ASSEMBLED",
            OrderState::AssemblyFailed => "ASSEMBLY_FAILED",
            OrderState::OnPayment => "ON_PAYMENT",
            OrderState::PaymentFailed => "PAYMENT_FAILED",
            OrderState::OnDelivery => "ON_DELIVERY",
            OrderState::DeliveryFailed => "DELIVERY_FAILED",
            OrderState::Completed => "COMPLETED",
            OrderState::ProductReturned => "PRODUCT_RETURNED",
        }
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
