//! Service error types.

use document_store::StoreError;
use domain::{DeliveryError, OrderError, PaymentError, WarehouseError};
use serde::Serialize;
use thiserror::Error;

/// Machine-readable error classification shared by every service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    Validation,
    InvalidTransition,
    UpstreamUnavailable,
    UpstreamNotFound,
    InsufficientStock,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::InvalidTransition => "INVALID_TRANSITION",
            ErrorKind::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ErrorKind::UpstreamNotFound => "UPSTREAM_NOT_FOUND",
            ErrorKind::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur in service operations.
#[derive(Debug, Error)]
pub enum SagaError {
    /// Entity id unknown to its owning service.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Request is missing a field or carries a bad value.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity is not in a state that allows the operation.
    #[error("{0}")]
    InvalidTransition(String),

    /// A downstream service could not be reached.
    #[error("{service} service unavailable: {reason}")]
    UpstreamUnavailable { service: &'static str, reason: String },

    /// A downstream service answered that the entity does not exist.
    #[error("{service} service reported: {reason}")]
    UpstreamNotFound { service: &'static str, reason: String },

    /// The warehouse cannot satisfy the requested quantity.
    #[error("{0}")]
    InsufficientStock(String),

    /// Storage error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SagaError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        SagaError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SagaError::NotFound { .. } => ErrorKind::NotFound,
            SagaError::Validation(_) => ErrorKind::Validation,
            SagaError::InvalidTransition(_) => ErrorKind::InvalidTransition,
            SagaError::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
            SagaError::UpstreamNotFound { .. } => ErrorKind::UpstreamNotFound,
            SagaError::InsufficientStock(_) => ErrorKind::InsufficientStock,
            SagaError::Store(_) | SagaError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Reclassifies an error returned by a call into `service`.
    ///
    /// A remote not-found becomes [`SagaError::UpstreamNotFound`]; every
    /// other error passes through as-is.
    pub fn from_upstream(self, service: &'static str) -> Self {
        match self {
            SagaError::NotFound { .. } => SagaError::UpstreamNotFound {
                service,
                reason: self.to_string(),
            },
            other => other,
        }
    }
}

impl From<OrderError> for SagaError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::InvalidTransition { .. } => SagaError::InvalidTransition(err.to_string()),
            _ => SagaError::Validation(err.to_string()),
        }
    }
}

impl From<DeliveryError> for SagaError {
    fn from(err: DeliveryError) -> Self {
        match err {
            DeliveryError::InvalidStateTransition { .. } => {
                SagaError::InvalidTransition(err.to_string())
            }
            DeliveryError::InvalidParcel { .. } => SagaError::Validation(err.to_string()),
        }
    }
}

impl From<PaymentError> for SagaError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidStateTransition { .. } => {
                SagaError::InvalidTransition(err.to_string())
            }
            PaymentError::InvalidAmount { .. } => SagaError::Validation(err.to_string()),
        }
    }
}

impl From<WarehouseError> for SagaError {
    fn from(err: WarehouseError) -> Self {
        match err {
            WarehouseError::ProductNotFound { product_id } => {
                SagaError::not_found("Product", product_id)
            }
            WarehouseError::BookingNotFound { order_id } => {
                SagaError::not_found("Booking", order_id)
            }
            WarehouseError::InsufficientQuantity { .. } => {
                SagaError::InsufficientStock(err.to_string())
            }
            WarehouseError::AlreadyShipped { .. } | WarehouseError::AlreadyBooked { .. } => {
                SagaError::InvalidTransition(err.to_string())
            }
            WarehouseError::ProductAlreadyExists { .. } | WarehouseError::InvalidProduct { .. } => {
                SagaError::Validation(err.to_string())
            }
        }
    }
}

/// Convenience type alias for service results.
pub type Result<T> = std::result::Result<T, SagaError>;

#[cfg(test)]
mod tests {
    use common::{OrderId, ProductId};
    use domain::{OrderOperation, OrderState};

    use super::*;

    #[test]
    fn test_not_found_from_upstream_is_reclassified() {
        let err = SagaError::not_found("Booking", OrderId::new()).from_upstream("warehouse");
        assert_eq!(err.kind(), ErrorKind::UpstreamNotFound);
        assert!(err.to_string().contains("Booking not found"));
    }

    #[test]
    fn test_other_upstream_errors_pass_through() {
        let err = SagaError::InsufficientStock("out".to_string()).from_upstream("warehouse");
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);

        let err = SagaError::UpstreamNotFound {
            service: "catalog",
            reason: "gone".to_string(),
        }
        .from_upstream("payment");
        assert!(matches!(err, SagaError::UpstreamNotFound { service: "catalog", .. }));
    }

    #[test]
    fn test_domain_error_kinds() {
        let err: SagaError = OrderError::InvalidTransition {
            state: OrderState::New,
            operation: OrderOperation::Pay,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
        assert_eq!(err.to_string(), "Invalid state transition: cannot pay from NEW state");

        let err: SagaError = OrderError::DeliveryPriceMissing.into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let product_id = ProductId::new();
        let err: SagaError = WarehouseError::InsufficientQuantity {
            product_id,
            requested: 2,
            available: 1,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);

        let err: SagaError = WarehouseError::ProductNotFound { product_id }.into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_kind_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::UpstreamNotFound).unwrap(),
            "\"UPSTREAM_NOT_FOUND\""
        );
        assert_eq!(ErrorKind::InvalidTransition.to_string(), "INVALID_TRANSITION");
    }
}
