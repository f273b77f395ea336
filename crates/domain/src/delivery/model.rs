//! Delivery entity.

use chrono::{DateTime, Utc};
use common::{Address, DeliveryId, OrderId};
use document_store::Document;
use serde::{Deserialize, Serialize};

use super::{DeliveryError, DeliveryState, Parcel};

/// A delivery of one order from a warehouse to the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    id: DeliveryId,
    order_id: OrderId,
    warehouse_address: Address,
    delivery_address: Address,
    volume: f64,
    weight: f64,
    fragile: bool,
    state: DeliveryState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Document for Delivery {
    type Id = DeliveryId;

    fn kind() -> &'static str {
        "Delivery"
    }

    fn id(&self) -> DeliveryId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Delivery {
    /// Registers a delivery in the `Created` state.
    pub fn new(order_id: OrderId, warehouse_address: Address, delivery_address: Address) -> Self {
        let now = Utc::now();
        Self {
            id: DeliveryId::new(),
            order_id,
            warehouse_address,
            delivery_address,
            volume: 0.0,
            weight: 0.0,
            fragile: false,
            state: DeliveryState::Created,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> DeliveryId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn warehouse_address(&self) -> &Address {
        &self.warehouse_address
    }

    pub fn delivery_address(&self) -> &Address {
        &self.delivery_address
    }

    pub fn state(&self) -> DeliveryState {
        self.state
    }

    /// Returns the parcel recorded by the last cost calculation.
    pub fn parcel(&self) -> Parcel {
        Parcel::new(self.weight, self.volume, self.fragile)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records the goods' dimensions.
    pub fn record_parcel(&mut self, parcel: Parcel) -> Result<(), DeliveryError> {
        if !parcel.is_valid() {
            return Err(DeliveryError::InvalidParcel {
                weight: parcel.weight,
                volume: parcel.volume,
            });
        }

        self.weight = parcel.weight;
        self.volume = parcel.volume;
        self.fragile = parcel.fragile;
        self.touch();
        Ok(())
    }

    pub fn ensure_can_accept(&self) -> Result<(), DeliveryError> {
        self.ensure(self.state.can_accept(), "accept")
    }

    pub fn ensure_can_mark_delivered(&self) -> Result<(), DeliveryError> {
        self.ensure(self.state.can_mark_delivered(), "mark delivered")
    }

    pub fn ensure_can_mark_failed(&self) -> Result<(), DeliveryError> {
        self.ensure(self.state.can_mark_failed(), "mark failed")
    }

    /// Created → InProgress.
    pub fn accept(&mut self) -> Result<(), DeliveryError> {
        self.ensure_can_accept()?;
        self.move_to(DeliveryState::InProgress);
        Ok(())
    }

    /// InProgress → Delivered.
    pub fn mark_delivered(&mut self) -> Result<(), DeliveryError> {
        self.ensure_can_mark_delivered()?;
        self.move_to(DeliveryState::Delivered);
        Ok(())
    }

    /// Created or InProgress → Failed.
    pub fn mark_failed(&mut self) -> Result<(), DeliveryError> {
        self.ensure_can_mark_failed()?;
        self.move_to(DeliveryState::Failed);
        Ok(())
    }

    fn ensure(&self, allowed: bool, action: &'static str) -> Result<(), DeliveryError> {
        if allowed {
            Ok(())
        } else {
            Err(DeliveryError::InvalidStateTransition {
                current_state: self.state,
                action,
            })
        }
    }

    fn move_to(&mut self, state: DeliveryState) {
        self.state = state;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivery() -> Delivery {
        Delivery::new(
            OrderId::new(),
            Address::marker("ADDRESS_1"),
            Address::new("RU", "Moscow", "Tverskaya", "1", "10"),
        )
    }

    #[test]
    fn test_new_delivery_is_created() {
        let d = delivery();
        assert_eq!(d.state(), DeliveryState::Created);
        assert_eq!(d.parcel(), Parcel::default());
    }

    #[test]
    fn test_full_lifecycle() {
        let mut d = delivery();
        d.accept().unwrap();
        assert_eq!(d.state(), DeliveryState::InProgress);
        d.mark_delivered().unwrap();
        assert_eq!(d.state(), DeliveryState::Delivered);
    }

    #[test]
    fn test_cannot_deliver_before_accept() {
        let mut d = delivery();
        let err = d.mark_delivered().unwrap_err();
        assert_eq!(
            err,
            DeliveryError::InvalidStateTransition {
                current_state: DeliveryState::Created,
                action: "mark delivered",
            }
        );
        assert_eq!(d.state(), DeliveryState::Created);
    }

    #[test]
    fn test_fail_from_created_and_in_progress() {
        let mut d = delivery();
        d.mark_failed().unwrap();
        assert_eq!(d.state(), DeliveryState::Failed);

        let mut d = delivery();
        d.accept().unwrap();
        d.mark_failed().unwrap();
        assert_eq!(d.state(), DeliveryState::Failed);
    }

    #[test]
    fn test_terminal_delivery_rejects_everything() {
        let mut d = delivery();
        d.mark_failed().unwrap();
        assert!(d.accept().is_err());
        assert!(d.mark_delivered().is_err());
        assert!(d.mark_failed().is_err());
    }

    #[test]
    fn test_record_parcel() {
        let mut d = delivery();
        d.record_parcel(Parcel::new(10.0, 5.0, true)).unwrap();
        assert_eq!(d.parcel(), Parcel::new(10.0, 5.0, true));

        let err = d.record_parcel(Parcel::new(-1.0, 5.0, false)).unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidParcel { .. }));
        assert_eq!(d.parcel(), Parcel::new(10.0, 5.0, true));
    }
}
