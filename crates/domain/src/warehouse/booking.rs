//! Per-order bookings of reserved stock.

use chrono::{DateTime, Utc};
use common::{BookingId, DeliveryId, OrderId, ProductQuantities};
use serde::{Deserialize, Serialize};

use super::WarehouseError;

/// Combined dimensions of a set of booked products.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BookedProducts {
    pub delivery_weight: f64,
    pub delivery_volume: f64,
    pub fragile: bool,
}

/// Stock reserved for one order, held until it ships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub order_id: OrderId,
    pub products: ProductQuantities,
    pub delivery_id: Option<DeliveryId>,
    pub delivery_weight: f64,
    pub delivery_volume: f64,
    pub fragile: bool,
    pub shipped: bool,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(order_id: OrderId, products: ProductQuantities, booked: BookedProducts) -> Self {
        Self {
            id: BookingId::new(),
            order_id,
            products,
            delivery_id: None,
            delivery_weight: booked.delivery_weight,
            delivery_volume: booked.delivery_volume,
            fragile: booked.fragile,
            shipped: false,
            created_at: Utc::now(),
        }
    }

    pub fn booked(&self) -> BookedProducts {
        BookedProducts {
            delivery_weight: self.delivery_weight,
            delivery_volume: self.delivery_volume,
            fragile: self.fragile,
        }
    }

    /// Hands the booked goods to a delivery.
    ///
    /// Repeating the hand-over to the same delivery is accepted.
    pub fn ship(&mut self, delivery_id: DeliveryId) -> Result<(), WarehouseError> {
        match self.delivery_id {
            Some(existing) if existing != delivery_id => Err(WarehouseError::AlreadyShipped {
                order_id: self.order_id,
                delivery_id: existing,
            }),
            _ => {
                self.delivery_id = Some(delivery_id);
                self.shipped = true;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking() -> Booking {
        Booking::new(
            OrderId::new(),
            ProductQuantities::new(),
            BookedProducts {
                delivery_weight: 1.0,
                delivery_volume: 2.0,
                fragile: false,
            },
        )
    }

    #[test]
    fn test_ship_resolves_booking() {
        let mut b = booking();
        let delivery = DeliveryId::new();
        b.ship(delivery).unwrap();
        assert!(b.shipped);
        assert_eq!(b.delivery_id, Some(delivery));

        b.ship(delivery).unwrap();
    }

    #[test]
    fn test_ship_to_another_delivery_fails() {
        let mut b = booking();
        let first = DeliveryId::new();
        b.ship(first).unwrap();

        let err = b.ship(DeliveryId::new()).unwrap_err();
        assert_eq!(
            err,
            WarehouseError::AlreadyShipped {
                order_id: b.order_id,
                delivery_id: first,
            }
        );
    }
}
