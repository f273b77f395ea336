//! Delivery cost calculation.

use common::Address;
use serde::{Deserialize, Serialize};

/// Pricing constants for deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryCostConfig {
    /// Flat fee, charged twice.
    pub base_cost: f64,

    /// Multiplier applied when shipping from the remote warehouse.
    pub warehouse_address_ratio: f64,

    /// Surcharge share for fragile goods.
    pub fragile_ratio: f64,

    /// Price per unit of weight.
    pub weight_ratio: f64,

    /// Price per unit of volume.
    pub volume_ratio: f64,

    /// Surcharge share when the destination differs from the warehouse.
    pub delivery_address_ratio: f64,

    /// Warehouse address marker that counts as remote.
    pub remote_address_marker: String,
}

impl Default for DeliveryCostConfig {
    fn default() -> Self {
        Self {
            base_cost: 5.0,
            warehouse_address_ratio: 2.0,
            fragile_ratio: 0.2,
            weight_ratio: 0.3,
            volume_ratio: 0.2,
            delivery_address_ratio: 0.2,
            remote_address_marker: "ADDRESS_2".to_string(),
        }
    }
}

/// Physical properties of the goods being shipped.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Parcel {
    pub weight: f64,
    pub volume: f64,
    pub fragile: bool,
}

impl Parcel {
    pub fn new(weight: f64, volume: f64, fragile: bool) -> Self {
        Self {
            weight,
            volume,
            fragile,
        }
    }

    /// Returns true if weight and volume are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.weight.is_finite() && self.weight >= 0.0 && self.volume.is_finite() && self.volume >= 0.0
    }
}

impl DeliveryCostConfig {
    /// Computes the delivery cost.
    ///
    /// The steps are applied in a fixed order; each surcharge is a share of
    /// the running total, so reordering them changes the result.
    pub fn calculate(&self, warehouse: &Address, destination: &Address, parcel: Parcel) -> f64 {
        let mut cost = self.base_cost;

        if warehouse.is_marker(&self.remote_address_marker) {
            cost *= self.warehouse_address_ratio;
        }

        cost += self.base_cost;

        if parcel.fragile {
            cost += cost * self.fragile_ratio;
        }

        cost += parcel.weight * self.weight_ratio;
        cost += parcel.volume * self.volume_ratio;

        if destination != warehouse {
            cost += cost * self.delivery_address_ratio;
        }

        cost
    }
}
