//! Product catalog and stock levels.

use std::collections::HashMap;

use common::{ProductId, ProductQuantities};
use serde::{Deserialize, Serialize};

use super::{BookedProducts, WarehouseError};

/// Package dimensions of a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Dimension {
    pub fn volume(&self) -> f64 {
        self.width * self.height * self.depth
    }
}

/// A product kept in the warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseProduct {
    pub product_id: ProductId,
    pub fragile: bool,
    pub dimension: Dimension,
    pub weight: f64,
    #[serde(default)]
    pub quantity: u64,
}

impl WarehouseProduct {
    fn is_valid(&self) -> bool {
        let d = self.dimension;
        [d.width, d.height, d.depth, self.weight]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Stock levels for every product in one warehouse.
#[derive(Debug, Clone, Default)]
pub struct Stock {
    products: HashMap<ProductId, WarehouseProduct>,
}

impl Stock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&WarehouseProduct> {
        self.products.get(product_id)
    }

    /// Number of units on hand, or `None` for an unknown product.
    pub fn quantity(&self, product_id: &ProductId) -> Option<u64> {
        self.products.get(product_id).map(|p| p.quantity)
    }

    /// Registers a new product.
    pub fn add_new_product(&mut self, product: WarehouseProduct) -> Result<(), WarehouseError> {
        if self.products.contains_key(&product.product_id) {
            return Err(WarehouseError::ProductAlreadyExists {
                product_id: product.product_id,
            });
        }

        if !product.is_valid() {
            return Err(WarehouseError::InvalidProduct {
                product_id: product.product_id,
            });
        }

        self.products.insert(product.product_id, product);
        Ok(())
    }

    /// Adds units of an existing product.
    pub fn add_quantity(&mut self, product_id: ProductId, quantity: u64) -> Result<(), WarehouseError> {
        let product = self
            .products
            .get_mut(&product_id)
            .ok_or(WarehouseError::ProductNotFound { product_id })?;
        product.quantity = product.quantity.saturating_add(quantity);
        Ok(())
    }

    /// Checks that every product in `cart` is on hand and sums the parcel
    /// dimensions.
    pub fn check(&self, cart: &ProductQuantities) -> Result<BookedProducts, WarehouseError> {
        let mut booked = BookedProducts::default();

        for (product_id, requested) in cart {
            let product = self
                .products
                .get(product_id)
                .ok_or(WarehouseError::ProductNotFound {
                    product_id: *product_id,
                })?;

            if product.quantity < *requested {
                return Err(WarehouseError::InsufficientQuantity {
                    product_id: *product_id,
                    requested: *requested,
                    available: product.quantity,
                });
            }

            let count = *requested as f64;
            booked.delivery_weight += product.weight * count;
            booked.delivery_volume += product.dimension.volume() * count;
            booked.fragile |= product.fragile;
        }

        Ok(booked)
    }

    /// Takes the products in `cart` off the shelf.
    ///
    /// All-or-nothing: on error no quantity changes.
    pub fn reserve(&mut self, cart: &ProductQuantities) -> Result<BookedProducts, WarehouseError> {
        let booked = self.check(cart)?;

        for (product_id, requested) in cart {
            if let Some(product) = self.products.get_mut(product_id) {
                product.quantity -= requested;
            }
        }

        Ok(booked)
    }

    /// Puts returned products back on the shelf.
    ///
    /// All-or-nothing: an unknown product rejects the whole return.
    pub fn restock(&mut self, products: &ProductQuantities) -> Result<(), WarehouseError> {
        if let Some(product_id) = products.keys().find(|id| !self.products.contains_key(*id)) {
            return Err(WarehouseError::ProductNotFound {
                product_id: *product_id,
            });
        }

        for (product_id, count) in products {
            if let Some(product) = self.products.get_mut(product_id) {
                product.quantity = product.quantity.saturating_add(*count);
            }
        }

        Ok(())
    }
}
