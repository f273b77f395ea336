//! In-memory product catalog.

use std::collections::HashMap;

use async_trait::async_trait;
use common::ProductId;
use tokio::sync::RwLock;

use crate::clients::ProductCatalog;
use crate::error::{Result, SagaError};

/// Product prices kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    prices: RwLock<HashMap<ProductId, f64>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the unit price of a product.
    pub async fn set_price(&self, product_id: ProductId, price: f64) -> Result<()> {
        if !price.is_finite() || price < 0.0 {
            return Err(SagaError::Validation(format!("invalid price: {price}")));
        }

        self.prices.write().await.insert(product_id, price);
        Ok(())
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn unit_price(&self, product_id: ProductId) -> Result<f64> {
        self.prices
            .read()
            .await
            .get(&product_id)
            .copied()
            .ok_or_else(|| SagaError::not_found("Product", product_id))
    }
}
