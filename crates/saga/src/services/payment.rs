//! Payment service.

use std::sync::Arc;

use common::{OrderId, PaymentId, ProductQuantities};
use document_store::Repository;
use domain::payment::{product_cost, total_cost};
use domain::{Payment, PaymentState};
use serde::{Deserialize, Serialize};

use crate::clients::{OrderCost, ProductCatalog};
use crate::error::{Result, SagaError};

/// Request to open a payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewPayment {
    pub order_id: OrderId,
    pub product_cost: f64,
    pub delivery_cost: f64,
}

/// Owns payments and prices orders.
pub struct PaymentService<R: Repository<Payment>> {
    payments: R,
    catalog: Arc<dyn ProductCatalog>,
}

impl<R: Repository<Payment>> PaymentService<R> {
    pub fn new(payments: R, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { payments, catalog }
    }

    /// Opens a pending payment.
    #[tracing::instrument(skip(self))]
    pub async fn create_payment(&self, request: NewPayment) -> Result<Payment> {
        let payment = Payment::new(request.order_id, request.product_cost, request.delivery_cost)?;
        self.payments.save(&payment).await?;

        metrics::counter!("payments_created_total").increment(1);
        tracing::info!(payment_id = %payment.id(), total_cost = payment.total_cost(), "payment created");
        Ok(payment)
    }

    pub async fn get_payment(&self, payment_id: PaymentId) -> Result<Payment> {
        self.payments
            .get(payment_id)
            .await?
            .ok_or_else(|| SagaError::not_found("Payment", payment_id))
    }

    /// Sums catalog prices for the products.
    #[tracing::instrument(skip(self, products))]
    pub async fn calculate_product_cost(&self, products: &ProductQuantities) -> Result<f64> {
        if products.is_empty() {
            return Err(SagaError::Validation("no products to price".to_string()));
        }

        let mut lines = Vec::with_capacity(products.len());
        for (product_id, quantity) in products {
            let price = self
                .catalog
                .unit_price(*product_id)
                .await
                .map_err(|err| err.from_upstream("catalog"))?;
            lines.push((price, *quantity));
        }

        Ok(product_cost(lines))
    }

    /// Product cost plus tax plus delivery.
    pub fn calculate_total_cost(&self, product_cost: f64, delivery_cost: f64) -> Result<f64> {
        check_amount("product cost", product_cost)?;
        check_amount("delivery cost", delivery_cost)?;
        Ok(total_cost(product_cost, delivery_cost))
    }

    /// Prices the products and computes the grand total in one step.
    pub async fn calculate_order_cost(
        &self,
        products: &ProductQuantities,
        delivery_cost: f64,
    ) -> Result<OrderCost> {
        let product_cost = self.calculate_product_cost(products).await?;
        let total_cost = self.calculate_total_cost(product_cost, delivery_cost)?;
        Ok(OrderCost {
            product_cost,
            total_cost,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn mark_success(&self, payment_id: PaymentId) -> Result<Payment> {
        self.settle(payment_id, PaymentState::Success).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn mark_failed(&self, payment_id: PaymentId) -> Result<Payment> {
        self.settle(payment_id, PaymentState::Failed).await
    }

    async fn settle(&self, payment_id: PaymentId, target: PaymentState) -> Result<Payment> {
        let mut payment = self.get_payment(payment_id).await?;

        if payment.settle(target)? {
            self.payments.save(&payment).await?;
            metrics::counter!("payment_settlements_total", "state" => target.as_str())
                .increment(1);
            tracing::info!(state = %target, "payment settled");
        } else {
            tracing::debug!(state = %target, "payment already settled");
        }

        Ok(payment)
    }
}

fn check_amount(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SagaError::Validation(format!("invalid {field}: {value}")))
    }
}
