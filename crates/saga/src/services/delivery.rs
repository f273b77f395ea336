//! Delivery service.

use std::sync::Arc;

use common::{DeliveryId, OrderId};
use document_store::{Page, Repository};
use domain::{Delivery, DeliveryCostConfig, Parcel};

use crate::clients::{DeliveryCostRequest, NewDelivery, OrderClient, WarehouseClient};
use crate::error::{Result, SagaError};

/// Owns deliveries.
///
/// Every state change makes its downstream call first and only commits the
/// delivery once that call succeeded. Delivered and failed deliveries each
/// report back to the order service exactly once.
pub struct DeliveryService<R: Repository<Delivery>> {
    deliveries: R,
    warehouse: Arc<dyn WarehouseClient>,
    orders: Arc<dyn OrderClient>,
    cost: DeliveryCostConfig,
}

impl<R: Repository<Delivery>> DeliveryService<R> {
    pub fn new(
        deliveries: R,
        warehouse: Arc<dyn WarehouseClient>,
        orders: Arc<dyn OrderClient>,
        cost: DeliveryCostConfig,
    ) -> Self {
        Self {
            deliveries,
            warehouse,
            orders,
            cost,
        }
    }

    pub fn cost_config(&self) -> &DeliveryCostConfig {
        &self.cost
    }

    /// Registers the delivery for an order. An order has at most one
    /// delivery; asking again returns the existing one.
    #[tracing::instrument(skip(self, request), fields(order_id = %request.order_id))]
    pub async fn create_delivery(&self, request: NewDelivery) -> Result<Delivery> {
        if let Some(existing) = self.delivery_for_order(request.order_id).await? {
            tracing::debug!(delivery_id = %existing.id(), "delivery already registered");
            return Ok(existing);
        }

        let delivery = Delivery::new(
            request.order_id,
            request.warehouse_address,
            request.delivery_address,
        );
        self.deliveries.save(&delivery).await?;

        metrics::counter!("deliveries_created_total").increment(1);
        tracing::info!(delivery_id = %delivery.id(), "delivery created");
        Ok(delivery)
    }

    /// Returns the delivery registered for an order, if any.
    pub async fn delivery_for_order(&self, order_id: OrderId) -> Result<Option<Delivery>> {
        let mut found = self
            .deliveries
            .find_where("order_id", &order_id.to_string(), Page::new(0, 1))
            .await?;
        Ok(found.pop())
    }

    pub async fn get_delivery(&self, delivery_id: DeliveryId) -> Result<Delivery> {
        self.deliveries
            .get(delivery_id)
            .await?
            .ok_or_else(|| SagaError::not_found("Delivery", delivery_id))
    }

    /// Prices a delivery and records the parcel on it.
    #[tracing::instrument(skip(self))]
    pub async fn calculate_cost(&self, request: DeliveryCostRequest) -> Result<f64> {
        let delivery_id = request
            .delivery_id
            .ok_or_else(|| SagaError::Validation("delivery id is required".to_string()))?;
        let mut delivery = self.get_delivery(delivery_id).await?;

        delivery.record_parcel(Parcel::new(request.weight, request.volume, request.fragile))?;
        let cost = self.cost.calculate(
            delivery.warehouse_address(),
            delivery.delivery_address(),
            delivery.parcel(),
        );
        self.deliveries.save(&delivery).await?;

        metrics::histogram!("delivery_cost").record(cost);
        tracing::debug!(cost, "delivery priced");
        Ok(cost)
    }

    /// Created → InProgress; the warehouse hands the goods over first.
    #[tracing::instrument(skip(self))]
    pub async fn accept_delivery(&self, delivery_id: DeliveryId) -> Result<Delivery> {
        let mut delivery = self.get_delivery(delivery_id).await?;
        delivery.ensure_can_accept()?;

        self.warehouse
            .ship_products_to_delivery(delivery.order_id(), delivery_id)
            .await?;

        delivery.accept()?;
        self.commit(&delivery).await?;
        Ok(delivery)
    }

    /// InProgress → Delivered; the order is told first.
    #[tracing::instrument(skip(self))]
    pub async fn mark_delivered(&self, delivery_id: DeliveryId) -> Result<Delivery> {
        let mut delivery = self.get_delivery(delivery_id).await?;
        delivery.ensure_can_mark_delivered()?;

        self.orders.delivered(delivery.order_id()).await?;

        delivery.mark_delivered()?;
        self.commit(&delivery).await?;
        Ok(delivery)
    }

    /// Created or InProgress → Failed; the order is told first.
    #[tracing::instrument(skip(self))]
    pub async fn mark_failed(&self, delivery_id: DeliveryId) -> Result<Delivery> {
        let mut delivery = self.get_delivery(delivery_id).await?;
        delivery.ensure_can_mark_failed()?;

        self.orders.delivery_failed(delivery.order_id()).await?;

        delivery.mark_failed()?;
        self.commit(&delivery).await?;
        Ok(delivery)
    }

    async fn commit(&self, delivery: &Delivery) -> Result<()> {
        self.deliveries.save(delivery).await?;
        metrics::counter!("delivery_transitions_total", "state" => delivery.state().as_str())
            .increment(1);
        tracing::info!(state = %delivery.state(), "delivery state changed");
        Ok(())
    }
}
