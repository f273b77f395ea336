//! Delivery endpoints under `/api/v1/delivery`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use common::DeliveryId;
use domain::Delivery;
use saga::{DeliveryCostRequest, NewDelivery};
use serde::Serialize;

use super::parse_id;
use crate::AppState;
use crate::error::ApiError;
use crate::extract::JsonBody;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/delivery", put(create))
        .route("/api/v1/delivery/cost", post(cost))
        .route("/api/v1/delivery/{id}", get(fetch))
        .route("/api/v1/delivery/{id}/accept", post(accept))
        .route("/api/v1/delivery/{id}/delivered", post(delivered))
        .route("/api/v1/delivery/{id}/failed", post(failed))
}

#[derive(Debug, Serialize)]
pub struct DeliveryCostResponse {
    pub delivery_cost: f64,
}

#[tracing::instrument(skip(state, request))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<NewDelivery>,
) -> Result<(StatusCode, Json<Delivery>), ApiError> {
    let delivery = state.services.deliveries.create_delivery(request).await?;
    Ok((StatusCode::CREATED, Json(delivery)))
}

#[tracing::instrument(skip(state))]
pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Delivery>, ApiError> {
    let delivery_id: DeliveryId = parse_id(&id)?;
    Ok(Json(state.services.deliveries.get_delivery(delivery_id).await?))
}

/// POST /api/v1/delivery/cost: price a delivery and record its parcel.
#[tracing::instrument(skip(state))]
pub async fn cost(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<DeliveryCostRequest>,
) -> Result<Json<DeliveryCostResponse>, ApiError> {
    let delivery_cost = state.services.deliveries.calculate_cost(request).await?;
    Ok(Json(DeliveryCostResponse { delivery_cost }))
}

#[tracing::instrument(skip(state))]
pub async fn accept(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Delivery>, ApiError> {
    let delivery_id: DeliveryId = parse_id(&id)?;
    Ok(Json(state.services.deliveries.accept_delivery(delivery_id).await?))
}

/// POST /api/v1/delivery/:id/delivered: completes the order too.
#[tracing::instrument(skip(state))]
pub async fn delivered(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Delivery>, ApiError> {
    let delivery_id: DeliveryId = parse_id(&id)?;
    Ok(Json(state.services.deliveries.mark_delivered(delivery_id).await?))
}

/// POST /api/v1/delivery/:id/failed: fails the order's delivery too.
#[tracing::instrument(skip(state))]
pub async fn failed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Delivery>, ApiError> {
    let delivery_id: DeliveryId = parse_id(&id)?;
    Ok(Json(state.services.deliveries.mark_failed(delivery_id).await?))
}
