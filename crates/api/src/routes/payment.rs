//! Payment endpoints under `/api/v1/payment`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use common::{PaymentId, ProductQuantities};
use domain::Payment;
use saga::NewPayment;
use serde::{Deserialize, Serialize};

use super::parse_id;
use crate::AppState;
use crate::error::ApiError;
use crate::extract::JsonBody;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/payment", put(create))
        .route("/api/v1/payment/product-cost", post(product_cost))
        .route("/api/v1/payment/total-cost", post(total_cost))
        .route("/api/v1/payment/{id}", get(fetch))
        .route("/api/v1/payment/{id}/success", post(success))
        .route("/api/v1/payment/{id}/failed", post(failed))
}

#[derive(Debug, Deserialize)]
pub struct TotalCostRequest {
    pub product_cost: f64,
    pub delivery_cost: f64,
}

#[derive(Debug, Serialize)]
pub struct ProductCostResponse {
    pub product_cost: f64,
}

#[derive(Debug, Serialize)]
pub struct TotalCostResponse {
    pub total_cost: f64,
}

#[tracing::instrument(skip(state))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<NewPayment>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let payment = state.services.payments.create_payment(request).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[tracing::instrument(skip(state))]
pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    let payment_id: PaymentId = parse_id(&id)?;
    Ok(Json(state.services.payments.get_payment(payment_id).await?))
}

/// POST /api/v1/payment/product-cost with a `{product_id: quantity}` map.
#[tracing::instrument(skip(state, products))]
pub async fn product_cost(
    State(state): State<Arc<AppState>>,
    JsonBody(products): JsonBody<ProductQuantities>,
) -> Result<Json<ProductCostResponse>, ApiError> {
    let product_cost = state
        .services
        .payments
        .calculate_product_cost(&products)
        .await?;
    Ok(Json(ProductCostResponse { product_cost }))
}

#[tracing::instrument(skip(state))]
pub async fn total_cost(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<TotalCostRequest>,
) -> Result<Json<TotalCostResponse>, ApiError> {
    let total_cost = state
        .services
        .payments
        .calculate_total_cost(request.product_cost, request.delivery_cost)?;
    Ok(Json(TotalCostResponse { total_cost }))
}

#[tracing::instrument(skip(state))]
pub async fn success(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    let payment_id: PaymentId = parse_id(&id)?;
    Ok(Json(state.services.payments.mark_success(payment_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn failed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    let payment_id: PaymentId = parse_id(&id)?;
    Ok(Json(state.services.payments.mark_failed(payment_id).await?))
}
