//! Warehouse endpoints under `/api/v1/warehouse`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use common::{Address, DeliveryId, OrderId, ProductId, ProductQuantities};
use domain::{BookedProducts, Booking, WarehouseProduct};
use serde::Deserialize;

use super::parse_id;
use crate::AppState;
use crate::error::ApiError;
use crate::extract::JsonBody;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/warehouse/product", put(add_new_product))
        .route("/api/v1/warehouse/product/{id}", get(product))
        .route("/api/v1/warehouse/add", post(add_quantity))
        .route("/api/v1/warehouse/check", post(check))
        .route("/api/v1/warehouse/assembly", post(assembly))
        .route("/api/v1/warehouse/shipped", post(shipped))
        .route("/api/v1/warehouse/return", post(return_products))
        .route("/api/v1/warehouse/address", get(address))
}

#[derive(Debug, Deserialize)]
pub struct AddQuantityRequest {
    pub product_id: ProductId,
    pub quantity: u64,
}

#[derive(Debug, Deserialize)]
pub struct AssemblyRequest {
    pub order_id: OrderId,
    pub products: ProductQuantities,
}

#[derive(Debug, Deserialize)]
pub struct ShippedRequest {
    pub order_id: OrderId,
    pub delivery_id: DeliveryId,
}

/// PUT /api/v1/warehouse/product: register a new product.
#[tracing::instrument(skip(state, product))]
pub async fn add_new_product(
    State(state): State<Arc<AppState>>,
    JsonBody(product): JsonBody<WarehouseProduct>,
) -> Result<StatusCode, ApiError> {
    state.services.warehouse.add_new_product(product).await?;
    Ok(StatusCode::CREATED)
}

#[tracing::instrument(skip(state))]
pub async fn product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WarehouseProduct>, ApiError> {
    let product_id: ProductId = parse_id(&id)?;
    Ok(Json(state.services.warehouse.product(product_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn add_quantity(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<AddQuantityRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .warehouse
        .add_product_quantity(request.product_id, request.quantity)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/warehouse/check: stock check without booking anything.
#[tracing::instrument(skip(state, cart))]
pub async fn check(
    State(state): State<Arc<AppState>>,
    JsonBody(cart): JsonBody<ProductQuantities>,
) -> Result<Json<BookedProducts>, ApiError> {
    Ok(Json(
        state.services.warehouse.check_products_quantity(&cart).await?,
    ))
}

#[tracing::instrument(skip(state))]
pub async fn assembly(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<AssemblyRequest>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state
        .services
        .warehouse
        .assembly_products_for_order(request.order_id, &request.products)
        .await?;
    Ok(Json(booking))
}

#[tracing::instrument(skip(state))]
pub async fn shipped(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<ShippedRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .warehouse
        .ship_products_to_delivery(request.order_id, request.delivery_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state, products))]
pub async fn return_products(
    State(state): State<Arc<AppState>>,
    JsonBody(products): JsonBody<ProductQuantities>,
) -> Result<StatusCode, ApiError> {
    state.services.warehouse.return_products(&products).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/warehouse/address
pub async fn address(State(state): State<Arc<AppState>>) -> Json<Address> {
    Json(state.services.warehouse.warehouse_address().clone())
}
