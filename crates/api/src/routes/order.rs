//! Order endpoints under `/api/v1/order`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use common::{OrderId, PaymentId, ProductQuantities};
use document_store::Page;
use domain::Order;
use saga::NewOrder;
use serde::Deserialize;

use super::parse_id;
use crate::AppState;
use crate::error::ApiError;
use crate::extract::{JsonBody, QueryParams};

/// Header carrying the name of the user placing or listing orders.
pub const USER_HEADER: &str = "x-user-name";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/order", get(list).put(create))
        .route("/api/v1/order/{id}", get(fetch))
        .route("/api/v1/order/{id}/assembly", post(send_to_assembly))
        .route("/api/v1/order/{id}/assembly-failed", post(assembly_failed))
        .route("/api/v1/order/{id}/pay", post(pay))
        .route("/api/v1/order/{id}/payment-failed", post(payment_failed))
        .route("/api/v1/order/{id}/delivery", post(send_to_delivery))
        .route("/api/v1/order/{id}/delivery-failed", post(delivery_failed))
        .route("/api/v1/order/{id}/delivered", post(delivered))
        .route("/api/v1/order/{id}/completed", post(complete))
        .route("/api/v1/order/{id}/return", post(return_products))
        .route("/api/v1/order/{id}/total-price", post(calculate_total_price))
        .route("/api/v1/order/{id}/delivery-price", post(calculate_delivery_price))
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

fn default_page_size() -> u32 {
    Page::default().size
}

#[derive(Debug, Deserialize)]
pub struct PayParams {
    pub payment_id: Option<PaymentId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReturnRequest {
    /// Products to send back; all of them when absent.
    #[serde(default)]
    pub products: Option<ProductQuantities>,
}

fn username(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest("X-User-Name header is required".to_string()))
}

/// PUT /api/v1/order: place an order for the user in `X-User-Name`.
#[tracing::instrument(skip(state, headers, request))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<NewOrder>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let username = username(&headers)?;
    let order = state.services.orders.create_order(username, request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/v1/order?page=&size=: list the user's orders.
#[tracing::instrument(skip(state, headers))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    QueryParams(params): QueryParams<PageParams>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let username = username(&headers)?;
    let orders = state
        .services
        .orders
        .list_orders(username, Page::new(params.page, params.size))
        .await?;
    Ok(Json(orders))
}

/// GET /api/v1/order/:id
#[tracing::instrument(skip(state))]
pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id: OrderId = parse_id(&id)?;
    Ok(Json(state.services.orders.get_order(order_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn send_to_assembly(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id: OrderId = parse_id(&id)?;
    Ok(Json(state.services.orders.send_to_assembly(order_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn assembly_failed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id: OrderId = parse_id(&id)?;
    Ok(Json(state.services.orders.assembly_failed(order_id).await?))
}

/// POST /api/v1/order/:id/pay?payment_id=
#[tracing::instrument(skip(state))]
pub async fn pay(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    QueryParams(params): QueryParams<PayParams>,
) -> Result<Json<Order>, ApiError> {
    let order_id: OrderId = parse_id(&id)?;
    Ok(Json(
        state
            .services
            .orders
            .pay(order_id, params.payment_id)
            .await?,
    ))
}

#[tracing::instrument(skip(state))]
pub async fn payment_failed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id: OrderId = parse_id(&id)?;
    Ok(Json(state.services.orders.payment_failed(order_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn send_to_delivery(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id: OrderId = parse_id(&id)?;
    Ok(Json(state.services.orders.send_to_delivery(order_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn delivery_failed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id: OrderId = parse_id(&id)?;
    Ok(Json(state.services.orders.delivery_failed(order_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn delivered(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id: OrderId = parse_id(&id)?;
    Ok(Json(state.services.orders.delivered(order_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn complete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id: OrderId = parse_id(&id)?;
    Ok(Json(state.services.orders.complete(order_id).await?))
}

/// POST /api/v1/order/:id/return with `{"products": {...}}` or `{}`.
#[tracing::instrument(skip(state, request))]
pub async fn return_products(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<ReturnRequest>,
) -> Result<Json<Order>, ApiError> {
    let order_id: OrderId = parse_id(&id)?;
    Ok(Json(
        state
            .services
            .orders
            .return_products(order_id, request.products)
            .await?,
    ))
}

#[tracing::instrument(skip(state))]
pub async fn calculate_total_price(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id: OrderId = parse_id(&id)?;
    Ok(Json(state.services.orders.calculate_total_price(order_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn calculate_delivery_price(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id: OrderId = parse_id(&id)?;
    Ok(Json(
        state
            .services
            .orders
            .calculate_delivery_price(order_id)
            .await?,
    ))
}
