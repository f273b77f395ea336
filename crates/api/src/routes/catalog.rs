//! Product price endpoint used to stock the in-memory catalog.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::put;
use axum::Router;
use common::ProductId;
use serde::Deserialize;

use super::parse_id;
use crate::AppState;
use crate::error::ApiError;
use crate::extract::JsonBody;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/v1/catalog/{id}", put(set_price))
}

#[derive(Debug, Deserialize)]
pub struct PriceRequest {
    pub price: f64,
}

/// PUT /api/v1/catalog/:id with `{"price": <unit price>}`.
#[tracing::instrument(skip(state))]
pub async fn set_price(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<PriceRequest>,
) -> Result<StatusCode, ApiError> {
    let product_id: ProductId = parse_id(&id)?;
    state.catalog.set_price(product_id, request.price).await?;
    Ok(StatusCode::NO_CONTENT)
}
