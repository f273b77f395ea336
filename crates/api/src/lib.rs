//! HTTP API server for the order fulfillment services.
//!
//! Exposes the order, warehouse, payment and delivery services under
//! `/api/v1/*`, with structured logging (tracing) and Prometheus metrics.
//! The services run in one process and call each other through the
//! in-process clients from [`saga`].

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use document_store::{InMemoryRepository, SharedRepository};
use domain::{Delivery, Order, Payment};
use metrics_exporter_prometheus::PrometheusHandle;
use saga::{InMemoryCatalog, Services, Stores, wire};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

/// Services over repositories chosen at startup.
pub type AppServices =
    Services<SharedRepository<Order>, SharedRepository<Delivery>, SharedRepository<Payment>>;

/// Repositories chosen at startup.
pub type AppStores =
    Stores<SharedRepository<Order>, SharedRepository<Delivery>, SharedRepository<Payment>>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub services: AppServices,
    pub catalog: Arc<InMemoryCatalog>,
    /// Name of the store backend, reported by `/health`.
    pub store: &'static str,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .merge(routes::order::router())
        .merge(routes::delivery::router())
        .merge(routes::payment::router())
        .merge(routes::warehouse::router())
        .merge(routes::catalog::router())
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the services over the given stores.
pub fn create_state(stores: AppStores, config: &Config, store: &'static str) -> Arc<AppState> {
    let catalog = Arc::new(InMemoryCatalog::new());
    let services = wire(stores, config.services_config(), catalog.clone());

    tracing::info!(store, warehouse = %config.warehouse_address, "application state created");
    Arc::new(AppState {
        services,
        catalog,
        store,
    })
}

/// Creates the application state over in-memory stores.
pub fn create_default_state(config: &Config) -> Arc<AppState> {
    let orders: SharedRepository<Order> = Arc::new(InMemoryRepository::new());
    let deliveries: SharedRepository<Delivery> = Arc::new(InMemoryRepository::new());
    let payments: SharedRepository<Payment> = Arc::new(InMemoryRepository::new());

    create_state(
        Stores {
            orders,
            deliveries,
            payments,
        },
        config,
        "memory",
    )
}
