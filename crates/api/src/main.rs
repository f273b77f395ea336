//! API server entry point.

use std::sync::Arc;

use api::AppStores;
use api::config::Config;
use document_store::{PostgresRepository, SharedRepository};
use domain::{Delivery, Order, Payment};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Connects to Postgres, migrates, and hands each service its repository.
async fn postgres_stores(database_url: &str) -> AppStores {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .expect("failed to connect to Postgres");

    let orders = PostgresRepository::<Order>::new(pool.clone());
    orders
        .run_migrations()
        .await
        .expect("failed to run migrations");

    let orders: SharedRepository<Order> = Arc::new(orders);
    let deliveries: SharedRepository<Delivery> =
        Arc::new(PostgresRepository::<Delivery>::new(pool.clone()));
    let payments: SharedRepository<Payment> = Arc::new(PostgresRepository::<Payment>::new(pool));

    AppStores {
        orders,
        deliveries,
        payments,
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Pick the stores and wire the services
    let state = match config.database_url.as_deref() {
        Some(url) => api::create_state(postgres_stores(url).await, &config, "postgres"),
        None => api::create_default_state(&config),
    };

    // 4. Build the application
    let app = api::create_app(state, metrics_handle);

    // 5. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
