use std::sync::Arc;

use billing_service::{
    build_router,
    config::BillingConfig,
    services::{ledger, seed, store::SnapshotStore},
    AppState,
};
use chrono::Utc;
use service_core::observability::logging::init_tracing;
use std::net::SocketAddr;
use tokio::signal;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = BillingConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    // Initialize metrics
    billing_service::services::metrics::init_metrics();

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting billing service"
    );

    // Restore the ledger snapshot; seed the demo catalog on first run.
    let store = SnapshotStore::new(&config.storage_path);
    let mut ledger = match store.load()? {
        Some(snapshot) => snapshot.into_ledger(),
        None => {
            tracing::info!("No snapshot found, seeding demo catalog");
            let mut fresh = ledger::Ledger::new();
            for product in seed::demo_products() {
                fresh.add_product(product)?;
            }
            fresh
        }
    };

    ledger.refresh_expiry_statuses(Utc::now().date_naive());

    tracing::info!(
        products = ledger.products().len(),
        invoices = ledger.invoices().len(),
        "Ledger ready"
    );

    let state = AppState {
        config: config.clone(),
        ledger: Arc::new(RwLock::new(ledger)),
        store,
    };

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
    tracing::info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to install ctrl-c handler");
    tracing::info!("Shutdown signal received");
}
