pub mod config;
pub mod handlers;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request},
    middleware::{from_fn, Next},
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::BillingConfig;
use crate::services::ledger::Ledger;
use crate::services::metrics::HTTP_REQUESTS_TOTAL;
use crate::services::store::SnapshotStore;
use service_core::middleware::tracing::request_id_middleware;

/// Shared application state.
///
/// The RwLock is the mutual-exclusion boundary for the ledger: invoice
/// creation's check-then-decrement and number allocation run under the
/// write lock, so they are atomic with respect to concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub config: BillingConfig,
    pub ledger: Arc<RwLock<Ledger>>,
    pub store: SnapshotStore,
}

async fn track_metrics(req: Request, next: Next) -> Response {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let method = req.method().to_string();

    let response = next.run(req).await;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, response.status().as_str()])
        .inc();

    response
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics::metrics_handler))
        .route("/products", post(handlers::products::create_product))
        .route("/products", get(handlers::products::list_products))
        .route("/products/:id", get(handlers::products::get_product))
        .route("/products/:id", put(handlers::products::update_product))
        .route("/products/:id", delete(handlers::products::delete_product))
        .route("/invoices", post(handlers::invoices::create_invoice))
        .route("/invoices", get(handlers::invoices::list_invoices))
        .route("/invoices/:id", get(handlers::invoices::get_invoice))
        .route("/invoices/:id", delete(handlers::invoices::delete_invoice))
        .route(
            "/invoices/:id/payments",
            post(handlers::invoices::record_payment),
        )
        .route("/reports/summary", get(handlers::reports::summary))
        .layer(from_fn(track_metrics))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
