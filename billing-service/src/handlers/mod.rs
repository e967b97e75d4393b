//! HTTP handlers for billing-service.

pub mod invoices;
pub mod metrics;
pub mod products;
pub mod reports;

use axum::Json;
use serde_json::{json, Value};

/// Liveness probe.
///
/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "billing-service" }))
}
