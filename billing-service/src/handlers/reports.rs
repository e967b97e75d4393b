//! Reporting handlers for billing-service.

use axum::extract::{Json, State};

use crate::services::ledger::LedgerSummary;
use crate::AppState;
use service_core::error::AppError;

/// Dashboard summary: stock alerts, invoice counts, revenue aggregates.
///
/// GET /reports/summary
pub async fn summary(State(state): State<AppState>) -> Result<Json<LedgerSummary>, AppError> {
    let ledger = state.ledger.read().await;
    Ok(Json(ledger.summary()))
}
