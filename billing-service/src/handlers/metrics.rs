use crate::services::metrics::get_metrics;

/// Prometheus scrape endpoint.
///
/// GET /metrics
pub async fn metrics_handler() -> String {
    get_metrics()
}
