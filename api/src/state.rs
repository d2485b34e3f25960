use common::db::DbPool;
use metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    /// Renders `/metrics`; absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(db: DbPool, metrics: Option<PrometheusHandle>) -> Self {
        Self { db, metrics }
    }
}
