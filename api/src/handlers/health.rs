use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::handlers::ErrorResponse;
use crate::state::AppState;

/// Health check endpoint; probes the store through the pool
#[tracing::instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, ErrorResponse> {
    state.db.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Health check failed");
        ErrorResponse::new("service_unavailable", "Database is unreachable")
    })?;

    Ok((StatusCode::OK, "OK"))
}
