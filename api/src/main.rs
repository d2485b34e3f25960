use anyhow::Result;
use tokio::net::TcpListener;

mod extract;
mod handlers;
mod routes;
mod state;

use common::config::Settings;
use common::db::DbPool;
use common::telemetry;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration errors are fatal: the process never reaches a serving state
    let config = Settings::load()?;

    telemetry::init_logging(config.default_log_filter(), config.log_format)?;
    tracing::info!(
        database = %config.redacted_database_url(),
        debug = config.debug,
        "Configuration loaded"
    );

    let metrics_handle = telemetry::init_metrics()?;

    // Initialize database connection pool
    let db_pool = DbPool::connect(&config);

    // Create missing tables before accepting traffic
    db_pool.ensure_schema().await?;

    let state = AppState::new(db_pool.clone(), Some(metrics_handle));
    let app = routes::create_router(state);

    // Start server
    let addr = config.listen_addr()?;
    tracing::info!(addr = %addr, "Starting HTTP server");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    tracing::info!("API server stopped");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Initiating graceful shutdown");
}
