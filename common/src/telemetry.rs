// Telemetry module for structured logging and registration metrics

use crate::config::LogFormat;
use anyhow::Result;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Counter incremented once per registration attempt that reached the handler body
pub const REGISTRATIONS_TOTAL: &str = "registrations_total";

/// Outcome label values for [`REGISTRATIONS_TOTAL`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Created,
    Rejected,
    Failed,
}

impl RegistrationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationOutcome::Created => "created",
            RegistrationOutcome::Rejected => "rejected",
            RegistrationOutcome::Failed => "failed",
        }
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter`. JSON output carries the current span
/// so request fields from `TraceLayer` end up on every line.
pub fn init_logging(default_filter: &str, format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {}", e))?;

    let layer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Text => fmt::layer()
            .with_target(false)
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;

    tracing::info!(filter = default_filter, ?format, "Logging initialized");
    Ok(())
}

/// Install the Prometheus recorder and return the handle used to render `/metrics`
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    describe_counter!(
        REGISTRATIONS_TOTAL,
        "Registration attempts by outcome (created, rejected, failed)"
    );

    Ok(handle)
}

/// Record the outcome of one registration attempt
#[inline]
pub fn record_registration(outcome: RegistrationOutcome) {
    counter!(REGISTRATIONS_TOTAL, "outcome" => outcome.as_str()).increment(1);
}
