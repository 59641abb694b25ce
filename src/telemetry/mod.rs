//! Telemetry module
//!
//! Structured logging and run counters

mod logging;
mod metrics;

pub use logging::init_logging;
pub use metrics::{add, increment, CounterMetric};

use crate::config::TelemetryConfig;

/// Guard that cleans up telemetry on drop
pub struct TelemetryGuard {
    _priv: (),
}

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    init_logging(&config.log_level)?;

    if let Some(port) = config.metrics_port {
        metrics::install_exporter(port)?;
    }

    Ok(TelemetryGuard { _priv: () })
}
