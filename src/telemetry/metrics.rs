//! Run counters with an optional Prometheus exporter

use metrics_exporter_prometheus::PrometheusBuilder;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Market files discovered under the input directory
    FilesDiscovered,
    /// Files that produced a football 1X2 match
    MatchesProcessed,
    /// Matches resolved by the exact phase
    ExactTriads,
    /// Matches resolved by the relaxed fallback
    RelaxedTriads,
    /// Matches with no synchronized triad
    NoTriad,
    /// Markets that did not resolve to a three-way mapping
    MalformedMarkets,
    /// Matches whose kick-off time was corrected
    KickoffCorrections,
    /// Files that failed to read
    ReadErrors,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::FilesDiscovered => "httriad_files_discovered",
            CounterMetric::MatchesProcessed => "httriad_matches_processed",
            CounterMetric::ExactTriads => "httriad_exact_triads",
            CounterMetric::RelaxedTriads => "httriad_relaxed_triads",
            CounterMetric::NoTriad => "httriad_no_triad",
            CounterMetric::MalformedMarkets => "httriad_malformed_markets",
            CounterMetric::KickoffCorrections => "httriad_kickoff_corrections",
            CounterMetric::ReadErrors => "httriad_read_errors",
        }
    }
}

/// Increment a run counter by one
pub fn increment(metric: CounterMetric) {
    add(metric, 1);
}

/// Add to a run counter
pub fn add(metric: CounterMetric, value: u64) {
    metrics::counter!(metric.name()).increment(value);
}

/// Bind the Prometheus exporter for the duration of the process
pub fn install_exporter(port: u16) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    tracing::info!(port, "Prometheus exporter listening");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_names_are_prefixed() {
        let all = [
            CounterMetric::FilesDiscovered,
            CounterMetric::MatchesProcessed,
            CounterMetric::ExactTriads,
            CounterMetric::RelaxedTriads,
            CounterMetric::NoTriad,
            CounterMetric::MalformedMarkets,
            CounterMetric::KickoffCorrections,
            CounterMetric::ReadErrors,
        ];
        for metric in all {
            assert!(metric.name().starts_with("httriad_"));
        }
    }
}
