//! Report sink module
//!
//! Receives one summary per match (including matches without a triad,
//! which appear with empty odds fields) and persists the run's outputs:
//! a simple results CSV, an extended results CSV with timing columns,
//! and optional per-match JSON diagnostic artifacts.

mod csv;
mod diagnostics;
mod types;

pub use csv::CsvReportSink;
pub use diagnostics::DiagnosticsWriter;
pub use types::{MatchDiagnostics, MatchResults, MatchSummary, OutcomeResult, ReportError};

/// Sink for per-match results
pub trait ReportSink {
    /// Record one match summary
    fn record(&mut self, summary: &MatchSummary) -> Result<(), ReportError>;

    /// Flush and close the sink
    fn finish(&mut self) -> Result<(), ReportError>;
}
