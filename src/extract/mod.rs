//! Extraction module
//!
//! Drives the per-match pipeline (role mapping, kick-off resolution,
//! two-phase triad search) across every discovered market file and
//! hands the results to the report sink.

mod extractor;
mod pipeline;
mod stats;

pub use extractor::Extractor;
pub use pipeline::{process_match, ExtractSettings, MatchReport, PhaseSettings};
pub use stats::RunStats;
