//! ht-triad: synchronized half-time odds triad extractor
//!
//! This library provides the core components for:
//! - Reading Betfair historical market files (football 1X2 markets)
//! - Resolving selection-to-outcome role mappings and effective kick-off times
//! - Normalizing raw price updates into windowed per-outcome sample series
//! - Finding and selecting synchronized Home/Draw/Away price triads
//! - Two-phase extraction (exact window, relaxed fallback) across a match set
//! - CSV reporting plus optional per-match diagnostic artifacts
//! - Observability via structured logging and run counters

pub mod cli;
pub mod config;
pub mod extract;
pub mod feed;
pub mod market;
pub mod normalize;
pub mod report;
pub mod telemetry;
pub mod triad;
