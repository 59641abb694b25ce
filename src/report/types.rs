//! Reporting types

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::market::OutcomeRole;
use crate::normalize::{Window, WindowedSeries};
use crate::triad::{Triad, TriadSelection};

/// Matches running longer than this from schedule to last update are
/// flagged in the report
const LONG_RUN_THRESHOLD_MIN: i64 = 150;

/// Report sink errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize diagnostics for {market_id}: {source}")]
    Serialize {
        market_id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Settled result of one outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutcomeResult {
    Winner,
    Loser,
}

impl OutcomeResult {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeResult::Winner => "WINNER",
            OutcomeResult::Loser => "LOSER",
        }
    }
}

/// Settled results for the three outcomes
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MatchResults {
    pub home: OutcomeResult,
    pub draw: OutcomeResult,
    pub away: OutcomeResult,
}

impl MatchResults {
    pub fn role(&self, role: OutcomeRole) -> OutcomeResult {
        match role {
            OutcomeRole::Home => self.home,
            OutcomeRole::Draw => self.draw,
            OutcomeRole::Away => self.away,
        }
    }
}

/// Everything the report sink needs for one match
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub market_id: String,
    pub event_id: Option<String>,
    pub event_name: Option<String>,
    pub country_code: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub results: MatchResults,
    /// Effective kick-off used for the triad search
    pub kickoff: Option<DateTime<Utc>>,
    /// Scheduled market time from the first definition
    pub scheduled: Option<DateTime<Utc>>,
    pub kickoff_corrected: bool,
    pub last_price_at: Option<DateTime<Utc>>,
    pub last_tick_at: Option<DateTime<Utc>>,
    pub total_ticks: usize,
    pub selection: Option<TriadSelection>,
}

impl MatchSummary {
    /// The `ht_selection_method` column value
    pub fn method_label(&self) -> &'static str {
        match &self.selection {
            Some(selection) => selection.method.as_str(),
            None => "none",
        }
    }

    /// Selected odds for one outcome, empty when no triad was found
    pub fn odds(&self, role: OutcomeRole) -> Option<Decimal> {
        self.selection
            .as_ref()
            .map(|s| s.triad.leg(role).price)
    }

    /// Latest constituent timestamp of the selected triad
    pub fn triad_time(&self) -> Option<DateTime<Utc>> {
        self.selection.as_ref().map(|s| s.triad.latest_timestamp())
    }

    /// Whether prices ran more than 2h30 past the scheduled time
    pub fn long_run_by_last_price(&self) -> bool {
        self.exceeds_long_run(self.last_price_at)
    }

    /// Whether any frame arrived more than 2h30 past the scheduled time
    pub fn long_run_by_last_tick(&self) -> bool {
        self.exceeds_long_run(self.last_tick_at)
    }

    fn exceeds_long_run(&self, last: Option<DateTime<Utc>>) -> bool {
        match (self.scheduled, last) {
            (Some(scheduled), Some(last)) => {
                last - scheduled > Duration::minutes(LONG_RUN_THRESHOLD_MIN)
            }
            _ => false,
        }
    }
}

/// Per-match debug artifact: the windowed evidence behind a selection
#[derive(Debug, Clone, Serialize)]
pub struct MatchDiagnostics {
    pub market_id: String,
    pub window: Window,
    pub series: WindowedSeries,
    pub exact_candidates: Vec<Triad>,
    pub relaxed_candidates: Vec<Triad>,
    pub selection: Option<TriadSelection>,
}
