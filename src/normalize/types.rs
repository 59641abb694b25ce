//! Windowed sample types

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market::OutcomeRole;

/// Closed time range relative to kick-off within which triads are searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// Window spanning `kickoff + from_min` to `kickoff + to_min` minutes
    pub fn from_kickoff(kickoff: DateTime<Utc>, from_min: i64, to_min: i64) -> Self {
        Self {
            start: kickoff + Duration::minutes(from_min),
            end: kickoff + Duration::minutes(to_min),
        }
    }

    /// Both bounds are inclusive
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// One observed price for one outcome at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

/// Per-outcome sample series, ascending by timestamp, at most one sample
/// per distinct timestamp, every timestamp inside the window
#[derive(Debug, Clone, Default, Serialize)]
pub struct WindowedSeries {
    home: Vec<Sample>,
    draw: Vec<Sample>,
    away: Vec<Sample>,
}

impl WindowedSeries {
    /// Assemble from per-role lanes. Each lane must already be ascending
    /// by timestamp with distinct timestamps.
    pub fn from_parts(home: Vec<Sample>, draw: Vec<Sample>, away: Vec<Sample>) -> Self {
        Self { home, draw, away }
    }

    pub fn role(&self, role: OutcomeRole) -> &[Sample] {
        match role {
            OutcomeRole::Home => &self.home,
            OutcomeRole::Draw => &self.draw,
            OutcomeRole::Away => &self.away,
        }
    }

    /// Total sample count across the three roles
    pub fn len(&self) -> usize {
        self.home.len() + self.draw.len() + self.away.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every role has at least one sample
    pub fn has_all_roles(&self) -> bool {
        !self.home.is_empty() && !self.draw.is_empty() && !self.away.is_empty()
    }
}
