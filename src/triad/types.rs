//! Triad types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::market::OutcomeRole;
use crate::normalize::Sample;

/// One price sample per outcome, considered jointly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triad {
    pub home: Sample,
    pub draw: Sample,
    pub away: Sample,
}

impl Triad {
    pub fn leg(&self, role: OutcomeRole) -> &Sample {
        match role {
            OutcomeRole::Home => &self.home,
            OutcomeRole::Draw => &self.draw,
            OutcomeRole::Away => &self.away,
        }
    }

    /// Latest constituent timestamp
    pub fn latest_timestamp(&self) -> DateTime<Utc> {
        self.home
            .timestamp
            .max(self.draw.timestamp)
            .max(self.away.timestamp)
    }

    /// Earliest constituent timestamp
    pub fn earliest_timestamp(&self) -> DateTime<Utc> {
        self.home
            .timestamp
            .min(self.draw.timestamp)
            .min(self.away.timestamp)
    }

    /// Internal spread between the earliest and latest constituent
    pub fn spread(&self) -> Duration {
        self.latest_timestamp() - self.earliest_timestamp()
    }

    /// The (home, draw, away) timestamp tuple, used as a deterministic
    /// final tie-breaker between otherwise equal candidates
    pub fn timestamp_key(&self) -> (DateTime<Utc>, DateTime<Utc>, DateTime<Utc>) {
        (
            self.home.timestamp,
            self.draw.timestamp,
            self.away.timestamp,
        )
    }
}

/// Which search phase produced a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMethod {
    Exact,
    Relaxed,
}

impl SelectionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionMethod::Exact => "exact",
            SelectionMethod::Relaxed => "relaxed",
        }
    }
}

impl std::fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selected triad together with the phase that found it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriadSelection {
    pub method: SelectionMethod,
    pub triad: Triad,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample(sec: u32, price: rust_decimal::Decimal) -> Sample {
        Sample {
            timestamp: Utc.with_ymd_and_hms(2019, 5, 9, 14, 58, sec).unwrap(),
            price,
        }
    }

    #[test]
    fn test_triad_spread() {
        let triad = Triad {
            home: sample(30, dec!(2.5)),
            draw: sample(40, dec!(3.4)),
            away: sample(50, dec!(3.1)),
        };
        assert_eq!(triad.spread(), Duration::seconds(20));
        assert_eq!(triad.latest_timestamp(), triad.away.timestamp);
        assert_eq!(triad.earliest_timestamp(), triad.home.timestamp);
    }

    #[test]
    fn test_selection_method_labels() {
        assert_eq!(SelectionMethod::Exact.to_string(), "exact");
        assert_eq!(SelectionMethod::Relaxed.to_string(), "relaxed");
    }

    #[test]
    fn test_leg_by_role() {
        let triad = Triad {
            home: sample(1, dec!(2.5)),
            draw: sample(2, dec!(3.4)),
            away: sample(3, dec!(3.1)),
        };
        assert_eq!(triad.leg(OutcomeRole::Draw).price, dec!(3.4));
    }
}
