//! Triad selector
//!
//! Walks the three role series merged by timestamp in descending order.
//! Each visited sample serves as the reference of a candidate: for each
//! of the other two roles the nearest-in-time sample within the
//! synchronization tolerance joins the candidate (ties between an
//! earlier and a later equidistant sample prefer the later one). A
//! candidate is valid when its total spread stays within the tolerance.
//! The best valid candidate under the configured policy wins.
//!
//! The merged walk plus per-reference binary searches keeps the search
//! at O(n log n) in the total windowed sample count; the 60s tolerance
//! makes anything beyond the local neighborhood irrelevant, so no
//! cross-product is ever formed.

use chrono::{DateTime, Duration, Utc};

use crate::market::OutcomeRole;
use crate::normalize::{Sample, WindowedSeries};

use super::types::Triad;

/// Default synchronization tolerance between the three samples of a triad
pub const SYNC_TOLERANCE_SECS: i64 = 60;

/// How the best candidate is chosen among all valid ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Latest maximum constituent timestamp wins; ties by tightest
    /// spread, then by largest (home, draw, away) timestamp tuple
    LatestSync,
    /// Tightest spread wins; ties by latest maximum constituent
    /// timestamp, then by largest (home, draw, away) timestamp tuple
    TightestSync,
}

/// Stateless triad search over one match's windowed series
pub struct TriadSelector {
    tolerance: Duration,
    policy: SelectionPolicy,
}

impl TriadSelector {
    pub fn new(tolerance: Duration, policy: SelectionPolicy) -> Self {
        Self { tolerance, policy }
    }

    /// Selector with the 60s tolerance and latest-sync policy
    pub fn with_defaults() -> Self {
        Self::new(
            Duration::seconds(SYNC_TOLERANCE_SECS),
            SelectionPolicy::LatestSync,
        )
    }

    /// Select the best valid triad, or `None` when no three samples are
    /// mutually within the tolerance. An empty series for any role
    /// yields `None`.
    pub fn select(&self, series: &WindowedSeries) -> Option<Triad> {
        let mut best: Option<Triad> = None;
        for (role, sample) in MergedDescending::new(series) {
            let Some(candidate) = self.candidate_for(role, sample, series) else {
                continue;
            };
            best = match best {
                Some(current) if !self.beats(&candidate, &current) => Some(current),
                _ => Some(candidate),
            };
        }
        best
    }

    /// All distinct valid candidates, ascending by latest constituent
    /// timestamp. Used for diagnostics and inspection.
    pub fn candidates(&self, series: &WindowedSeries) -> Vec<Triad> {
        let mut found: Vec<Triad> = Vec::new();
        for (role, sample) in MergedDescending::new(series) {
            if let Some(candidate) = self.candidate_for(role, sample, series) {
                if !found.iter().any(|t| t.timestamp_key() == candidate.timestamp_key()) {
                    found.push(candidate);
                }
            }
        }
        found.sort_by_key(|t| (t.latest_timestamp(), t.timestamp_key()));
        found
    }

    /// Assemble the candidate anchored at `reference`, if one exists
    fn candidate_for(
        &self,
        reference_role: OutcomeRole,
        reference: &Sample,
        series: &WindowedSeries,
    ) -> Option<Triad> {
        let mut legs: [Option<Sample>; 3] = [None, None, None];
        legs[reference_role.index()] = Some(reference.clone());

        for role in OutcomeRole::ALL {
            if role == reference_role {
                continue;
            }
            let nearest =
                nearest_within(series.role(role), reference.timestamp, self.tolerance)?;
            legs[role.index()] = Some(nearest);
        }

        let [home, draw, away] = legs;
        let triad = Triad {
            home: home?,
            draw: draw?,
            away: away?,
        };
        // two nearest neighbors on opposite sides of the reference can
        // each be in tolerance while the whole candidate is not
        (triad.spread() <= self.tolerance).then_some(triad)
    }

    /// Whether `challenger` strictly beats `incumbent` under the policy
    fn beats(&self, challenger: &Triad, incumbent: &Triad) -> bool {
        let by_latest = challenger
            .latest_timestamp()
            .cmp(&incumbent.latest_timestamp());
        // reversed so the tighter spread compares greater
        let by_spread = incumbent.spread().cmp(&challenger.spread());
        let by_key = challenger.timestamp_key().cmp(&incumbent.timestamp_key());

        let ordering = match self.policy {
            SelectionPolicy::LatestSync => by_latest.then(by_spread).then(by_key),
            SelectionPolicy::TightestSync => by_spread.then(by_latest).then(by_key),
        };
        ordering == std::cmp::Ordering::Greater
    }
}

/// Nearest sample to `at` within `tolerance`, preferring the later of two
/// equidistant samples. The input is ascending with distinct timestamps.
fn nearest_within(samples: &[Sample], at: DateTime<Utc>, tolerance: Duration) -> Option<Sample> {
    let idx = samples.partition_point(|s| s.timestamp <= at);
    let below = idx.checked_sub(1).and_then(|i| samples.get(i));
    let above = samples.get(idx);

    let pick = match (below, above) {
        (None, None) => return None,
        (Some(b), None) => b,
        (None, Some(a)) => a,
        (Some(b), Some(a)) => {
            let below_distance = at - b.timestamp;
            let above_distance = a.timestamp - at;
            if below_distance < above_distance {
                b
            } else {
                a
            }
        }
    };

    let distance = (pick.timestamp - at).abs();
    (distance <= tolerance).then(|| pick.clone())
}

/// Iterates the three role series merged by timestamp, latest first.
/// Equal timestamps yield in role priority order (Home, Draw, Away).
struct MergedDescending<'a> {
    lanes: [&'a [Sample]; 3],
}

impl<'a> MergedDescending<'a> {
    fn new(series: &'a WindowedSeries) -> Self {
        Self {
            lanes: [
                series.role(OutcomeRole::Home),
                series.role(OutcomeRole::Draw),
                series.role(OutcomeRole::Away),
            ],
        }
    }
}

impl<'a> Iterator for MergedDescending<'a> {
    type Item = (OutcomeRole, &'a Sample);

    fn next(&mut self) -> Option<Self::Item> {
        let mut pick: Option<(usize, DateTime<Utc>)> = None;
        for (i, lane) in self.lanes.iter().enumerate() {
            if let Some(last) = lane.last() {
                let later = match pick {
                    None => true,
                    Some((_, ts)) => last.timestamp > ts,
                };
                if later {
                    pick = Some((i, last.timestamp));
                }
            }
        }

        let (i, _) = pick?;
        let lane = self.lanes[i];
        let sample = &lane[lane.len() - 1];
        self.lanes[i] = &lane[..lane.len() - 1];
        Some((OutcomeRole::ALL[i], sample))
    }
}
