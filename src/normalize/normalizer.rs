//! Tick normalizer
//!
//! Pure transformation of raw ticks into windowed per-outcome series.
//! Input may be unordered and may carry corrections: a later-supplied
//! update for the same (role, timestamp) pair replaces the earlier one.
//! Ticks whose selection is not part of the role mapping are dropped
//! silently.

use crate::feed::Tick;
use crate::market::RoleMapping;

use super::types::{Sample, Window, WindowedSeries};

/// Normalizes one match's raw ticks against its role mapping and window
pub struct TickNormalizer<'a> {
    mapping: &'a RoleMapping,
    window: Window,
}

impl<'a> TickNormalizer<'a> {
    pub fn new(mapping: &'a RoleMapping, window: Window) -> Self {
        Self { mapping, window }
    }

    /// Produce the windowed per-outcome series
    pub fn normalize<'t>(&self, ticks: impl IntoIterator<Item = &'t Tick>) -> WindowedSeries {
        let mut lanes: [Vec<Sample>; 3] = [Vec::new(), Vec::new(), Vec::new()];

        for tick in ticks {
            let Some(role) = self.mapping.role_of(tick.selection_id) else {
                continue;
            };
            if !self.window.contains(tick.at) {
                continue;
            }
            lanes[role.index()].push(Sample {
                timestamp: tick.at,
                price: tick.price,
            });
        }

        for lane in &mut lanes {
            // stable sort keeps arrival order within equal timestamps, so
            // overwriting below implements last-write-wins
            lane.sort_by_key(|s| s.timestamp);
            let mut deduped: Vec<Sample> = Vec::with_capacity(lane.len());
            for sample in lane.drain(..) {
                match deduped.last_mut() {
                    Some(last) if last.timestamp == sample.timestamp => *last = sample,
                    _ => deduped.push(sample),
                }
            }
            *lane = deduped;
        }

        let [home, draw, away] = lanes;
        WindowedSeries::from_parts(home, draw, away)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::OutcomeRole;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn at(min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 5, 9, 14, min, sec).unwrap()
    }

    fn tick(selection_id: u64, when: DateTime<Utc>, price: Decimal) -> Tick {
        Tick {
            selection_id,
            at: when,
            price,
        }
    }

    fn mapping() -> RoleMapping {
        RoleMapping::new(101, 102, 103).unwrap()
    }

    fn window() -> Window {
        Window {
            start: at(55, 0),
            end: at(59, 59),
        }
    }

    #[test]
    fn test_windowing_inclusive_bounds() {
        let mapping = mapping();
        let normalizer = TickNormalizer::new(&mapping, window());
        let ticks = vec![
            tick(101, at(54, 59), dec!(2.0)), // just before the window
            tick(101, at(55, 0), dec!(2.1)),  // exactly on the start bound
            tick(101, at(57, 30), dec!(2.2)),
            tick(101, at(59, 59), dec!(2.3)), // exactly on the end bound
        ];

        let series = normalizer.normalize(&ticks);
        let home = series.role(OutcomeRole::Home);
        assert_eq!(home.len(), 3);
        assert_eq!(home[0].timestamp, at(55, 0));
        assert_eq!(home[2].timestamp, at(59, 59));
    }

    #[test]
    fn test_unordered_input_sorted() {
        let mapping = mapping();
        let normalizer = TickNormalizer::new(&mapping, window());
        let ticks = vec![
            tick(102, at(58, 0), dec!(3.5)),
            tick(102, at(56, 0), dec!(3.4)),
            tick(102, at(57, 0), dec!(3.45)),
        ];

        let series = normalizer.normalize(&ticks);
        let draw = series.role(OutcomeRole::Draw);
        let timestamps: Vec<_> = draw.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![at(56, 0), at(57, 0), at(58, 0)]);
    }

    #[test]
    fn test_last_write_wins_per_timestamp() {
        let mapping = mapping();
        let normalizer = TickNormalizer::new(&mapping, window());
        let ticks = vec![
            tick(101, at(57, 0), dec!(2.5)),
            tick(101, at(58, 0), dec!(2.6)),
            // correction for 57:00 arrives later and must replace 2.5
            tick(101, at(57, 0), dec!(2.55)),
        ];

        let series = normalizer.normalize(&ticks);
        let home = series.role(OutcomeRole::Home);
        assert_eq!(home.len(), 2);
        assert_eq!(home[0].price, dec!(2.55));
        assert_eq!(home[1].price, dec!(2.6));
    }

    #[test]
    fn test_unmapped_selection_dropped() {
        let mapping = mapping();
        let normalizer = TickNormalizer::new(&mapping, window());
        let ticks = vec![
            tick(101, at(57, 0), dec!(2.5)),
            tick(999, at(57, 0), dec!(1.5)), // not part of the 1X2 market
        ];

        let series = normalizer.normalize(&ticks);
        assert_eq!(series.len(), 1);
        assert_eq!(series.role(OutcomeRole::Home).len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let mapping = mapping();
        let normalizer = TickNormalizer::new(&mapping, window());
        let ticks: Vec<Tick> = Vec::new();
        let series = normalizer.normalize(&ticks);
        assert!(series.is_empty());
        assert!(!series.has_all_roles());
    }
}
