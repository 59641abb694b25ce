//! Effective kick-off resolution
//!
//! Betfair's scheduled market time is occasionally wrong (delayed
//! kick-offs, re-listed markets). The true kick-off is estimated by
//! walking back 1h30 from the last in-play price update and snapping
//! down to the scheduled minute pattern. When the estimate disagrees
//! with the schedule by more than the matching tolerance, the estimate
//! replaces the scheduled time.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::Serialize;

/// Regulation time plus half-time interval
const PLAY_DURATION_MIN: i64 = 90;

/// Maximum schedule/estimate divergence still treated as agreement
const SCHEDULE_MATCH_TOLERANCE_SECS: i64 = 36;

/// Resolved kick-off for one match
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KickoffResolution {
    /// Kick-off instant used for triad search
    pub kickoff: DateTime<Utc>,
    /// Scheduled market time from the first market definition
    pub scheduled: DateTime<Utc>,
    /// True when the estimate replaced the scheduled time
    pub corrected: bool,
    /// Minute-of-hour pattern of the scheduled time
    pub minute_pattern: u32,
}

/// Resolve the effective kick-off from the scheduled market time and the
/// last observed price/tick timestamps.
pub fn resolve_kickoff(
    scheduled: DateTime<Utc>,
    last_price_at: Option<DateTime<Utc>>,
    last_tick_at: Option<DateTime<Utc>>,
) -> KickoffResolution {
    let minute_pattern = scheduled.minute();
    let uncorrected = KickoffResolution {
        kickoff: scheduled,
        scheduled,
        corrected: false,
        minute_pattern,
    };

    let Some(last_price) = last_price_at else {
        return uncorrected;
    };
    let Some(primary) = estimate_kickoff(last_price, minute_pattern) else {
        return uncorrected;
    };
    if matches_schedule(primary, scheduled) {
        return uncorrected;
    }

    if let Some(secondary) = last_tick_at.and_then(|t| estimate_kickoff(t, minute_pattern)) {
        if matches_schedule(secondary, scheduled) {
            return uncorrected;
        }
    }

    KickoffResolution {
        kickoff: primary,
        scheduled,
        corrected: true,
        minute_pattern,
    }
}

fn matches_schedule(estimate: DateTime<Utc>, scheduled: DateTime<Utc>) -> bool {
    (estimate - scheduled).num_seconds().abs() <= SCHEDULE_MATCH_TOLERANCE_SECS
}

fn estimate_kickoff(last_update: DateTime<Utc>, minute_pattern: u32) -> Option<DateTime<Utc>> {
    snap_down_to_pattern(
        last_update - Duration::minutes(PLAY_DURATION_MIN),
        minute_pattern,
    )
}

/// Snap down to the most recent occurrence of the given minute-of-hour.
fn snap_down_to_pattern(at: DateTime<Utc>, minute_pattern: u32) -> Option<DateTime<Utc>> {
    let candidate = at
        .with_minute(minute_pattern)?
        .with_second(0)?
        .with_nanosecond(0)?;
    if candidate <= at {
        Some(candidate)
    } else {
        Some(candidate - Duration::hours(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_snap_down_same_hour() {
        // 17:50 with pattern 45 -> 17:45
        let snapped = snap_down_to_pattern(utc(2019, 5, 12, 17, 50, 0), 45).unwrap();
        assert_eq!(snapped, utc(2019, 5, 12, 17, 45, 0));
    }

    #[test]
    fn test_snap_down_previous_hour() {
        // 17:23 with pattern 45 -> 16:45
        let snapped = snap_down_to_pattern(utc(2019, 5, 12, 17, 23, 0), 45).unwrap();
        assert_eq!(snapped, utc(2019, 5, 12, 16, 45, 0));
    }

    #[test]
    fn test_schedule_confirmed_by_last_price() {
        // last price ~1h32 after kick-off: estimate snaps back onto schedule
        let scheduled = utc(2019, 5, 12, 14, 0, 0);
        let last_price = utc(2019, 5, 12, 15, 32, 10);

        let resolution = resolve_kickoff(scheduled, Some(last_price), Some(last_price));
        assert!(!resolution.corrected);
        assert_eq!(resolution.kickoff, scheduled);
        assert_eq!(resolution.minute_pattern, 0);
    }

    #[test]
    fn test_delayed_kickoff_corrected() {
        // prices ran an hour longer than the schedule allows
        let scheduled = utc(2019, 5, 12, 14, 0, 0);
        let last_price = utc(2019, 5, 12, 16, 35, 0);

        let resolution = resolve_kickoff(scheduled, Some(last_price), Some(last_price));
        assert!(resolution.corrected);
        assert_eq!(resolution.kickoff, utc(2019, 5, 12, 15, 0, 0));
        assert_eq!(resolution.scheduled, scheduled);
    }

    #[test]
    fn test_last_tick_rescues_schedule() {
        // last price stops early (thin market) but the file's final tick
        // confirms the schedule
        let scheduled = utc(2019, 5, 12, 14, 0, 0);
        let last_price = utc(2019, 5, 12, 14, 40, 0);
        let last_tick = utc(2019, 5, 12, 15, 31, 0);

        let resolution = resolve_kickoff(scheduled, Some(last_price), Some(last_tick));
        assert!(!resolution.corrected);
        assert_eq!(resolution.kickoff, scheduled);
    }

    #[test]
    fn test_no_price_updates_keeps_schedule() {
        let scheduled = utc(2019, 5, 12, 14, 15, 0);
        let resolution = resolve_kickoff(scheduled, None, None);
        assert!(!resolution.corrected);
        assert_eq!(resolution.kickoff, scheduled);
        assert_eq!(resolution.minute_pattern, 15);
    }

    #[test]
    fn test_off_hour_minute_pattern_preserved() {
        // XX:35 schedule pattern survives the correction
        let scheduled = utc(2019, 5, 12, 14, 35, 0);
        let last_price = utc(2019, 5, 12, 17, 10, 0);

        let resolution = resolve_kickoff(scheduled, Some(last_price), Some(last_price));
        assert!(resolution.corrected);
        assert_eq!(resolution.kickoff, utc(2019, 5, 12, 15, 35, 0));
        assert_eq!(resolution.minute_pattern, 35);
    }
}
