//! Per-match extraction pipeline
//!
//! One pure pass over one match: resolve the role mapping and effective
//! kick-off, run the exact-phase search, fall back to the relaxed phase
//! when the exact window yields nothing, and assemble the summary handed
//! to the report sink.

use chrono::Duration;

use crate::config::Config;
use crate::feed::RawMatch;
use crate::market::{resolve_kickoff, MarketError, OutcomeRole, RoleMapping, Teams};
use crate::normalize::{TickNormalizer, Window, WindowedSeries};
use crate::report::{MatchDiagnostics, MatchResults, MatchSummary, OutcomeResult};
use crate::triad::{SelectionMethod, SelectionPolicy, TriadSelection, TriadSelector};

/// One search phase: a window relative to kick-off plus a tolerance
#[derive(Debug, Clone, Copy)]
pub struct PhaseSettings {
    pub time_from_min: i64,
    pub time_to_min: i64,
    pub tolerance_secs: i64,
}

impl PhaseSettings {
    fn window(&self, kickoff: chrono::DateTime<chrono::Utc>) -> Window {
        Window::from_kickoff(kickoff, self.time_from_min, self.time_to_min)
    }

    fn tolerance(&self) -> Duration {
        Duration::seconds(self.tolerance_secs)
    }
}

/// Extraction settings for both phases
#[derive(Debug, Clone, Copy)]
pub struct ExtractSettings {
    pub exact: PhaseSettings,
    pub relaxed: Option<PhaseSettings>,
    pub with_diagnostics: bool,
}

impl ExtractSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            exact: PhaseSettings {
                time_from_min: config.window.time_from_min,
                time_to_min: config.window.time_to_min,
                tolerance_secs: config.window.tolerance_secs,
            },
            relaxed: config.relaxed.enabled.then_some(PhaseSettings {
                time_from_min: config.relaxed.time_from_min,
                time_to_min: config.relaxed.time_to_min,
                tolerance_secs: config.relaxed.tolerance_secs,
            }),
            with_diagnostics: config.report.debug_artifacts,
        }
    }
}

/// Pipeline output for one match
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub summary: MatchSummary,
    pub diagnostics: Option<MatchDiagnostics>,
    /// Path of the market file this match came from
    pub source: std::path::PathBuf,
}

/// Run the full pipeline over one raw match.
///
/// Fails with `MalformedMarket` when the market does not resolve to a
/// three-way mapping; the caller skips the match for triad analysis.
pub fn process_match(
    raw: &RawMatch,
    settings: &ExtractSettings,
) -> Result<MatchReport, MarketError> {
    let definition = &raw.definition;
    let teams = definition
        .event_name
        .as_deref()
        .and_then(Teams::from_event_name);
    let mapping = RoleMapping::resolve(teams.as_ref(), &definition.runners)?;

    let kickoff = raw
        .scheduled
        .map(|scheduled| resolve_kickoff(scheduled, raw.last_price_at, raw.last_tick_at));
    if kickoff.is_some_and(|k| k.corrected) {
        tracing::debug!(
            market_id = %raw.market_id,
            "kick-off corrected from schedule"
        );
    }

    let mut selection: Option<TriadSelection> = None;
    let mut exact_series: Option<(Window, WindowedSeries)> = None;
    let mut exact_candidates = Vec::new();
    let mut relaxed_candidates = Vec::new();

    if let Some(kickoff) = kickoff {
        let exact_window = settings.exact.window(kickoff.kickoff);
        let normalizer = TickNormalizer::new(&mapping, exact_window);
        let series = normalizer.normalize(&raw.ticks);
        let selector = TriadSelector::new(settings.exact.tolerance(), SelectionPolicy::LatestSync);

        if settings.with_diagnostics {
            exact_candidates = selector.candidates(&series);
        }
        selection = selector.select(&series).map(|triad| TriadSelection {
            method: SelectionMethod::Exact,
            triad,
        });

        if selection.is_none() {
            if let Some(relaxed) = &settings.relaxed {
                let relaxed_window = relaxed.window(kickoff.kickoff);
                let normalizer = TickNormalizer::new(&mapping, relaxed_window);
                let relaxed_series = normalizer.normalize(&raw.ticks);
                let selector =
                    TriadSelector::new(relaxed.tolerance(), SelectionPolicy::TightestSync);

                if settings.with_diagnostics {
                    relaxed_candidates = selector.candidates(&relaxed_series);
                }
                selection = selector.select(&relaxed_series).map(|triad| TriadSelection {
                    method: SelectionMethod::Relaxed,
                    triad,
                });
            }
        }

        exact_series = Some((exact_window, series));
    }

    let results = settled_results(&mapping, definition);
    let (home_team, away_team) = match &teams {
        Some(teams) => (teams.home.clone(), teams.away.clone()),
        None => (
            definition.event_name.clone().unwrap_or_default(),
            String::new(),
        ),
    };

    let summary = MatchSummary {
        market_id: raw.market_id.clone(),
        event_id: definition.event_id.clone(),
        event_name: definition.event_name.clone(),
        country_code: definition.country_code.clone(),
        home_team,
        away_team,
        results,
        kickoff: kickoff.map(|k| k.kickoff),
        scheduled: raw.scheduled,
        kickoff_corrected: kickoff.is_some_and(|k| k.corrected),
        last_price_at: raw.last_price_at,
        last_tick_at: raw.last_tick_at,
        total_ticks: raw.ticks.len(),
        selection: selection.clone(),
    };

    let diagnostics = match (settings.with_diagnostics, exact_series) {
        (true, Some((window, series))) => Some(MatchDiagnostics {
            market_id: raw.market_id.clone(),
            window,
            series,
            exact_candidates,
            relaxed_candidates,
            selection,
        }),
        _ => None,
    };

    Ok(MatchReport {
        summary,
        diagnostics,
        source: raw.source.clone(),
    })
}

fn settled_results(mapping: &RoleMapping, definition: &crate::feed::MarketDefinition) -> MatchResults {
    let mut results = MatchResults {
        home: OutcomeResult::Loser,
        draw: OutcomeResult::Loser,
        away: OutcomeResult::Loser,
    };
    for runner in &definition.runners {
        if runner.status.as_deref() == Some("WINNER") {
            match mapping.role_of(runner.id) {
                Some(OutcomeRole::Home) => results.home = OutcomeResult::Winner,
                Some(OutcomeRole::Draw) => results.draw = OutcomeResult::Winner,
                Some(OutcomeRole::Away) => results.away = OutcomeResult::Winner,
                None => {}
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{MarketDefinition, RunnerDefinition, Tick};
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::path::PathBuf;

    fn kickoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 5, 9, 14, 0, 0).unwrap()
    }

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

    fn runner(id: u64, name: &str, priority: u32, status: &str) -> RunnerDefinition {
        RunnerDefinition {
            id,
            name: Some(name.to_string()),
            status: Some(status.to_string()),
            sort_priority: Some(priority),
        }
    }

    fn raw_match(ticks: Vec<Tick>) -> RawMatch {
        RawMatch {
            market_id: "1.157".to_string(),
            definition: MarketDefinition {
                event_type_id: Some("1".to_string()),
                market_type: Some("MATCH_ODDS".to_string()),
                market_time: Some("2019-05-09T14:00:00.000Z".to_string()),
                open_date: None,
                event_name: Some("Alpha v Beta".to_string()),
                event_id: Some("29000001".to_string()),
                country_code: Some("GB".to_string()),
                status: Some("CLOSED".to_string()),
                runners: vec![
                    runner(101, "Alpha", 1, "WINNER"),
                    runner(102, "The Draw", 2, "LOSER"),
                    runner(103, "Beta", 3, "LOSER"),
                ],
            },
            scheduled: Some(kickoff()),
            ticks,
            // ~1h32 of prices confirms the schedule
            last_price_at: Some(Utc.with_ymd_and_hms(2019, 5, 9, 15, 32, 0).unwrap()),
            last_tick_at: Some(Utc.with_ymd_and_hms(2019, 5, 9, 15, 33, 0).unwrap()),
            source: PathBuf::from("/data/2019/May/1.157"),
        }
    }

    fn settings() -> ExtractSettings {
        ExtractSettings {
            exact: PhaseSettings {
                time_from_min: 55,
                time_to_min: 60,
                tolerance_secs: 60,
            },
            relaxed: Some(PhaseSettings {
                time_from_min: 54,
                time_to_min: 60,
                tolerance_secs: 180,
            }),
            with_diagnostics: false,
        }
    }

    #[test]
    fn test_exact_selection() {
        let raw = raw_match(vec![
            tick(101, at(58, 30), dec!(2.5)),
            tick(102, at(58, 40), dec!(3.4)),
            tick(103, at(58, 50), dec!(3.1)),
            tick(103, at(59, 50), dec!(3.2)),
        ]);

        let report = process_match(&raw, &settings()).unwrap();
        let summary = report.summary;
        assert_eq!(summary.method_label(), "exact");
        assert_eq!(summary.odds(OutcomeRole::Home), Some(dec!(2.5)));
        assert_eq!(summary.odds(OutcomeRole::Draw), Some(dec!(3.4)));
        assert_eq!(summary.odds(OutcomeRole::Away), Some(dec!(3.1)));
        assert_eq!(summary.triad_time(), Some(at(58, 50)));
        assert_eq!(summary.results.home, OutcomeResult::Winner);
        assert!(!summary.kickoff_corrected);
    }

    #[test]
    fn test_relaxed_fallback() {
        // exact window (+55..+60) has home/draw 90s apart: no exact triad;
        // the relaxed 180s tolerance accepts them
        let raw = raw_match(vec![
            tick(101, at(56, 0), dec!(2.5)),
            tick(102, at(57, 30), dec!(3.4)),
            tick(103, at(57, 0), dec!(3.1)),
        ]);

        let report = process_match(&raw, &settings()).unwrap();
        assert_eq!(report.summary.method_label(), "relaxed");
        assert_eq!(report.summary.odds(OutcomeRole::Home), Some(dec!(2.5)));
    }

    #[test]
    fn test_no_triad_still_summarized() {
        let raw = raw_match(vec![tick(101, at(58, 30), dec!(2.5))]);

        let report = process_match(&raw, &settings()).unwrap();
        assert_eq!(report.summary.method_label(), "none");
        assert_eq!(report.summary.odds(OutcomeRole::Home), None);
        assert_eq!(report.summary.total_ticks, 1);
    }

    #[test]
    fn test_relaxed_disabled() {
        let raw = raw_match(vec![
            tick(101, at(56, 0), dec!(2.5)),
            tick(102, at(57, 30), dec!(3.4)),
            tick(103, at(57, 0), dec!(3.1)),
        ]);
        let settings = ExtractSettings {
            relaxed: None,
            ..settings()
        };

        let report = process_match(&raw, &settings).unwrap();
        assert_eq!(report.summary.method_label(), "none");
    }

    #[test]
    fn test_malformed_market_rejected() {
        let mut raw = raw_match(vec![]);
        raw.definition.runners.pop();

        let result = process_match(&raw, &settings());
        assert!(matches!(result, Err(MarketError::MalformedMarket(_))));
    }

    #[test]
    fn test_diagnostics_capture_candidates() {
        let raw = raw_match(vec![
            tick(101, at(58, 30), dec!(2.5)),
            tick(102, at(58, 40), dec!(3.4)),
            tick(103, at(58, 50), dec!(3.1)),
        ]);
        let settings = ExtractSettings {
            with_diagnostics: true,
            ..settings()
        };

        let report = process_match(&raw, &settings).unwrap();
        let diagnostics = report.diagnostics.unwrap();
        assert_eq!(diagnostics.market_id, "1.157");
        assert!(!diagnostics.exact_candidates.is_empty());
        assert!(diagnostics.relaxed_candidates.is_empty());
        assert!(diagnostics.selection.is_some());
        assert_eq!(diagnostics.series.len(), 3);
    }

    #[test]
    fn test_corrected_kickoff_shifts_window() {
        // prices run until 16:35: the match really kicked off at 15:00,
        // so the triad must be searched at 15:55..16:00
        let mut raw = raw_match(vec![
            tick(101, Utc.with_ymd_and_hms(2019, 5, 9, 15, 58, 30).unwrap(), dec!(2.5)),
            tick(102, Utc.with_ymd_and_hms(2019, 5, 9, 15, 58, 40).unwrap(), dec!(3.4)),
            tick(103, Utc.with_ymd_and_hms(2019, 5, 9, 15, 58, 50).unwrap(), dec!(3.1)),
        ]);
        raw.last_price_at = Some(Utc.with_ymd_and_hms(2019, 5, 9, 16, 35, 0).unwrap());
        raw.last_tick_at = Some(Utc.with_ymd_and_hms(2019, 5, 9, 16, 36, 0).unwrap());

        let report = process_match(&raw, &settings()).unwrap();
        let summary = report.summary;
        assert!(summary.kickoff_corrected);
        assert_eq!(
            summary.kickoff,
            Some(Utc.with_ymd_and_hms(2019, 5, 9, 15, 0, 0).unwrap())
        );
        assert_eq!(summary.method_label(), "exact");
    }
}
