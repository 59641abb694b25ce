//! Run orchestration
//!
//! Discovers market files and drives the per-match pipeline across them.
//! Matches are independent, so files are parsed and processed on blocking
//! worker tasks with bounded concurrency; results are consumed in input
//! order so the report is deterministic.

use futures_util::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::feed::{discover_market_files, read_market_file, FeedError};
use crate::report::{CsvReportSink, DiagnosticsWriter, ReportSink};
use crate::telemetry::{add, increment, CounterMetric};

use super::pipeline::{process_match, ExtractSettings, MatchReport};
use super::stats::RunStats;

const PROGRESS_EVERY: usize = 100;

/// Outcome of one file's worker task
enum FileOutcome {
    Match(Box<MatchReport>),
    /// No football 1X2 market in the file
    Skipped,
    /// Market did not resolve to a three-way mapping
    Malformed(String),
    Failed(FeedError),
}

/// Whole-run extraction driver
pub struct Extractor {
    config: Config,
}

impl Extractor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> anyhow::Result<RunStats> {
        let mut stats = RunStats::default();

        let files = discover_market_files(&self.config.input.dir)?;
        stats.files_found = files.len();
        add(CounterMetric::FilesDiscovered, files.len() as u64);
        tracing::info!(
            files = files.len(),
            input = %self.config.input.dir.display(),
            time_from_min = self.config.window.time_from_min,
            time_to_min = self.config.window.time_to_min,
            "starting extraction"
        );

        let settings = Arc::new(ExtractSettings::from_config(&self.config));
        let mut sink = CsvReportSink::create(
            &self.config.report.output_dir,
            self.config.window.time_from_min,
            self.config.window.time_to_min,
        )?;
        let diagnostics = self.config.report.debug_artifacts.then(|| {
            DiagnosticsWriter::new(
                &self.config.input.dir,
                &self.config.report.output_dir,
                self.config.window.time_from_min,
                self.config.window.time_to_min,
            )
        });

        let parallelism = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        let total = files.len();

        let mut outcomes = stream::iter(files)
            .map(|path| {
                let settings = Arc::clone(&settings);
                tokio::task::spawn_blocking(move || (process_file(&path, &settings), path))
            })
            .buffered(parallelism);

        let mut seen = 0usize;
        while let Some(joined) = outcomes.next().await {
            let (outcome, path) = joined?;
            seen += 1;
            if seen % PROGRESS_EVERY == 0 {
                tracing::info!(processed = seen, total, "progress");
            }

            match outcome {
                FileOutcome::Match(report) => {
                    self.consume_match(&mut stats, &mut sink, diagnostics.as_ref(), *report)?;
                }
                FileOutcome::Skipped => {
                    stats.skipped_files += 1;
                }
                FileOutcome::Malformed(market_id) => {
                    stats.malformed_markets += 1;
                    increment(CounterMetric::MalformedMarkets);
                    tracing::warn!(market_id = %market_id, "malformed market skipped");
                }
                FileOutcome::Failed(error) => {
                    stats.read_errors += 1;
                    increment(CounterMetric::ReadErrors);
                    tracing::error!(path = %path.display(), error = %error, "file failed");
                }
            }
        }

        sink.finish()?;
        stats.log_summary();
        Ok(stats)
    }

    fn consume_match(
        &self,
        stats: &mut RunStats,
        sink: &mut CsvReportSink,
        diagnostics: Option<&DiagnosticsWriter>,
        report: MatchReport,
    ) -> anyhow::Result<()> {
        stats.matches_processed += 1;
        increment(CounterMetric::MatchesProcessed);

        if report.summary.kickoff_corrected {
            stats.kickoff_corrected += 1;
            increment(CounterMetric::KickoffCorrections);
        }
        match &report.summary.selection {
            Some(selection) if selection.method == crate::triad::SelectionMethod::Exact => {
                stats.exact_triads += 1;
                increment(CounterMetric::ExactTriads);
            }
            Some(_) => {
                stats.relaxed_triads += 1;
                increment(CounterMetric::RelaxedTriads);
            }
            None => {
                stats.without_triads += 1;
                increment(CounterMetric::NoTriad);
            }
        }

        sink.record(&report.summary)?;
        if let (Some(writer), Some(diag)) = (diagnostics, &report.diagnostics) {
            writer.write(&report.source, diag)?;
        }
        Ok(())
    }
}

fn process_file(path: &Path, settings: &ExtractSettings) -> FileOutcome {
    let raw = match read_market_file(path) {
        Ok(Some(raw)) => raw,
        Ok(None) => return FileOutcome::Skipped,
        Err(error) => return FileOutcome::Failed(error),
    };
    match process_match(&raw, settings) {
        Ok(report) => FileOutcome::Match(Box::new(report)),
        Err(_) => FileOutcome::Malformed(raw.market_id),
    }
}
