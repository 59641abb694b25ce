//! CSV report sink
//!
//! Writes the run's two result files: `result_{from}_{to}.csv` with one
//! row per match, and `result_{from}_{to}_extended.csv` adding the
//! timing columns used to audit kick-off corrections.

use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::market::OutcomeRole;

use super::types::{MatchSummary, ReportError};
use super::ReportSink;

const SIMPLE_HEADER: [&str; 15] = [
    "MarketId",
    "Div",
    "DateTime",
    "HomeTeam",
    "AwayTeam",
    "Home result",
    "Away result",
    "Draw result",
    "Home odd HT",
    "Away odd HT",
    "Draw odd HT",
    "ht_selection_method",
    "KickOff_2_30_lastodd",
    "KickOff_2_30_lasttick",
    "total_ltp_updates",
];

const EXTENDED_HEADER: [&str; 19] = [
    "MarketId",
    "Div",
    "correctedDateTime",
    "definitionDateTime",
    "lastODDDateTime",
    "lastTickDateTime",
    "lastTriadDateTime",
    "KickOff_2_30_lastodd",
    "KickOff_2_30_lasttick",
    "total_ltp_updates",
    "HomeTeam",
    "AwayTeam",
    "Home result",
    "Away result",
    "Draw result",
    "Home odd HT",
    "Away odd HT",
    "Draw odd HT",
    "ht_selection_method",
];

/// Sentinel for a missing triad timestamp in the extended file
const NO_TRIAD_DATETIME: &str = "0000-00-00 00:00";

/// Writes the simple and extended result CSVs
pub struct CsvReportSink {
    simple: BufWriter<File>,
    simple_path: PathBuf,
    extended: BufWriter<File>,
    extended_path: PathBuf,
    rows: usize,
}

impl CsvReportSink {
    /// Create both result files under `output_dir` and write headers
    pub fn create(
        output_dir: &Path,
        time_from_min: i64,
        time_to_min: i64,
    ) -> Result<Self, ReportError> {
        std::fs::create_dir_all(output_dir).map_err(|source| ReportError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let suffix = format!("{time_from_min}_{time_to_min}");
        let simple_path = output_dir.join(format!("result_{suffix}.csv"));
        let extended_path = output_dir.join(format!("result_{suffix}_extended.csv"));

        let mut sink = Self {
            simple: open(&simple_path)?,
            simple_path: simple_path.clone(),
            extended: open(&extended_path)?,
            extended_path: extended_path.clone(),
            rows: 0,
        };
        sink.write_simple(&SIMPLE_HEADER.map(String::from))?;
        sink.write_extended(&EXTENDED_HEADER.map(String::from))?;
        Ok(sink)
    }

    pub fn simple_path(&self) -> &Path {
        &self.simple_path
    }

    pub fn extended_path(&self) -> &Path {
        &self.extended_path
    }

    fn write_simple(&mut self, fields: &[String]) -> Result<(), ReportError> {
        write_row(&mut self.simple, &self.simple_path, fields)
    }

    fn write_extended(&mut self, fields: &[String]) -> Result<(), ReportError> {
        write_row(&mut self.extended, &self.extended_path, fields)
    }
}

impl ReportSink for CsvReportSink {
    fn record(&mut self, summary: &MatchSummary) -> Result<(), ReportError> {
        let odds = |role: OutcomeRole| {
            summary
                .odds(role)
                .map(|d| d.to_string())
                .unwrap_or_default()
        };
        let flag = |long: bool| if long { "Y" } else { "N" }.to_string();

        let simple = vec![
            summary.market_id.clone(),
            summary.country_code.clone().unwrap_or_default(),
            format_minute(summary.kickoff),
            summary.home_team.clone(),
            summary.away_team.clone(),
            summary.results.home.as_str().to_string(),
            summary.results.away.as_str().to_string(),
            summary.results.draw.as_str().to_string(),
            odds(OutcomeRole::Home),
            odds(OutcomeRole::Away),
            odds(OutcomeRole::Draw),
            summary.method_label().to_string(),
            flag(summary.long_run_by_last_price()),
            flag(summary.long_run_by_last_tick()),
            summary.total_ticks.to_string(),
        ];
        self.write_simple(&simple)?;

        let extended = vec![
            summary.market_id.clone(),
            summary.country_code.clone().unwrap_or_default(),
            format_minute(summary.kickoff),
            format_minute(summary.scheduled),
            format_minute(summary.last_price_at),
            format_minute(summary.last_tick_at),
            summary
                .triad_time()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| NO_TRIAD_DATETIME.to_string()),
            flag(summary.long_run_by_last_price()),
            flag(summary.long_run_by_last_tick()),
            summary.total_ticks.to_string(),
            summary.home_team.clone(),
            summary.away_team.clone(),
            summary.results.home.as_str().to_string(),
            summary.results.away.as_str().to_string(),
            summary.results.draw.as_str().to_string(),
            odds(OutcomeRole::Home),
            odds(OutcomeRole::Away),
            odds(OutcomeRole::Draw),
            summary.method_label().to_string(),
        ];
        self.write_extended(&extended)?;

        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ReportError> {
        self.simple.flush().map_err(|source| ReportError::Io {
            path: self.simple_path.clone(),
            source,
        })?;
        self.extended.flush().map_err(|source| ReportError::Io {
            path: self.extended_path.clone(),
            source,
        })?;
        tracing::info!(
            rows = self.rows,
            simple = %self.simple_path.display(),
            extended = %self.extended_path.display(),
            "result files written"
        );
        Ok(())
    }
}

fn open(path: &Path) -> Result<BufWriter<File>, ReportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn write_row(
    writer: &mut BufWriter<File>,
    path: &Path,
    fields: &[String],
) -> Result<(), ReportError> {
    let line = fields
        .iter()
        .map(|f| escape(f))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{line}").map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Quote a field when it contains a comma, quote, or newline
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn format_minute(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
