//! Inspect command implementation
//!
//! Runs the pipeline over a single market file with diagnostics on and
//! prints what the extractor saw: resolved roles, kick-off resolution,
//! candidate triads, and the selection.

use clap::Args;
use std::path::PathBuf;

use crate::config::Config;
use crate::extract::{process_match, ExtractSettings};
use crate::feed::read_market_file;
use crate::market::OutcomeRole;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Market file to inspect
    pub file: PathBuf,
}

impl InspectArgs {
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        config.normalize_windows();
        config.report.debug_artifacts = true;
        let settings = ExtractSettings::from_config(&config);

        let Some(raw) = read_market_file(&self.file)? else {
            println!("{}: no football 1X2 market found", self.file.display());
            return Ok(());
        };

        println!("Market: {}", raw.market_id);
        if let Some(event_name) = &raw.definition.event_name {
            println!("Event:  {event_name}");
        }
        println!("Ticks:  {}", raw.ticks.len());

        let report = match process_match(&raw, &settings) {
            Ok(report) => report,
            Err(error) => {
                println!("Skipped: {error}");
                return Ok(());
            }
        };

        let summary = &report.summary;
        match (summary.kickoff, summary.scheduled) {
            (Some(kickoff), Some(scheduled)) if summary.kickoff_corrected => {
                println!(
                    "Kick-off: {} (corrected from {})",
                    kickoff.format("%Y-%m-%d %H:%M"),
                    scheduled.format("%Y-%m-%d %H:%M")
                );
            }
            (Some(kickoff), _) => {
                println!("Kick-off: {}", kickoff.format("%Y-%m-%d %H:%M"));
            }
            _ => println!("Kick-off: unknown"),
        }

        if let Some(diagnostics) = &report.diagnostics {
            println!(
                "Candidates: {} exact, {} relaxed",
                diagnostics.exact_candidates.len(),
                diagnostics.relaxed_candidates.len()
            );
        }

        match &summary.selection {
            Some(selection) => {
                println!("Selection: {}", selection.method);
                for role in OutcomeRole::ALL {
                    let leg = selection.triad.leg(role);
                    println!(
                        "  {:<5} {} @ {}",
                        role,
                        leg.price,
                        leg.timestamp.format("%H:%M:%S%.3f")
                    );
                }
            }
            None => println!("Selection: none"),
        }

        Ok(())
    }
}
