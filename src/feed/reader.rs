//! Market file reader
//!
//! Streams one historical NL-JSON file and accumulates everything the
//! extraction pipeline needs for a single match: the scheduled market
//! time from the first football MATCH_ODDS definition, the final
//! definition (carrying settled runner statuses), every last-traded-price
//! update for that market, and the bookkeeping timestamps used for
//! kick-off correction.

use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::types::{FeedError, MarketDefinition, StreamMessage, Tick};

/// Everything read from one market file
#[derive(Debug, Clone)]
pub struct RawMatch {
    pub market_id: String,
    /// Last seen definition; runner statuses reflect settlement
    pub definition: MarketDefinition,
    /// Scheduled market time from the first definition
    pub scheduled: Option<DateTime<Utc>>,
    /// Price updates in file order, unfiltered
    pub ticks: Vec<Tick>,
    /// Last price update outside suspension/closure frames
    pub last_price_at: Option<DateTime<Utc>>,
    /// Absolute last frame timestamp for this market
    pub last_tick_at: Option<DateTime<Utc>>,
    pub source: PathBuf,
}

/// Read one market file.
///
/// Returns `Ok(None)` when the file holds no football 1X2 market.
/// Individual lines that fail to parse are skipped.
pub fn read_market_file(path: &Path) -> Result<Option<RawMatch>, FeedError> {
    let file = File::open(path).map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut market_id: Option<String> = None;
    let mut definition: Option<MarketDefinition> = None;
    let mut scheduled: Option<DateTime<Utc>> = None;
    let mut ticks: Vec<Tick> = Vec::new();
    let mut last_price_at: Option<DateTime<Utc>> = None;
    let mut last_tick_at: Option<DateTime<Utc>> = None;

    for line in reader.lines() {
        let line = line.map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(msg) = serde_json::from_str::<StreamMessage>(line) else {
            continue;
        };
        if msg.op != "mcm" {
            continue;
        }

        for change in &msg.mc {
            let tracked = market_id.as_deref() == Some(change.id.as_str());

            if tracked {
                if let Some(pt) = msg.pt {
                    if last_tick_at.map_or(true, |t| pt > t) {
                        last_tick_at = Some(pt);
                    }
                }
            }

            if let Some(md) = &change.market_definition {
                if md.is_football_match_odds() {
                    if scheduled.is_none() {
                        scheduled = md.scheduled_time();
                    }
                    market_id = Some(change.id.clone());
                    definition = Some(md.clone());
                }
            }

            if !change.rc.is_empty() && market_id.as_deref() == Some(change.id.as_str()) {
                let Some(pt) = msg.pt else { continue };
                let mut has_price_update = false;
                for runner in &change.rc {
                    if let Some(ltp) = runner.ltp {
                        ticks.push(Tick {
                            selection_id: runner.id,
                            at: pt,
                            price: ltp,
                        });
                        has_price_update = true;
                    }
                }

                // quotes carried on suspension/closure frames are not
                // in-play trade evidence for kick-off correction
                let suspended = change
                    .market_definition
                    .as_ref()
                    .is_some_and(|md| md.is_suspended_or_closed());
                if has_price_update && !suspended && last_price_at.map_or(true, |t| pt > t) {
                    last_price_at = Some(pt);
                }
            }
        }
    }

    let (Some(market_id), Some(definition)) = (market_id, definition) else {
        return Ok(None);
    };

    Ok(Some(RawMatch {
        market_id,
        definition,
        scheduled,
        ticks,
        last_price_at,
        last_tick_at,
        source: path.to_path_buf(),
    }))
}
