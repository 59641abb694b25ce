//! Betfair historical stream types
//!
//! Serde models for the NL-JSON market change stream. Only the fields
//! this tool consumes are modeled; everything else in a line is ignored.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::de::Deserializer;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Tick source errors
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read market file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single last-traded-price update for one selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub selection_id: u64,
    pub at: DateTime<Utc>,
    pub price: Decimal,
}

/// One line of the market change stream
#[derive(Debug, Clone, Deserialize)]
pub struct StreamMessage {
    pub op: String,
    /// Publish time of the change frame
    #[serde(default, deserialize_with = "opt_timestamp")]
    pub pt: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mc: Vec<MarketChange>,
}

/// A change frame for one market
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketChange {
    #[serde(default)]
    pub id: String,
    pub market_definition: Option<MarketDefinition>,
    #[serde(default)]
    pub rc: Vec<RunnerChange>,
}

/// Market metadata carried inline in the stream
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDefinition {
    /// "1" is football; the raw stream carries this as string or number
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub event_type_id: Option<String>,
    pub market_type: Option<String>,
    pub market_time: Option<String>,
    pub open_date: Option<String>,
    pub event_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub event_id: Option<String>,
    pub country_code: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub runners: Vec<RunnerDefinition>,
}

/// Selection metadata from a market definition
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerDefinition {
    pub id: u64,
    pub name: Option<String>,
    pub status: Option<String>,
    pub sort_priority: Option<u32>,
}

/// A per-selection price change within a frame
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerChange {
    pub id: u64,
    /// Last traded price, absent for size-only changes
    pub ltp: Option<Decimal>,
}

impl MarketDefinition {
    /// Whether this definition describes a football 1X2 market
    pub fn is_football_match_odds(&self) -> bool {
        self.market_type.as_deref() == Some("MATCH_ODDS")
            && self.event_type_id.as_deref() == Some("1")
    }

    /// Whether price frames carried on this definition are in-play quotes
    pub fn is_suspended_or_closed(&self) -> bool {
        matches!(self.status.as_deref(), Some("SUSPENDED") | Some("CLOSED"))
    }

    /// Parse the scheduled market time, falling back to the open date
    pub fn scheduled_time(&self) -> Option<DateTime<Utc>> {
        self.market_time
            .as_deref()
            .or(self.open_date.as_deref())
            .and_then(parse_market_time)
    }
}

/// Parse a Betfair market time such as `2019-05-12T14:00:00.000Z`
pub fn parse_market_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// Publish times are millisecond epochs, but occasionally appear as
/// `YYYY-mm-dd HH:MM:SS[.fff]` strings in re-exported files.
fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(value) = value else {
        return Ok(None);
    };
    let parsed = match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        serde_json::Value::String(s) => NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc()),
        _ => None,
    };
    Ok(parsed)
}
