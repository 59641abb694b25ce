//! Tick source module
//!
//! Reads Betfair historical NL-JSON market files and produces the raw
//! per-selection price-update stream for football 1X2 markets.

mod discover;
mod reader;
mod types;

pub use discover::discover_market_files;
pub use reader::{read_market_file, RawMatch};
pub use types::{
    FeedError, MarketChange, MarketDefinition, RunnerChange, RunnerDefinition, StreamMessage, Tick,
};
