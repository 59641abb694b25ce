//! Tick normalization module
//!
//! Converts the raw per-selection price-update stream into three ordered
//! per-outcome sample series restricted to a kick-off-relative window.

mod normalizer;
mod types;

pub use normalizer::TickNormalizer;
pub use types::{Sample, Window, WindowedSeries};
