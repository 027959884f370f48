//! Trading signals service module.
//!
//! Provides series validation, technical indicator calculations, the
//! majority-vote signal fusion and the analysis report built on top of it.

pub mod analysis;
pub mod engine;
pub mod fusion;
pub mod indicators;
pub mod macd_state;
pub mod scanner;
pub mod validation;

pub use analysis::build_analysis;
pub use engine::IndicatorEngine;
pub use fusion::SignalFusion;
pub use macd_state::{MacdState, MacdStateStore};
pub use scanner::{scan_symbols, SymbolReport, SymbolResult};
pub use validation::{require_len, validate_series};

use crate::types::PriceBar;

/// Trait for implementing technical indicators.
///
/// Indicators never fail on short input: below `min_periods` they return a
/// documented neutral fallback instead.
pub trait Indicator: Send + Sync {
    type Output;

    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Minimum number of bars for a non-degraded value.
    fn min_periods(&self) -> usize;

    /// Calculate the indicator for the latest bar.
    fn calculate(&self, bars: &[PriceBar]) -> Self::Output;
}

/// Clamp a value to the 0-100 oscillator range.
pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Highest high and lowest low of a window.
pub fn high_low_range(window: &[PriceBar]) -> (f64, f64) {
    let highest = window
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    (highest, lowest)
}

/// The trailing `period` bars (or fewer when the series is shorter).
pub fn trailing(bars: &[PriceBar], period: usize) -> &[PriceBar] {
    &bars[bars.len().saturating_sub(period)..]
}
