//! Simple Moving Average (SMA) indicator.

use crate::services::signals::Indicator;
use crate::types::{closes, PriceBar};

/// Mean of the trailing `period` values.
///
/// Degrades to the last value when fewer than `period` are available, and to 0
/// for empty input.
pub fn sma(values: &[f64], period: usize) -> f64 {
    match values.last() {
        None => 0.0,
        Some(&last) if values.len() < period || period == 0 => last,
        Some(_) => values[values.len() - period..].iter().sum::<f64>() / period as f64,
    }
}

/// SMA of closing prices.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn id(&self) -> &str {
        match self.period {
            20 => "sma20",
            50 => "sma50",
            _ => "sma",
        }
    }

    fn name(&self) -> &str {
        match self.period {
            20 => "SMA (20)",
            50 => "SMA (50)",
            _ => "SMA",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[PriceBar]) -> f64 {
        sma(&closes(bars), self.period)
    }
}
