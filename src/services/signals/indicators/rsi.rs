//! Relative Strength Index (RSI) indicator.

use crate::services::signals::{clamp_percent, Indicator};
use crate::types::{closes, PriceBar};

/// Value returned when there are not enough deltas.
pub const NEUTRAL_RSI: f64 = 50.0;

/// RSI (Relative Strength Index) indicator.
///
/// Averages gains and losses over the trailing `period` deltas only (simple
/// averages, no Wilder smoothing across the whole history):
/// RSI = 100 - 100 / (1 + avgGain / avgLoss)
///
/// - Below 30: Oversold (potential buy signal)
/// - Above 70: Overbought (potential sell signal)
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// RSI of a close series. Falls back to 50 with fewer than `period + 1` closes.
    pub fn calculate_rsi(closes: &[f64], period: usize) -> f64 {
        if period == 0 || closes.len() < period + 1 {
            return NEUTRAL_RSI;
        }

        let window = &closes[closes.len() - period - 1..];
        let (gain_sum, loss_sum) = window
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .fold((0.0, 0.0), |(g, l), change| {
                if change > 0.0 {
                    (g + change, l)
                } else {
                    (g, l - change)
                }
            });

        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;

        if avg_loss == 0.0 {
            return 100.0;
        }

        let rs = avg_gain / avg_loss;
        clamp_percent(100.0 - (100.0 / (1.0 + rs)))
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn id(&self) -> &str {
        "rsi"
    }

    fn name(&self) -> &str {
        "RSI (14)"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, bars: &[PriceBar]) -> f64 {
        Self::calculate_rsi(&closes(bars), self.period)
    }
}
