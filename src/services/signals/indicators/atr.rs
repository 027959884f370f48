//! Average True Range (ATR) indicator.

use super::sma::sma;
use crate::services::signals::Indicator;
use crate::types::PriceBar;

/// ATR (Average True Range) indicator.
///
/// Simple average of the trailing true ranges:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
///
/// Higher ATR = higher volatility.
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate True Range.
    pub fn true_range(current: &PriceBar, previous: &PriceBar) -> f64 {
        let hl = current.high - current.low;
        let hc = (current.high - previous.close).abs();
        let lc = (current.low - previous.close).abs();
        hl.max(hc).max(lc)
    }
}

impl Indicator for Atr {
    type Output = f64;

    fn id(&self) -> &str {
        "atr"
    }

    fn name(&self) -> &str {
        "ATR (14)"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, bars: &[PriceBar]) -> f64 {
        if bars.len() < 2 {
            return 0.0;
        }

        let true_ranges: Vec<f64> = bars
            .windows(2)
            .map(|pair| Self::true_range(&pair[1], &pair[0]))
            .collect();

        sma(&true_ranges, self.period)
    }
}
