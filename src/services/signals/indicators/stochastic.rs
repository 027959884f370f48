//! Stochastic Oscillator indicator.

use crate::services::signals::{clamp_percent, high_low_range, Indicator};
use crate::types::{PriceBar, StochasticValue};

/// Stochastic Oscillator.
///
/// Compares closing price to price range over a period:
/// %K = (Current Close - Lowest Low) / (Highest High - Lowest Low) * 100
/// %D = SMA(3) of %K
///
/// %D falls back to %K when there are not enough bars for the smoothing window.
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
}

impl Default for Stochastic {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
        }
    }
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize) -> Self {
        Self { k_period, d_period }
    }

    /// %K for the bar at `end` (inclusive), using the `k_period` bars ending there.
    fn k_at(&self, bars: &[PriceBar], end: usize) -> f64 {
        let window = &bars[end + 1 - self.k_period..=end];
        let (highest_high, lowest_low) = high_low_range(window);

        if highest_high == lowest_low {
            return 50.0;
        }
        clamp_percent((bars[end].close - lowest_low) / (highest_high - lowest_low) * 100.0)
    }
}

impl Indicator for Stochastic {
    type Output = StochasticValue;

    fn id(&self) -> &str {
        "stochastic"
    }

    fn name(&self) -> &str {
        "Stochastic"
    }

    fn min_periods(&self) -> usize {
        self.k_period + self.d_period - 1
    }

    fn calculate(&self, bars: &[PriceBar]) -> StochasticValue {
        if self.k_period == 0 || bars.len() < self.k_period {
            return StochasticValue { k: 50.0, d: 50.0 };
        }

        let last = bars.len() - 1;
        let k = self.k_at(bars, last);

        if self.d_period == 0 || bars.len() < self.min_periods() {
            return StochasticValue { k, d: k };
        }

        let d = (0..self.d_period)
            .map(|offset| self.k_at(bars, last - offset))
            .sum::<f64>()
            / self.d_period as f64;

        StochasticValue {
            k,
            d: clamp_percent(d),
        }
    }
}
