//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::{ema, ema_series};
use crate::services::signals::Indicator;
use crate::types::{closes, MacdValue, PriceBar};

/// MACD indicator.
///
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of the MACD line history
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// Current MACD line value.
    pub fn macd_line(&self, closes: &[f64]) -> f64 {
        ema(closes, self.fast_period) - ema(closes, self.slow_period)
    }

    /// MACD line as it would have been computed after each bar.
    ///
    /// Element `i` equals `macd_line(&closes[..=i])`, so the last element is
    /// the current MACD line.
    pub fn macd_history(&self, closes: &[f64]) -> Vec<f64> {
        let fast = ema_series(closes, self.fast_period);
        let slow = ema_series(closes, self.slow_period);

        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let len = i + 1;
                let f = if len < self.fast_period { close } else { fast[i] };
                let s = if len < self.slow_period { close } else { slow[i] };
                f - s
            })
            .collect()
    }

    /// Signal line over an explicit MACD history (oldest first).
    ///
    /// The newest history element is taken as the MACD line. A single-element
    /// history degenerates to `signal == macd`.
    pub fn from_history(&self, history: &[f64]) -> MacdValue {
        let macd = history.last().copied().unwrap_or(0.0);
        let signal = ema(history, self.signal_period);
        MacdValue::new(macd, signal)
    }
}

impl Indicator for Macd {
    type Output = MacdValue;

    fn id(&self) -> &str {
        "macd"
    }

    fn name(&self) -> &str {
        "MACD"
    }

    fn min_periods(&self) -> usize {
        self.slow_period + self.signal_period
    }

    fn calculate(&self, bars: &[PriceBar]) -> MacdValue {
        self.from_history(&self.macd_history(&closes(bars)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_bars;

    #[test]
    fn test_macd_histogram_identity() {
        for bars in [
            test_bars::uptrend(60),
            test_bars::downtrend(60),
            test_bars::choppy(60),
            test_bars::uptrend(5),
        ] {
            let value = Macd::default().calculate(&bars);
            assert_eq!(value.histogram, value.macd - value.signal);
        }
    }

    #[test]
    fn test_macd_history_matches_line() {
        let macd = Macd::default();
        let closes = closes(&test_bars::choppy(50));
        let history = macd.macd_history(&closes);
        assert_eq!(history.len(), closes.len());
        for i in [0, 5, 11, 12, 25, 26, 49] {
            let expected = macd.macd_line(&closes[..=i]);
            assert!((history[i] - expected).abs() < 1e-9, "index {}", i);
        }
    }

    #[test]
    fn test_macd_uptrend_is_bullish() {
        let value = Macd::default().calculate(&test_bars::uptrend(60));
        assert!(value.macd > 0.0);
        assert!(value.macd > value.signal);
    }

    #[test]
    fn test_macd_downtrend_is_bearish() {
        let value = Macd::default().calculate(&test_bars::downtrend(60));
        assert!(value.macd < 0.0);
        assert!(value.macd < value.signal);
    }

    #[test]
    fn test_macd_single_point_history_degenerates() {
        let value = Macd::default().from_history(&[1.5]);
        assert_eq!(value.macd, 1.5);
        assert_eq!(value.signal, 1.5);
        assert_eq!(value.histogram, 0.0);
    }

    #[test]
    fn test_macd_short_series_is_flat() {
        let value = Macd::default().calculate(&test_bars::uptrend(8));
        assert_eq!(value.macd, 0.0);
        assert_eq!(value.signal, 0.0);
    }

    #[test]
    fn test_macd_min_periods() {
        assert_eq!(Macd::default().min_periods(), 35);
    }
}
