//! Exponential Moving Average (EMA) indicator.

use crate::services::signals::Indicator;
use crate::types::{closes, PriceBar};

/// Full EMA recurrence seeded with the first value.
///
/// `ema_0 = v_0`, `ema_i = v_i * a + ema_{i-1} * (1 - a)`, `a = 2 / (period + 1)`.
/// Early values lean toward the first observation; discard a warm-up prefix
/// if a textbook SMA-seeded EMA is needed.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return out;
    };

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut ema = first;
    out.push(ema);
    for value in &values[1..] {
        ema = value * multiplier + ema * (1.0 - multiplier);
        out.push(ema);
    }
    out
}

/// Latest EMA value.
///
/// Empty input yields 0; input shorter than `period` yields its last value.
pub fn ema(values: &[f64], period: usize) -> f64 {
    match values.last() {
        None => 0.0,
        Some(&last) if values.len() < period => last,
        Some(_) => ema_series(values, period).last().copied().unwrap_or(0.0),
    }
}

/// EMA of closing prices.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn id(&self) -> &str {
        match self.period {
            12 => "ema12",
            26 => "ema26",
            _ => "ema",
        }
    }

    fn name(&self) -> &str {
        match self.period {
            12 => "EMA (12)",
            26 => "EMA (26)",
            _ => "EMA",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[PriceBar]) -> f64 {
        ema(&closes(bars), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_bars;

    #[test]
    fn test_ema_seeded_with_first_value() {
        let series = ema_series(&[10.0, 20.0], 3);
        // a = 0.5
        assert_eq!(series, vec![10.0, 15.0]);
    }

    #[test]
    fn test_ema_empty_is_zero() {
        assert_eq!(ema(&[], 12), 0.0);
    }

    #[test]
    fn test_ema_short_input_returns_last() {
        assert_eq!(ema(&[1.0, 2.0, 3.0], 12), 3.0);
    }

    #[test]
    fn test_ema_constant_series() {
        let values = vec![42.0; 40];
        assert!((ema(&values, 12) - 42.0).abs() < 1e-12);
    }

    #[test]
    fn test_ema_lags_uptrend() {
        let bars = test_bars::uptrend(40);
        let value = Ema::new(12).calculate(&bars);
        let last = bars.last().unwrap().close;
        assert!(value < last);
        assert!(value > bars[0].close);
    }

    #[test]
    fn test_ema_id_and_name() {
        assert_eq!(Ema::new(12).id(), "ema12");
        assert_eq!(Ema::new(26).name(), "EMA (26)");
        assert_eq!(Ema::new(26).min_periods(), 26);
    }
}
