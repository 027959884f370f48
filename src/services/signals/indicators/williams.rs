//! Williams %R indicator.

use crate::services::signals::{high_low_range, trailing, Indicator};
use crate::types::PriceBar;

pub const NEUTRAL_WILLIAMS_R: f64 = -50.0;

/// Williams %R.
///
/// %R = (Highest High - Close) / (Highest High - Lowest Low) * -100
///
/// Ranges from -100 (close at the low) to 0 (close at the high).
pub struct WilliamsR {
    period: usize,
}

impl Default for WilliamsR {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl WilliamsR {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for WilliamsR {
    type Output = f64;

    fn id(&self) -> &str {
        "williams_r"
    }

    fn name(&self) -> &str {
        "Williams %R"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[PriceBar]) -> f64 {
        let Some(last) = bars.last() else {
            return NEUTRAL_WILLIAMS_R;
        };
        if self.period == 0 || bars.len() < self.period {
            return NEUTRAL_WILLIAMS_R;
        }

        let (highest_high, lowest_low) = high_low_range(trailing(bars, self.period));
        if highest_high == lowest_low {
            return NEUTRAL_WILLIAMS_R;
        }

        ((highest_high - last.close) / (highest_high - lowest_low) * -100.0).clamp(-100.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_bars;

    #[test]
    fn test_williams_insufficient_data() {
        assert_eq!(WilliamsR::default().calculate(&test_bars::uptrend(5)), -50.0);
        assert_eq!(WilliamsR::default().calculate(&[]), -50.0);
    }

    #[test]
    fn test_williams_close_at_high() {
        let mut bars = test_bars::uptrend(20);
        let last = bars.last_mut().unwrap();
        last.high = last.close;
        assert_eq!(WilliamsR::default().calculate(&bars), 0.0);
    }

    #[test]
    fn test_williams_downtrend_near_bottom() {
        let value = WilliamsR::default().calculate(&test_bars::downtrend(20));
        assert!(value < -50.0, "got {}", value);
    }

    #[test]
    fn test_williams_value_range() {
        for bars in [test_bars::uptrend(30), test_bars::downtrend(30), test_bars::choppy(30)] {
            let value = WilliamsR::default().calculate(&bars);
            assert!((-100.0..=0.0).contains(&value));
        }
    }
}
