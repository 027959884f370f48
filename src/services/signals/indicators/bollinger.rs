//! Bollinger Bands indicator.

use super::sma::sma;
use crate::services::signals::Indicator;
use crate::types::{closes, BollingerValue, PriceBar};

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
///
/// StdDev is the population standard deviation of the trailing window.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }

    /// Population standard deviation.
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    }
}

impl Indicator for BollingerBands {
    type Output = BollingerValue;

    fn id(&self) -> &str {
        "bollinger"
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[PriceBar]) -> BollingerValue {
        let closes = closes(bars);
        let window = &closes[closes.len().saturating_sub(self.period)..];

        // A short series degrades the middle band to the last close, like SMA does.
        let middle = sma(&closes, self.period);
        let width = self.std_dev_multiplier * Self::std_dev(window, middle);

        BollingerValue {
            upper: middle + width,
            middle,
            lower: middle - width,
        }
    }
}
