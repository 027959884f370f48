use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Check the OHLC invariants, returning a description of the first violation.
    pub fn violation(&self) -> Option<String> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Some("non-finite price".to_string());
        }
        if prices.iter().any(|p| *p < 0.0) {
            return Some("negative price".to_string());
        }
        if self.high < self.low {
            return Some(format!("high {} below low {}", self.high, self.low));
        }
        if self.high < self.open.max(self.close) {
            return Some(format!(
                "high {} below max(open, close) {}",
                self.high,
                self.open.max(self.close)
            ));
        }
        if self.low > self.open.min(self.close) {
            return Some(format!(
                "low {} above min(open, close) {}",
                self.low,
                self.open.min(self.close)
            ));
        }
        None
    }
}

/// Ordered (oldest first) bars for one symbol.
///
/// The engine only ever borrows this as `&[PriceBar]`.
pub type PriceSeries = Vec<PriceBar>;

/// Extract closing prices from a bar slice.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
