use serde::{Deserialize, Serialize};

/// MACD line, signal line and histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdValue {
    /// Build from the MACD and signal lines. The histogram is always their difference.
    pub fn new(macd: f64, signal: f64) -> Self {
        Self {
            macd,
            signal,
            histogram: macd - signal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerValue {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Stochastic oscillator %K and %D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticValue {
    pub k: f64,
    pub d: f64,
}

/// Snapshot of every indicator for the latest bar of a series.
///
/// Only valid for the series it was computed from; recompute on new data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorBundle {
    pub rsi: f64,
    pub macd: MacdValue,
    pub bollinger: BollingerValue,
    pub sma20: f64,
    pub sma50: f64,
    pub ema12: f64,
    pub ema26: f64,
    pub stochastic: StochasticValue,
    pub williams_r: f64,
    pub atr: f64,
}
