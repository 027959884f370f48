use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Headline index quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexQuote {
    pub value: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// Performance of one sector ETF, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorReturn {
    pub sector: String,
    pub symbol: String,
    pub change_1d: f64,
    pub change_5d: f64,
    pub change_1m: f64,
}

impl SectorReturn {
    /// Weighted blend of short and medium term returns.
    pub fn relative_strength(&self) -> f64 {
        (self.change_1d + self.change_5d * 0.5 + self.change_1m * 0.3) / 1.8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeStat {
    pub current: u64,
    pub average: u64,
}

impl VolumeStat {
    /// Current over average volume. `None` when there is no average to compare to.
    pub fn ratio(&self) -> Option<f64> {
        if self.average == 0 {
            None
        } else {
            Some(self.current as f64 / self.average as f64)
        }
    }
}

/// Market-wide data for one alert generation pass.
///
/// Every category is optional: `None` means the upstream source for that
/// category was unavailable, which is different from an empty collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub vix: Option<f64>,
    #[serde(default)]
    pub vix_change: f64,
    #[serde(default)]
    pub index_returns: Option<BTreeMap<String, IndexQuote>>,
    #[serde(default)]
    pub sector_returns: Option<Vec<SectorReturn>>,
    #[serde(default)]
    pub symbol_volumes: Option<BTreeMap<String, VolumeStat>>,
}

impl MarketSnapshot {
    /// True when no category carries data.
    pub fn is_unavailable(&self) -> bool {
        self.vix.is_none()
            && self.index_returns.is_none()
            && self.sector_returns.is_none()
            && self.symbol_volumes.is_none()
    }
}

/// Severity of a market alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCategory {
    Volatility,
    Sector,
    Technical,
    Volume,
}

impl AlertCategory {
    pub fn name(&self) -> &'static str {
        match self {
            AlertCategory::Volatility => "volatility",
            AlertCategory::Sector => "sector",
            AlertCategory::Technical => "technical",
            AlertCategory::Volume => "volume",
        }
    }
}

/// A single prioritized market alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAlert {
    /// Unique per generated alert.
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub category: AlertCategory,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    /// 1 (lowest) to 10 (highest).
    pub priority: u8,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl MarketAlert {
    /// Create an alert with a fresh `<kind>-<uuid>` id.
    pub fn new(
        kind: &str,
        alert_type: AlertType,
        category: AlertCategory,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: u8,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: format!("{}-{}", kind, uuid::Uuid::new_v4()),
            alert_type,
            category,
            title: title.into(),
            description: description.into(),
            timestamp: Utc::now(),
            priority: priority.clamp(1, 10),
            data,
        }
    }
}
