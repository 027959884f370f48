//! Per-symbol volume anomaly alerts.

use super::AlertRule;
use crate::error::{EngineError, Result};
use crate::types::{AlertCategory, AlertType, MarketAlert, MarketSnapshot};
use serde_json::json;

/// Flags symbols trading far above their average volume.
pub struct VolumeRule {
    spike_ratio: f64,
}

impl Default for VolumeRule {
    fn default() -> Self {
        Self { spike_ratio: 3.0 }
    }
}

impl VolumeRule {
    pub fn new(spike_ratio: f64) -> Self {
        Self { spike_ratio }
    }
}

impl AlertRule for VolumeRule {
    fn id(&self) -> &str {
        "volume"
    }

    fn category(&self) -> AlertCategory {
        AlertCategory::Volume
    }

    fn evaluate(&self, snapshot: &MarketSnapshot) -> Result<Vec<MarketAlert>> {
        let volumes = snapshot
            .symbol_volumes
            .as_ref()
            .ok_or_else(|| EngineError::PartialSourceFailure("symbol_volumes".to_string()))?;

        let alerts = volumes
            .iter()
            .filter_map(|(symbol, stat)| {
                // Symbols without an average are skipped.
                let ratio = stat.ratio()?;
                if ratio <= self.spike_ratio {
                    return None;
                }
                Some(MarketAlert::new(
                    &format!("volume-spike-{}", symbol),
                    AlertType::Info,
                    AlertCategory::Volume,
                    format!("{} unusual volume", symbol),
                    format!("{} is trading at {:.1}x its average volume.", symbol, ratio),
                    4,
                    json!({
                        "symbol": symbol,
                        "volume_ratio": ratio,
                        "current_volume": stat.current,
                        "avg_volume": stat.average,
                    }),
                ))
            })
            .collect();

        Ok(alerts)
    }
}
