//! VIX level and spike alerts.

use super::AlertRule;
use crate::config::VixThresholds;
use crate::error::{EngineError, Result};
use crate::types::{AlertCategory, AlertType, MarketAlert, MarketSnapshot};
use serde_json::json;

/// Tiered VIX level alert plus an independent spike alert.
pub struct VixRule {
    thresholds: VixThresholds,
    spike_points: f64,
}

impl Default for VixRule {
    fn default() -> Self {
        Self {
            thresholds: VixThresholds::default(),
            spike_points: 3.0,
        }
    }
}

impl VixRule {
    pub fn new(thresholds: VixThresholds, spike_points: f64) -> Self {
        Self {
            thresholds,
            spike_points,
        }
    }

    fn level_alert(&self, vix: f64, change: f64) -> Option<MarketAlert> {
        let t = &self.thresholds;

        let (alert_type, title, description, priority, threshold) = if vix >= t.high {
            (
                AlertType::Critical,
                "VIX at danger level",
                format!(
                    "VIX has reached {:.1}, signalling extreme market instability. Tighten risk management.",
                    vix
                ),
                9,
                t.high,
            )
        } else if vix > t.elevated {
            (
                AlertType::Warning,
                "VIX rising",
                format!("VIX has risen to {:.1}; market volatility is increasing.", vix),
                6,
                t.elevated,
            )
        } else if vix < t.low {
            (
                AlertType::Info,
                "VIX at low level",
                format!(
                    "VIX is low at {:.1}; watch for excessive market complacency.",
                    vix
                ),
                3,
                t.low,
            )
        } else {
            return None;
        };

        Some(MarketAlert::new(
            "vix-level",
            alert_type,
            AlertCategory::Volatility,
            title,
            description,
            priority,
            json!({ "vix": vix, "vix_change": change, "threshold": threshold }),
        ))
    }

    fn spike_alert(&self, vix: f64, change: f64) -> Option<MarketAlert> {
        if change.abs() <= self.spike_points {
            return None;
        }

        let rising = change > 0.0;
        let direction = if rising { "surged" } else { "dropped" };
        Some(MarketAlert::new(
            "vix-spike",
            if rising { AlertType::Warning } else { AlertType::Info },
            AlertCategory::Volatility,
            format!("VIX {}", direction),
            format!(
                "VIX {} {:.1} points, a sharp shift in market sentiment.",
                direction,
                change.abs()
            ),
            if rising { 7 } else { 4 },
            json!({ "vix": vix, "vix_change": change }),
        ))
    }
}

impl AlertRule for VixRule {
    fn id(&self) -> &str {
        "vix"
    }

    fn category(&self) -> AlertCategory {
        AlertCategory::Volatility
    }

    fn evaluate(&self, snapshot: &MarketSnapshot) -> Result<Vec<MarketAlert>> {
        let vix = snapshot
            .vix
            .ok_or_else(|| EngineError::PartialSourceFailure("vix".to_string()))?;
        let change = snapshot.vix_change;

        Ok(self
            .level_alert(vix, change)
            .into_iter()
            .chain(self.spike_alert(vix, change))
            .collect())
    }
}
