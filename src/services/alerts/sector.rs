//! Sector rotation and sector spike alerts.

use super::AlertRule;
use crate::error::{EngineError, Result};
use crate::types::{AlertCategory, AlertType, MarketAlert, MarketSnapshot, SectorReturn};
use serde_json::json;

/// Detects capital rotation between sectors and outsized single-day sector moves.
pub struct SectorRule {
    rotation_spread: f64,
    spike_pct: f64,
    warning_pct: f64,
}

impl Default for SectorRule {
    fn default() -> Self {
        Self {
            rotation_spread: 5.0,
            spike_pct: 3.0,
            warning_pct: 5.0,
        }
    }
}

impl SectorRule {
    pub fn new(rotation_spread: f64, spike_pct: f64, warning_pct: f64) -> Self {
        Self {
            rotation_spread,
            spike_pct,
            warning_pct,
        }
    }

    fn rotation_alert(&self, sectors: &[SectorReturn]) -> Option<MarketAlert> {
        let strongest = sectors
            .iter()
            .max_by(|a, b| a.relative_strength().total_cmp(&b.relative_strength()))?;
        let weakest = sectors
            .iter()
            .min_by(|a, b| a.relative_strength().total_cmp(&b.relative_strength()))?;

        let spread = strongest.relative_strength() - weakest.relative_strength();
        if spread <= self.rotation_spread {
            return None;
        }

        Some(MarketAlert::new(
            "sector-rotation",
            AlertType::Info,
            AlertCategory::Sector,
            "Sector rotation",
            format!(
                "Capital is moving from {} into {}.",
                weakest.sector, strongest.sector
            ),
            5,
            json!({
                "strongest_sector": strongest,
                "weakest_sector": weakest,
                "strength_difference": spread,
            }),
        ))
    }

    fn spike_alert(&self, sector: &SectorReturn) -> Option<MarketAlert> {
        let magnitude = sector.change_1d.abs();
        if magnitude <= self.spike_pct {
            return None;
        }

        let direction = if sector.change_1d > 0.0 { "rally" } else { "selloff" };
        let severe = magnitude > self.warning_pct;
        Some(MarketAlert::new(
            &format!("sector-spike-{}", sector.symbol),
            if severe { AlertType::Warning } else { AlertType::Info },
            AlertCategory::Sector,
            format!("{} sector {}", sector.sector, direction),
            format!(
                "The {} sector moved {:.1}% today.",
                sector.sector, sector.change_1d
            ),
            if severe { 7 } else { 4 },
            json!(sector),
        ))
    }
}

impl AlertRule for SectorRule {
    fn id(&self) -> &str {
        "sector"
    }

    fn category(&self) -> AlertCategory {
        AlertCategory::Sector
    }

    fn evaluate(&self, snapshot: &MarketSnapshot) -> Result<Vec<MarketAlert>> {
        let sectors = snapshot
            .sector_returns
            .as_deref()
            .ok_or_else(|| EngineError::PartialSourceFailure("sector_returns".to_string()))?;

        let mut alerts: Vec<MarketAlert> = self.rotation_alert(sectors).into_iter().collect();
        alerts.extend(sectors.iter().filter_map(|s| self.spike_alert(s)));
        Ok(alerts)
    }
}
