//! Alert generator: runs every rule against a snapshot and merges the results.

use super::{AlertRule, IndexVolatilityRule, SectorRule, VixRule, VolumeRule};
use crate::config::AlertConfig;
use crate::error::EngineError;
use crate::types::{AlertCategory, AlertType, MarketAlert, MarketSnapshot};
use serde_json::json;
use tracing::{debug, info, warn};

/// Build the rule set for a configuration.
fn all_rules(config: &AlertConfig) -> Vec<Box<dyn AlertRule>> {
    vec![
        Box::new(VixRule::new(config.vix.clone(), config.vix_spike_points)),
        Box::new(SectorRule::new(
            config.rotation_spread,
            config.sector_spike_pct,
            config.sector_warning_pct,
        )),
        Box::new(IndexVolatilityRule::new(
            config.headline_indices.clone(),
            config.index_volatility_pct,
        )),
        Box::new(VolumeRule::new(config.volume_spike_ratio)),
    ]
}

/// Alerts returned when no market data is available at all.
pub fn fallback_alerts() -> Vec<MarketAlert> {
    vec![
        MarketAlert::new(
            "vix-level",
            AlertType::Warning,
            AlertCategory::Volatility,
            "VIX rising",
            "Market volatility is increasing. Watch your risk management.",
            6,
            json!({ "source": "fallback" }),
        ),
        MarketAlert::new(
            "sector-rotation",
            AlertType::Info,
            AlertCategory::Sector,
            "Sector rotation",
            "Capital is moving from technology into financials.",
            5,
            json!({ "source": "fallback" }),
        ),
    ]
}

/// Produces prioritized market alerts from a [`MarketSnapshot`].
pub struct AlertGenerator {
    rules: Vec<Box<dyn AlertRule>>,
}

impl Default for AlertGenerator {
    fn default() -> Self {
        Self::new(&AlertConfig::default())
    }
}

impl AlertGenerator {
    pub fn new(config: &AlertConfig) -> Self {
        Self {
            rules: all_rules(config),
        }
    }

    /// Generate alerts sorted by priority, highest first.
    ///
    /// Rules whose input category is unavailable are skipped. When every
    /// category is unavailable the fallback set is returned instead.
    pub fn generate(&self, snapshot: &MarketSnapshot) -> Vec<MarketAlert> {
        if snapshot.is_unavailable() {
            warn!("{}; returning fallback alerts", EngineError::TotalSourceFailure);
            return fallback_alerts();
        }

        let mut alerts = Vec::new();
        for rule in &self.rules {
            match rule.evaluate(snapshot) {
                Ok(found) => {
                    debug!(rule = rule.id(), count = found.len(), "Alert rule evaluated");
                    alerts.extend(found);
                }
                Err(e) => warn!(
                    rule = rule.id(),
                    category = rule.category().name(),
                    "Skipping alert rule: {}",
                    e
                ),
            }
        }

        // Stable, so equal priorities keep rule order.
        alerts.sort_by(|a, b| b.priority.cmp(&a.priority));
        info!("Generated {} market alerts", alerts.len());
        alerts
    }
}
