//! Aggregate headline index volatility.

use super::AlertRule;
use crate::error::{EngineError, Result};
use crate::types::{AlertCategory, AlertType, MarketAlert, MarketSnapshot};
use serde_json::{json, Map, Value};

/// Warns when the headline indices move too much on average.
pub struct IndexVolatilityRule {
    headline_indices: Vec<String>,
    threshold_pct: f64,
}

impl Default for IndexVolatilityRule {
    fn default() -> Self {
        Self {
            headline_indices: vec![
                "S&P 500".to_string(),
                "NASDAQ".to_string(),
                "DOW".to_string(),
            ],
            threshold_pct: 2.0,
        }
    }
}

impl IndexVolatilityRule {
    pub fn new(headline_indices: Vec<String>, threshold_pct: f64) -> Self {
        Self {
            headline_indices,
            threshold_pct,
        }
    }
}

impl AlertRule for IndexVolatilityRule {
    fn id(&self) -> &str {
        "index_volatility"
    }

    fn category(&self) -> AlertCategory {
        AlertCategory::Volatility
    }

    fn evaluate(&self, snapshot: &MarketSnapshot) -> Result<Vec<MarketAlert>> {
        let indices = snapshot
            .index_returns
            .as_ref()
            .ok_or_else(|| EngineError::PartialSourceFailure("index_returns".to_string()))?;

        let mut measures: Vec<(&str, f64)> = Vec::new();
        for name in &self.headline_indices {
            if measures.iter().any(|(seen, _)| *seen == name.as_str()) {
                continue;
            }
            let pct = indices.get(name).map(|q| q.change_percent.abs());
            if let Some(pct) = pct.filter(|p| p.is_finite()) {
                measures.push((name.as_str(), pct));
            }
        }

        if measures.is_empty() {
            return Ok(Vec::new());
        }

        let avg = measures.iter().map(|(_, pct)| pct).sum::<f64>() / measures.len() as f64;
        if avg <= self.threshold_pct {
            return Ok(Vec::new());
        }

        let payload: Map<String, Value> = measures
            .iter()
            .map(|(name, pct)| (name.to_string(), json!(pct)))
            .collect();
        Ok(vec![MarketAlert::new(
            "market-volatility",
            AlertType::Warning,
            AlertCategory::Volatility,
            "High volatility environment",
            format!(
                "Headline indices are moving {:.1}% on average, a high volatility environment.",
                avg
            ),
            6,
            json!({ "avg_volatility": avg, "measures": payload }),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IndexQuote;
    use std::collections::BTreeMap;

    fn snapshot(quotes: &[(&str, f64)]) -> MarketSnapshot {
        let index_returns: BTreeMap<String, IndexQuote> = quotes
            .iter()
            .map(|(name, pct)| {
                (
                    name.to_string(),
                    IndexQuote {
                        value: 1000.0,
                        change: pct * 10.0,
                        change_percent: *pct,
                    },
                )
            })
            .collect();
        MarketSnapshot {
            index_returns: Some(index_returns),
            ..Default::default()
        }
    }

    #[test]
    fn test_high_average_move_warns() {
        let alerts = IndexVolatilityRule::default()
            .evaluate(&snapshot(&[("S&P 500", -2.5), ("NASDAQ", -3.1), ("DOW", -1.9)]))
            .unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, AlertType::Warning);
        assert_eq!(alerts[0].priority, 6);
    }

    #[test]
    fn test_calm_market_is_quiet() {
        let alerts = IndexVolatilityRule::default()
            .evaluate(&snapshot(&[("S&P 500", 0.4), ("NASDAQ", -0.8), ("DOW", 0.2)]))
            .unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_only_headline_indices_count() {
        let alerts = IndexVolatilityRule::default()
            .evaluate(&snapshot(&[("S&P 500", 0.5), ("RUSSELL 2000", 8.0)]))
            .unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_non_finite_move_is_ignored() {
        let alerts = IndexVolatilityRule::default()
            .evaluate(&snapshot(&[("S&P 500", f64::NAN), ("NASDAQ", -3.0), ("DOW", 2.0)]))
            .unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].data["avg_volatility"], 2.5);
        assert_eq!(alerts[0].data["measures"].as_object().unwrap().len(), 2);
        assert!(alerts[0].data["measures"].get("S&P 500").is_none());
    }

    #[test]
    fn test_repeated_headline_counts_once() {
        let rule = IndexVolatilityRule::new(
            vec!["NASDAQ".to_string(), "NASDAQ".to_string(), "DOW".to_string()],
            2.0,
        );
        // Counting NASDAQ twice would average (4.5 + 4.5 + 0.5) / 3.
        let alerts = rule
            .evaluate(&snapshot(&[("NASDAQ", -4.5), ("DOW", 0.5)]))
            .unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].data["avg_volatility"], 2.5);

        // Counted twice this would reach (3.4 + 3.4 + 0.5) / 3 > 2.
        let calm = rule
            .evaluate(&snapshot(&[("NASDAQ", -3.4), ("DOW", 0.5)]))
            .unwrap();
        assert!(calm.is_empty());
    }

    #[test]
    fn test_no_headline_indices_is_quiet() {
        let alerts = IndexVolatilityRule::default()
            .evaluate(&snapshot(&[("NIKKEI", 5.0)]))
            .unwrap();
        assert!(alerts.is_empty());
    }
}
