//! Per-symbol fan-out of signal fusion on the tokio blocking pool.

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::services::signals::{build_analysis, SignalFusion};
use crate::types::{PriceSeries, StockAnalysis, TradingSignal};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Signal and analysis for one successfully scanned symbol.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolReport {
    pub signal: TradingSignal,
    pub analysis: StockAnalysis,
}

/// Outcome of scanning one symbol, attributed to that symbol.
#[derive(Debug)]
pub struct SymbolResult {
    pub symbol: String,
    pub result: Result<SymbolReport>,
}

fn scan_one(fusion: &SignalFusion, symbol: &str, bars: &PriceSeries) -> Result<SymbolReport> {
    let (bundle, signal) = fusion.analyze_with_bundle(symbol, bars)?;
    let last_bar = bars.last().ok_or(EngineError::InsufficientData {
        indicator: "analysis",
        required: 1,
        available: 0,
    })?;
    let analysis = build_analysis(&signal, &bundle, last_bar);
    Ok(SymbolReport { signal, analysis })
}

/// Scan every symbol concurrently, one blocking task each.
///
/// Results come back in input order. A failure for one symbol (bad data or a
/// panicked task) is reported in its own `SymbolResult` and does not affect
/// the others.
pub async fn scan_symbols(
    config: &EngineConfig,
    inputs: Vec<(String, PriceSeries)>,
) -> Vec<SymbolResult> {
    let fusion = Arc::new(SignalFusion::new(config.clone()));
    info!("Scanning {} symbols", inputs.len());

    let handles: Vec<_> = inputs
        .into_iter()
        .map(|(symbol, bars)| {
            let fusion = Arc::clone(&fusion);
            let task_symbol = symbol.clone();
            let handle =
                tokio::task::spawn_blocking(move || scan_one(&fusion, &task_symbol, &bars));
            (symbol, handle)
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (symbol, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(EngineError::Source(format!("scan task failed: {}", e))),
        };
        if let Err(e) = &result {
            warn!("Scan failed for {}: {}", symbol, e);
        }
        results.push(SymbolResult { symbol, result });
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_bars;
    use crate::types::SignalType;

    #[tokio::test]
    async fn test_scan_keeps_symbol_attribution() {
        let inputs = vec![
            ("UP".to_string(), test_bars::uptrend(80)),
            ("EMPTY".to_string(), Vec::new()),
            ("DOWN".to_string(), test_bars::downtrend(80)),
        ];
        let results = scan_symbols(&EngineConfig::default(), inputs).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].symbol, "UP");
        assert!(results[1].result.is_err());

        let down = results[2].result.as_ref().unwrap();
        assert_eq!(down.signal.symbol, "DOWN");
        assert_eq!(down.signal.signal_type, SignalType::Sell);
        assert_eq!(down.analysis.symbol, "DOWN");
    }

    #[tokio::test]
    async fn test_scan_empty_input() {
        let results = scan_symbols(&EngineConfig::default(), Vec::new()).await;
        assert!(results.is_empty());
    }
}
