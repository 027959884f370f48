//! Market data source abstraction and snapshot collection.

use crate::config::SectorEtf;
use crate::error::{EngineError, Result};
use crate::types::{IndexQuote, MarketSnapshot, SectorReturn, VolumeStat};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Upstream provider of market-wide data, one fetch per snapshot category.
#[allow(async_fn_in_trait)]
pub trait MarketDataSource {
    /// VIX level (`value`) and point change (`change`).
    async fn fetch_vix(&self) -> Result<IndexQuote>;

    /// Quotes keyed by index name.
    async fn fetch_index_returns(&self) -> Result<BTreeMap<String, IndexQuote>>;

    /// Returns for the requested sector ETFs.
    async fn fetch_sector_returns(&self, sectors: &[SectorEtf]) -> Result<Vec<SectorReturn>>;

    /// Current and average volume keyed by symbol.
    async fn fetch_symbol_volumes(&self) -> Result<BTreeMap<String, VolumeStat>>;
}

fn available<T>(category: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Market data category {} unavailable: {}", category, e);
            None
        }
    }
}

/// Fetch every category concurrently into a snapshot.
///
/// A failed fetch leaves its category as `None`; this never fails as a whole.
pub async fn collect_snapshot<S: MarketDataSource>(
    source: &S,
    sectors: &[SectorEtf],
) -> MarketSnapshot {
    let (vix, indices, sector_returns, volumes) = tokio::join!(
        source.fetch_vix(),
        source.fetch_index_returns(),
        source.fetch_sector_returns(sectors),
        source.fetch_symbol_volumes(),
    );

    let vix = available("vix", vix);
    let snapshot = MarketSnapshot {
        vix: vix.as_ref().map(|q| q.value),
        vix_change: vix.map(|q| q.change).unwrap_or(0.0),
        index_returns: available("index_returns", indices),
        sector_returns: available("sector_returns", sector_returns),
        symbol_volumes: available("symbol_volumes", volumes),
    };

    debug!(
        vix = snapshot.vix.is_some(),
        indices = snapshot.index_returns.is_some(),
        sectors = snapshot.sector_returns.is_some(),
        volumes = snapshot.symbol_volumes.is_some(),
        "Collected market snapshot"
    );
    snapshot
}

/// In-memory source serving a fixed snapshot, e.g. one loaded from a file.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    snapshot: MarketSnapshot,
}

impl StaticSource {
    pub fn new(snapshot: MarketSnapshot) -> Self {
        Self { snapshot }
    }
}

fn missing(category: &str) -> EngineError {
    EngineError::PartialSourceFailure(category.to_string())
}

impl MarketDataSource for StaticSource {
    async fn fetch_vix(&self) -> Result<IndexQuote> {
        let value = self.snapshot.vix.ok_or_else(|| missing("vix"))?;
        let change = self.snapshot.vix_change;
        let previous = value - change;
        let change_percent = if previous == 0.0 {
            0.0
        } else {
            change / previous * 100.0
        };
        Ok(IndexQuote {
            value,
            change,
            change_percent,
        })
    }

    async fn fetch_index_returns(&self) -> Result<BTreeMap<String, IndexQuote>> {
        self.snapshot
            .index_returns
            .clone()
            .ok_or_else(|| missing("index_returns"))
    }

    async fn fetch_sector_returns(&self, sectors: &[SectorEtf]) -> Result<Vec<SectorReturn>> {
        let returns = self
            .snapshot
            .sector_returns
            .as_ref()
            .ok_or_else(|| missing("sector_returns"))?;
        if sectors.is_empty() {
            return Ok(returns.clone());
        }
        Ok(returns
            .iter()
            .filter(|r| sectors.iter().any(|s| s.symbol.eq_ignore_ascii_case(&r.symbol)))
            .cloned()
            .collect())
    }

    async fn fetch_symbol_volumes(&self) -> Result<BTreeMap<String, VolumeStat>> {
        self.snapshot
            .symbol_volumes
            .clone()
            .ok_or_else(|| missing("symbol_volumes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_sector_etfs;

    struct FailingSource;

    impl MarketDataSource for FailingSource {
        async fn fetch_vix(&self) -> Result<IndexQuote> {
            Err(EngineError::Source("timeout".to_string()))
        }

        async fn fetch_index_returns(&self) -> Result<BTreeMap<String, IndexQuote>> {
            Ok(BTreeMap::new())
        }

        async fn fetch_sector_returns(&self, _sectors: &[SectorEtf]) -> Result<Vec<SectorReturn>> {
            Err(EngineError::Source("rate limited".to_string()))
        }

        async fn fetch_symbol_volumes(&self) -> Result<BTreeMap<String, VolumeStat>> {
            Err(EngineError::Source("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failed_fetches_become_none() {
        let snapshot = collect_snapshot(&FailingSource, &default_sector_etfs()).await;
        assert!(snapshot.vix.is_none());
        assert_eq!(snapshot.vix_change, 0.0);
        assert_eq!(snapshot.index_returns, Some(BTreeMap::new()));
        assert!(snapshot.sector_returns.is_none());
        assert!(snapshot.symbol_volumes.is_none());
    }

    #[tokio::test]
    async fn test_static_source_round_trips_snapshot() {
        let original = MarketSnapshot {
            vix: Some(22.0),
            vix_change: -1.5,
            sector_returns: Some(vec![
                SectorReturn {
                    sector: "Energy".to_string(),
                    symbol: "XLE".to_string(),
                    change_1d: 1.0,
                    change_5d: 2.0,
                    change_1m: 3.0,
                },
                SectorReturn {
                    sector: "Crypto".to_string(),
                    symbol: "BITQ".to_string(),
                    change_1d: 9.0,
                    change_5d: 9.0,
                    change_1m: 9.0,
                },
            ]),
            ..Default::default()
        };
        let source = StaticSource::new(original);
        let snapshot = collect_snapshot(&source, &default_sector_etfs()).await;

        assert_eq!(snapshot.vix, Some(22.0));
        assert_eq!(snapshot.vix_change, -1.5);
        // Sectors outside the configured universe are filtered out.
        assert_eq!(snapshot.sector_returns.map(|s| s.len()), Some(1));
        assert!(snapshot.index_returns.is_none());
    }
}
