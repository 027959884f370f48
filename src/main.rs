use anyhow::Context;
use augur::{
    collect_snapshot, scan_symbols, AlertGenerator, Config, MarketAlert, MarketSnapshot,
    PriceSeries, StaticSource, StockAnalysis, TradingSignal,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Input file: price series per symbol plus a market snapshot.
#[derive(Debug, Deserialize)]
struct Input {
    #[serde(default)]
    series: BTreeMap<String, PriceSeries>,
    #[serde(default)]
    market: MarketSnapshot,
}

#[derive(Debug, Serialize)]
struct Output {
    signals: Vec<TradingSignal>,
    analyses: Vec<StockAnalysis>,
    /// Error message per symbol that could not be analyzed.
    errors: BTreeMap<String, String>,
    alerts: Vec<MarketAlert>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "augur=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("AUGUR_INPUT").ok())
        .context("usage: augur <input.json> (or set AUGUR_INPUT)")?;
    info!("Reading market input from {}", path);

    let raw = std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path))?;
    let input: Input =
        serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path))?;

    let mut output = Output {
        signals: Vec::new(),
        analyses: Vec::new(),
        errors: BTreeMap::new(),
        alerts: Vec::new(),
    };

    for scanned in scan_symbols(&config.engine, input.series.into_iter().collect()).await {
        match scanned.result {
            Ok(report) => {
                output.signals.push(report.signal);
                output.analyses.push(report.analysis);
            }
            Err(e) => {
                output.errors.insert(scanned.symbol, e.to_string());
            }
        }
    }

    let source = StaticSource::new(input.market);
    let snapshot = collect_snapshot(&source, &config.alerts.sectors).await;
    output.alerts = AlertGenerator::new(&config.alerts).generate(&snapshot);

    if !output.errors.is_empty() {
        warn!("{} symbols could not be analyzed", output.errors.len());
    }
    info!(
        "Produced {} signals and {} alerts",
        output.signals.len(),
        output.alerts.len()
    );

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
