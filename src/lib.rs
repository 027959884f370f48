//! Augur - Technical indicator engine, signal fusion and market alert generation

pub mod config;
pub mod error;
pub mod services;
pub mod types;

pub use config::{AlertConfig, Config, EngineConfig};
pub use error::{EngineError, Result};
pub use services::{
    build_analysis, collect_snapshot, scan_symbols, AlertGenerator, IndicatorEngine, MacdState,
    MacdStateStore, MarketDataSource, SignalFusion, StaticSource,
};

// Re-export commonly used types
pub use types::*;
