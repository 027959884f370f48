pub mod alerts;
pub mod signals;

pub use alerts::{collect_snapshot, AlertGenerator, AlertRule, MarketDataSource, StaticSource};
pub use signals::{
    build_analysis, scan_symbols, IndicatorEngine, MacdState, MacdStateStore, SignalFusion,
    SymbolReport, SymbolResult,
};
