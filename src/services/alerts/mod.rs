//! Market alerts service module.
//!
//! Each rule inspects one category of a [`MarketSnapshot`] and emits zero or
//! more prioritized alerts; the generator merges them.

pub mod generator;
pub mod index_volatility;
pub mod sector;
pub mod source;
pub mod vix;
pub mod volume;

pub use generator::{fallback_alerts, AlertGenerator};
pub use index_volatility::IndexVolatilityRule;
pub use sector::SectorRule;
pub use source::{collect_snapshot, MarketDataSource, StaticSource};
pub use vix::VixRule;
pub use volume::VolumeRule;

use crate::error::Result;
use crate::types::{AlertCategory, MarketAlert, MarketSnapshot};

/// Trait for implementing alert rules.
pub trait AlertRule: Send + Sync {
    /// Unique identifier for this rule.
    fn id(&self) -> &str;

    /// Category of every alert this rule emits.
    fn category(&self) -> AlertCategory;

    /// Evaluate the rule.
    ///
    /// Returns `PartialSourceFailure` when the snapshot category the rule
    /// reads is unavailable.
    fn evaluate(&self, snapshot: &MarketSnapshot) -> Result<Vec<MarketAlert>>;
}
