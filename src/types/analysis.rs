use serde::{Deserialize, Serialize};

use super::{SignalType, SubSignals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentKind {
    Trending,
    Ranging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Bullish,
    Bearish,
    Neutral,
}

impl From<SignalType> for TrendDirection {
    fn from(signal_type: SignalType) -> Self {
        match signal_type {
            SignalType::Buy => TrendDirection::Bullish,
            SignalType::Sell => TrendDirection::Bearish,
            SignalType::Hold => TrendDirection::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEnvironment {
    pub kind: EnvironmentKind,
    pub direction: TrendDirection,
    pub strength: u8,
}

/// Classic floor pivots of the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotPoints {
    pub pivot: f64,
    pub r1: f64,
    pub s1: f64,
    pub r2: f64,
    pub s2: f64,
}

/// ATR-scaled entry, stop and profit targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskTargets {
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit_1: f64,
    pub take_profit_2: f64,
    pub take_profit_3: f64,
    pub risk_reward_ratio: f64,
}

/// Extended analysis report built on top of a fused signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub symbol: String,
    pub recommendation: SignalType,
    /// Signal confidence as a fraction (0.0-1.0).
    pub confidence: f64,
    pub reasoning: Vec<String>,
    pub technical_indicators: SubSignals,
    pub market_environment: MarketEnvironment,
    pub risk_targets: RiskTargets,
    pub pivot_points: PivotPoints,
    pub action_plan: Vec<String>,
}
