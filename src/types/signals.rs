use serde::{Deserialize, Serialize};

/// Vote cast by a single indicator family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubSignal {
    Buy,
    Sell,
    Neutral,
}

impl SubSignal {
    /// Get display label for this vote.
    pub fn label(&self) -> &'static str {
        match self {
            SubSignal::Buy => "BUY",
            SubSignal::Sell => "SELL",
            SubSignal::Neutral => "NEUTRAL",
        }
    }
}

/// Informational volume qualifier. Never counted as a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolumeSignal {
    High,
    Low,
    Normal,
}

/// Where the close sits relative to the Bollinger Bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BollingerPosition {
    Upper,
    Middle,
    Lower,
}

/// Overall recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    Buy,
    Sell,
    Hold,
}

impl SignalType {
    pub fn label(&self) -> &'static str {
        match self {
            SignalType::Buy => "BUY",
            SignalType::Sell => "SELL",
            SignalType::Hold => "HOLD",
        }
    }

    /// The vote that agrees with this recommendation, if any.
    pub fn agreeing_vote(&self) -> Option<SubSignal> {
        match self {
            SignalType::Buy => Some(SubSignal::Buy),
            SignalType::Sell => Some(SubSignal::Sell),
            SignalType::Hold => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuedSubSignal {
    pub value: f64,
    pub signal: SubSignal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerSubSignal {
    pub position: BollingerPosition,
    pub signal: SubSignal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageSubSignal {
    pub signal: SubSignal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSubSignal {
    pub signal: VolumeSignal,
}

/// Per-indicator breakdown attached to a [`TradingSignal`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSignals {
    /// RSI rounded to the nearest integer.
    pub rsi: ValuedSubSignal,
    /// MACD line rounded to two decimals.
    pub macd: ValuedSubSignal,
    pub bollinger: BollingerSubSignal,
    pub moving_average: MovingAverageSubSignal,
    pub volume: VolumeSubSignal,
}

impl SubSignals {
    /// The four voting signals in fixed order: RSI, MACD, Bollinger, moving average.
    pub fn votes(&self) -> [SubSignal; 4] {
        [
            self.rsi.signal,
            self.macd.signal,
            self.bollinger.signal,
            self.moving_average.signal,
        ]
    }
}

/// Fused recommendation for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingSignal {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub symbol: String,
    /// Confidence percentage (50-90).
    pub confidence: u8,
    pub reason: String,
    /// Strength percentage, a multiple of 25.
    pub strength: u8,
    #[serde(rename = "indicators")]
    pub sub_signals: SubSignals,
}
