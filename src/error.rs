use thiserror::Error;

/// Engine error types.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient data for {indicator}: need {required} bars, got {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: String },

    #[error("Market data unavailable: {0}")]
    PartialSourceFailure(String),

    #[error("No market data available")]
    TotalSourceFailure,

    #[error("Market data source error: {0}")]
    Source(String),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
