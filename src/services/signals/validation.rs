//! Series validation.

use crate::error::{EngineError, Result};
use crate::types::PriceBar;

/// Check every bar's OHLC invariants.
///
/// Returns the series unchanged, or `InvalidBar` for the first malformed bar.
pub fn validate_series(bars: &[PriceBar]) -> Result<&[PriceBar]> {
    for (index, bar) in bars.iter().enumerate() {
        if let Some(reason) = bar.violation() {
            return Err(EngineError::InvalidBar { index, reason });
        }
    }
    Ok(bars)
}

/// Require at least `required` bars for `indicator`.
pub fn require_len<'a>(
    bars: &'a [PriceBar],
    required: usize,
    indicator: &'static str,
) -> Result<&'a [PriceBar]> {
    if bars.len() < required {
        return Err(EngineError::InsufficientData {
            indicator,
            required,
            available: bars.len(),
        });
    }
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_bars;

    #[test]
    fn test_valid_series_passes_through() {
        let bars = test_bars::uptrend(10);
        let validated = validate_series(&bars).unwrap();
        assert_eq!(validated.len(), 10);
    }

    #[test]
    fn test_high_below_low_is_rejected() {
        let mut bars = test_bars::uptrend(10);
        bars[4].high = bars[4].low - 1.0;
        match validate_series(&bars) {
            Err(EngineError::InvalidBar { index, .. }) => assert_eq!(index, 4),
            other => panic!("expected InvalidBar, got {:?}", other),
        }
    }

    #[test]
    fn test_close_above_high_is_rejected() {
        let mut bars = test_bars::uptrend(3);
        bars[2].close = bars[2].high + 5.0;
        assert!(matches!(
            validate_series(&bars),
            Err(EngineError::InvalidBar { index: 2, .. })
        ));
    }

    #[test]
    fn test_nan_price_is_rejected() {
        let mut bars = test_bars::uptrend(3);
        bars[0].open = f64::NAN;
        assert!(matches!(
            validate_series(&bars),
            Err(EngineError::InvalidBar { index: 0, .. })
        ));
    }

    #[test]
    fn test_require_len() {
        let bars = test_bars::uptrend(10);
        assert!(require_len(&bars, 10, "sma").is_ok());
        match require_len(&bars, 26, "macd") {
            Err(EngineError::InsufficientData {
                indicator,
                required,
                available,
            }) => {
                assert_eq!(indicator, "macd");
                assert_eq!(required, 26);
                assert_eq!(available, 10);
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }
}
