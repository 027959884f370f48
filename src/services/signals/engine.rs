//! Indicator engine: computes the full indicator bundle for a series.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::services::signals::indicators::{
    Atr, BollingerBands, Ema, Macd, Rsi, Sma, Stochastic, WilliamsR,
};
use crate::services::signals::{require_len, trailing, validate_series, Indicator, MacdState};
use crate::types::{closes, IndicatorBundle, MacdValue, PriceBar};
use tracing::debug;

/// Stateless indicator engine.
///
/// Holds only configuration, so one instance can be shared across threads
/// and symbols.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: EngineConfig,
}

impl IndicatorEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Empty MACD state sized to the configured history length.
    pub fn new_state(&self) -> MacdState {
        MacdState::new(self.config.macd_history)
    }

    fn macd(&self) -> Macd {
        Macd::new(
            self.config.macd_fast,
            self.config.macd_slow,
            self.config.macd_signal,
        )
    }

    /// Compute every indicator for the latest bar.
    ///
    /// The MACD signal line is derived from the MACD history of the series
    /// itself. Fails with `InvalidBar` on malformed input and
    /// `InsufficientData` on an empty series; shorter-than-window series
    /// produce neutral fallbacks instead of errors.
    pub fn compute(&self, bars: &[PriceBar]) -> Result<IndicatorBundle> {
        let bars = self.checked(bars)?;
        let macd = self.macd().calculate(bars);
        Ok(self.bundle(bars, macd))
    }

    /// Compute every indicator, taking the MACD signal line from `state`.
    ///
    /// The current MACD value is appended to `state` first, so call this once
    /// per new bar.
    pub fn compute_with_state(
        &self,
        bars: &[PriceBar],
        state: &mut MacdState,
    ) -> Result<IndicatorBundle> {
        let bars = self.checked(bars)?;
        let macd = self.macd();
        let line = macd.macd_line(&closes(bars));
        let value = macd.from_history(state.record(line));
        debug!(history = state.len(), macd = value.macd, "MACD state updated");
        Ok(self.bundle(bars, value))
    }

    /// Warm `state` with the MACD history of every bar except the last.
    ///
    /// A following `compute_with_state` on the same series then records the
    /// latest value exactly once.
    pub fn seed_state(&self, bars: &[PriceBar], state: &mut MacdState) -> Result<()> {
        let bars = self.checked(bars)?;
        let history = self.macd().macd_history(&closes(bars));
        state.seed(&history[..history.len() - 1]);
        Ok(())
    }

    /// Average volume over the trailing lookback window (or fewer bars when short).
    pub fn average_volume(&self, bars: &[PriceBar]) -> f64 {
        let window = trailing(bars, self.config.volume_lookback);
        if window.is_empty() {
            return 0.0;
        }
        window.iter().map(|b| b.volume as f64).sum::<f64>() / window.len() as f64
    }

    fn checked<'a>(&self, bars: &'a [PriceBar]) -> Result<&'a [PriceBar]> {
        let bars = validate_series(bars)?;
        require_len(bars, 1, "indicator bundle")
    }

    fn bundle(&self, bars: &[PriceBar], macd: MacdValue) -> IndicatorBundle {
        let c = &self.config;
        debug!(bars = bars.len(), "Computing indicator bundle");

        IndicatorBundle {
            rsi: Rsi::new(c.rsi_period).calculate(bars),
            macd,
            bollinger: BollingerBands::new(c.bollinger_period, c.bollinger_k).calculate(bars),
            sma20: Sma::new(c.sma_short).calculate(bars),
            sma50: Sma::new(c.sma_long).calculate(bars),
            ema12: Ema::new(c.macd_fast).calculate(bars),
            ema26: Ema::new(c.macd_slow).calculate(bars),
            stochastic: Stochastic::new(c.stochastic_period, c.stochastic_smoothing)
                .calculate(bars),
            williams_r: WilliamsR::new(c.williams_period).calculate(bars),
            atr: Atr::new(c.atr_period).calculate(bars),
        }
    }
}
