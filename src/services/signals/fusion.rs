//! Majority-vote fusion of indicator sub-signals.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::services::signals::{IndicatorEngine, MacdStateStore};
use crate::types::{
    BollingerPosition, BollingerSubSignal, IndicatorBundle, MovingAverageSubSignal, PriceBar,
    SignalType, SubSignal, SubSignals, TradingSignal, ValuedSubSignal, VolumeSignal,
    VolumeSubSignal,
};
use std::sync::Arc;
use tracing::debug;

/// Bounds of every reported confidence.
const MIN_CONFIDENCE: u8 = 50;
const MAX_CONFIDENCE: u8 = 90;
/// Confidence before any agreeing votes are counted.
const BASE_CONFIDENCE: u8 = 60;
const CONFIDENCE_PER_VOTE: u8 = 10;
const STRENGTH_PER_VOTE: u8 = 25;
const HOLD_STRENGTH: u8 = 50;

const HOLD_REASON: &str = "Technical indicators are neutral";

/// Combines the indicator bundle into a single BUY/SELL/HOLD recommendation.
#[derive(Debug, Clone, Default)]
pub struct SignalFusion {
    engine: IndicatorEngine,
}

impl SignalFusion {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: IndicatorEngine::new(config),
        }
    }

    pub fn engine(&self) -> &IndicatorEngine {
        &self.engine
    }

    /// Per-symbol MACD store sized to the configured history length.
    pub fn new_store(&self) -> Arc<MacdStateStore> {
        MacdStateStore::new(self.config().macd_history)
    }

    fn config(&self) -> &EngineConfig {
        self.engine.config()
    }

    /// Validate `bars`, compute the bundle and fuse it for the latest bar.
    pub fn analyze(&self, symbol: &str, bars: &[PriceBar]) -> Result<TradingSignal> {
        self.analyze_with_bundle(symbol, bars).map(|(_, signal)| signal)
    }

    /// Like [`analyze`](Self::analyze), also returning the bundle the signal was fused from.
    pub fn analyze_with_bundle(
        &self,
        symbol: &str,
        bars: &[PriceBar],
    ) -> Result<(IndicatorBundle, TradingSignal)> {
        let bundle = self.engine.compute(bars)?;
        let signal = self.fuse_latest(symbol, &bundle, bars);
        Ok((bundle, signal))
    }

    /// Analyze using the symbol's MACD history from `store`.
    pub fn analyze_with_store(
        &self,
        symbol: &str,
        bars: &[PriceBar],
        store: &MacdStateStore,
    ) -> Result<TradingSignal> {
        let bundle = store.with_state(symbol, |state| {
            if state.is_empty() {
                self.engine.seed_state(bars, state)?;
            }
            self.engine.compute_with_state(bars, state)
        })?;
        Ok(self.fuse_latest(symbol, &bundle, bars))
    }

    fn fuse_latest(&self, symbol: &str, bundle: &IndicatorBundle, bars: &[PriceBar]) -> TradingSignal {
        let (close, volume) = bars
            .last()
            .map(|bar| (bar.close, bar.volume))
            .unwrap_or_default();
        let avg_volume = self.engine.average_volume(bars);
        self.fuse(symbol, bundle, close, volume, avg_volume)
    }

    /// Fuse a precomputed bundle. Never fails.
    pub fn fuse(
        &self,
        symbol: &str,
        bundle: &IndicatorBundle,
        close: f64,
        volume: u64,
        avg_volume: f64,
    ) -> TradingSignal {
        let sub_signals = self.sub_signals(bundle, close, volume, avg_volume);
        let votes = sub_signals.votes();
        let buy = votes.iter().filter(|v| **v == SubSignal::Buy).count() as u8;
        let sell = votes.iter().filter(|v| **v == SubSignal::Sell).count() as u8;

        let (signal_type, agreeing) = if buy > sell {
            (SignalType::Buy, buy)
        } else if sell > buy {
            (SignalType::Sell, sell)
        } else {
            (SignalType::Hold, 0)
        };

        let (confidence, strength) = match signal_type {
            SignalType::Hold => (
                self.config()
                    .hold_confidence
                    .clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
                HOLD_STRENGTH,
            ),
            _ => (
                (BASE_CONFIDENCE + CONFIDENCE_PER_VOTE * agreeing).min(MAX_CONFIDENCE),
                STRENGTH_PER_VOTE * agreeing,
            ),
        };

        let reason = Self::reason(signal_type, &sub_signals);

        debug!(
            symbol = symbol,
            buy = buy,
            sell = sell,
            "Fused {} signal",
            signal_type.label()
        );

        TradingSignal {
            signal_type,
            symbol: symbol.to_string(),
            confidence,
            reason,
            strength,
            sub_signals,
        }
    }

    /// Derive the per-indicator votes.
    pub fn sub_signals(
        &self,
        bundle: &IndicatorBundle,
        close: f64,
        volume: u64,
        avg_volume: f64,
    ) -> SubSignals {
        let config = self.config();

        let rsi_signal = if bundle.rsi < config.rsi_oversold {
            SubSignal::Buy
        } else if bundle.rsi > config.rsi_overbought {
            SubSignal::Sell
        } else {
            SubSignal::Neutral
        };

        let macd_signal = if bundle.macd.macd > bundle.macd.signal {
            SubSignal::Buy
        } else {
            SubSignal::Sell
        };

        let position = if close > bundle.bollinger.upper {
            BollingerPosition::Upper
        } else if close < bundle.bollinger.lower {
            BollingerPosition::Lower
        } else {
            BollingerPosition::Middle
        };
        let bollinger_signal = match position {
            BollingerPosition::Lower => SubSignal::Buy,
            BollingerPosition::Upper => SubSignal::Sell,
            BollingerPosition::Middle => SubSignal::Neutral,
        };

        let ma_signal = if close > bundle.sma20 && bundle.sma20 > bundle.sma50 {
            SubSignal::Buy
        } else if close < bundle.sma20 && bundle.sma20 < bundle.sma50 {
            SubSignal::Sell
        } else {
            SubSignal::Neutral
        };

        let volume = volume as f64;
        let volume_signal = if avg_volume <= 0.0 {
            VolumeSignal::Normal
        } else if volume > avg_volume * config.volume_high_ratio {
            VolumeSignal::High
        } else if volume < avg_volume * config.volume_low_ratio {
            VolumeSignal::Low
        } else {
            VolumeSignal::Normal
        };

        SubSignals {
            rsi: ValuedSubSignal {
                value: bundle.rsi.round(),
                signal: rsi_signal,
            },
            macd: ValuedSubSignal {
                value: (bundle.macd.macd * 100.0).round() / 100.0,
                signal: macd_signal,
            },
            bollinger: BollingerSubSignal {
                position,
                signal: bollinger_signal,
            },
            moving_average: MovingAverageSubSignal { signal: ma_signal },
            volume: VolumeSubSignal {
                signal: volume_signal,
            },
        }
    }

    fn reason(signal_type: SignalType, sub_signals: &SubSignals) -> String {
        let Some(vote) = signal_type.agreeing_vote() else {
            return HOLD_REASON.to_string();
        };

        let explanations = match vote {
            SubSignal::Buy => [
                "RSI oversold rebound",
                "MACD bullish cross",
                "Bollinger lower band bounce",
                "Price above moving averages",
            ],
            _ => [
                "RSI overbought",
                "MACD bearish cross",
                "Bollinger upper band touch",
                "Price below moving averages",
            ],
        };

        sub_signals
            .votes()
            .iter()
            .zip(explanations)
            .filter(|(v, _)| **v == vote)
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_bars;
    use crate::types::{BollingerValue, MacdValue, StochasticValue};

    fn bundle(rsi: f64, macd: f64, signal: f64, lower: f64, upper: f64, sma20: f64, sma50: f64) -> IndicatorBundle {
        IndicatorBundle {
            rsi,
            macd: MacdValue::new(macd, signal),
            bollinger: BollingerValue {
                upper,
                middle: (upper + lower) / 2.0,
                lower,
            },
            sma20,
            sma50,
            ema12: 0.0,
            ema26: 0.0,
            stochastic: StochasticValue { k: 50.0, d: 50.0 },
            williams_r: -50.0,
            atr: 1.0,
        }
    }

    #[test]
    fn test_three_buy_one_sell() {
        // RSI oversold, MACD below signal, close under the lower band, close > sma20 > sma50.
        let b = bundle(25.0, -0.5, 0.2, 101.0, 120.0, 95.0, 90.0);
        let signal = SignalFusion::default().fuse("AAPL", &b, 100.0, 1_000, 1_000.0);
        assert_eq!(signal.signal_type, SignalType::Buy);
        assert_eq!(signal.confidence, 90);
        assert_eq!(signal.strength, 75);
        assert_eq!(
            signal.reason,
            "RSI oversold rebound, Bollinger lower band bounce, Price above moving averages"
        );
        assert_eq!(signal.sub_signals.macd.signal, SubSignal::Sell);
    }

    #[test]
    fn test_tie_is_hold() {
        // RSI neutral, MACD bullish, inside the bands, price below a falling average.
        let b = bundle(50.0, 1.0, 0.5, 90.0, 110.0, 105.0, 110.0);
        let signal = SignalFusion::default().fuse("MSFT", &b, 100.0, 1_000, 1_000.0);
        assert_eq!(signal.signal_type, SignalType::Hold);
        assert_eq!(signal.confidence, 60);
        assert_eq!(signal.strength, 50);
        assert_eq!(signal.reason, HOLD_REASON);
    }

    #[test]
    fn test_single_sell_vote() {
        let b = bundle(50.0, -1.0, 0.0, 90.0, 110.0, 100.0, 100.0);
        let signal = SignalFusion::default().fuse("TSLA", &b, 100.0, 1_000, 1_000.0);
        assert_eq!(signal.signal_type, SignalType::Sell);
        assert_eq!(signal.confidence, 70);
        assert_eq!(signal.strength, 25);
        assert_eq!(signal.reason, "MACD bearish cross");
    }

    #[test]
    fn test_hold_confidence_is_configurable() {
        let config = EngineConfig {
            hold_confidence: 55,
            ..Default::default()
        };
        let b = bundle(50.0, 1.0, 0.5, 90.0, 110.0, 105.0, 110.0);
        let signal = SignalFusion::new(config).fuse("X", &b, 100.0, 0, 0.0);
        assert_eq!(signal.confidence, 55);
    }

    #[test]
    fn test_hold_confidence_is_bounded() {
        let b = bundle(50.0, 1.0, 0.5, 90.0, 110.0, 105.0, 110.0);
        for (configured, expected) in [(200, 90), (10, 50)] {
            let config = EngineConfig {
                hold_confidence: configured,
                ..Default::default()
            };
            let signal = SignalFusion::new(config).fuse("X", &b, 100.0, 0, 0.0);
            assert_eq!(signal.signal_type, SignalType::Hold);
            assert_eq!(signal.confidence, expected);
        }
    }

    #[test]
    fn test_volume_qualifier() {
        let fusion = SignalFusion::default();
        let b = bundle(50.0, 1.0, 0.5, 90.0, 110.0, 100.0, 100.0);
        let high = fusion.sub_signals(&b, 100.0, 2_000, 1_000.0);
        let low = fusion.sub_signals(&b, 100.0, 400, 1_000.0);
        let normal = fusion.sub_signals(&b, 100.0, 1_000, 1_000.0);
        let no_average = fusion.sub_signals(&b, 100.0, 1_000, 0.0);
        assert_eq!(high.volume.signal, VolumeSignal::High);
        assert_eq!(low.volume.signal, VolumeSignal::Low);
        assert_eq!(normal.volume.signal, VolumeSignal::Normal);
        assert_eq!(no_average.volume.signal, VolumeSignal::Normal);
    }

    #[test]
    fn test_sub_signal_values_are_rounded() {
        let b = bundle(34.567, 1.23456, 0.5, 90.0, 110.0, 100.0, 100.0);
        let subs = SignalFusion::default().sub_signals(&b, 100.0, 1_000, 1_000.0);
        assert_eq!(subs.rsi.value, 35.0);
        assert_eq!(subs.macd.value, 1.23);
    }

    #[test]
    fn test_confidence_and_strength_bounds() {
        let fusion = SignalFusion::default();
        for bars in [
            test_bars::uptrend(80),
            test_bars::downtrend(80),
            test_bars::choppy(80),
            test_bars::flat(80, 10.0),
            test_bars::uptrend(3),
        ] {
            let signal = fusion.analyze("TEST", &bars).unwrap();
            assert!((50..=90).contains(&signal.confidence));
            assert!([0, 25, 50, 75, 100].contains(&signal.strength));
        }
    }

    #[test]
    fn test_analyze_empty_series_fails() {
        assert!(SignalFusion::default().analyze("EMPTY", &[]).is_err());
    }

    #[test]
    fn test_downtrend_sells() {
        let signal = SignalFusion::default()
            .analyze("DOWN", &test_bars::downtrend(80))
            .unwrap();
        assert_eq!(signal.signal_type, SignalType::Sell);
        assert_eq!(signal.sub_signals.rsi.signal, SubSignal::Buy);
    }

    #[test]
    fn test_store_path_matches_stateless() {
        let fusion = SignalFusion::default();
        let store = MacdStateStore::new(200);
        let bars = test_bars::choppy(80);
        let stateful = fusion.analyze_with_store("chop", &bars, &store).unwrap();
        let stateless = fusion.analyze("chop", &bars).unwrap();
        assert_eq!(stateful.signal_type, stateless.signal_type);
        assert_eq!(store.history_len("CHOP"), 80);
    }

    #[test]
    fn test_new_store_uses_configured_history() {
        let fusion = SignalFusion::new(EngineConfig {
            macd_history: 20,
            ..Default::default()
        });
        let store = fusion.new_store();
        fusion
            .analyze_with_store("chop", &test_bars::choppy(80), &store)
            .unwrap();
        assert_eq!(store.history_len("CHOP"), 20);
    }
}
