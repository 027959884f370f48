use std::env;
use std::str::FromStr;

/// Indicator periods and fusion thresholds.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RSI lookback (default: 14).
    pub rsi_period: usize,
    /// RSI below this votes BUY (default: 30).
    pub rsi_oversold: f64,
    /// RSI above this votes SELL (default: 70).
    pub rsi_overbought: f64,
    /// Fast EMA period for MACD (default: 12).
    pub macd_fast: usize,
    /// Slow EMA period for MACD (default: 26).
    pub macd_slow: usize,
    /// Signal line EMA period (default: 9).
    pub macd_signal: usize,
    /// Number of MACD values retained per symbol in `MacdState` (default: 64).
    pub macd_history: usize,
    /// Bollinger middle band period (default: 20).
    pub bollinger_period: usize,
    /// Bollinger band width in standard deviations (default: 2.0).
    pub bollinger_k: f64,
    /// Short moving average (default: 20).
    pub sma_short: usize,
    /// Long moving average (default: 50).
    pub sma_long: usize,
    /// Stochastic %K lookback (default: 14).
    pub stochastic_period: usize,
    /// Stochastic %D smoothing (default: 3).
    pub stochastic_smoothing: usize,
    /// Williams %R lookback (default: 14).
    pub williams_period: usize,
    /// ATR lookback (default: 14).
    pub atr_period: usize,
    /// Bars averaged for the volume qualifier (default: 20).
    pub volume_lookback: usize,
    /// Volume above `avg * ratio` is HIGH (default: 1.5).
    pub volume_high_ratio: f64,
    /// Volume below `avg * ratio` is LOW (default: 0.5).
    pub volume_low_ratio: f64,
    /// Confidence reported for HOLD, within 50-90 (default: 60).
    pub hold_confidence: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            macd_history: 64,
            bollinger_period: 20,
            bollinger_k: 2.0,
            sma_short: 20,
            sma_long: 50,
            stochastic_period: 14,
            stochastic_smoothing: 3,
            williams_period: 14,
            atr_period: 14,
            volume_lookback: 20,
            volume_high_ratio: 1.5,
            volume_low_ratio: 0.5,
            hold_confidence: 60,
        }
    }
}

/// VIX level tiers.
#[derive(Debug, Clone)]
pub struct VixThresholds {
    /// Below this is low volatility (default: 12).
    pub low: f64,
    /// Above this is elevated (default: 30).
    pub elevated: f64,
    /// At or above this is critical (default: 40).
    pub high: f64,
}

impl Default for VixThresholds {
    fn default() -> Self {
        Self {
            low: 12.0,
            elevated: 30.0,
            high: 40.0,
        }
    }
}

/// A sector ETF tracked for rotation analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorEtf {
    pub name: String,
    pub symbol: String,
}

impl SectorEtf {
    pub fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

/// Default sector universe (SPDR sector ETFs).
pub fn default_sector_etfs() -> Vec<SectorEtf> {
    vec![
        SectorEtf::new("Technology", "XLK"),
        SectorEtf::new("Financial", "XLF"),
        SectorEtf::new("Healthcare", "XLV"),
        SectorEtf::new("Consumer Discretionary", "XLY"),
        SectorEtf::new("Communication Services", "XLC"),
        SectorEtf::new("Industrial", "XLI"),
        SectorEtf::new("Consumer Staples", "XLP"),
        SectorEtf::new("Energy", "XLE"),
        SectorEtf::new("Utilities", "XLU"),
        SectorEtf::new("Real Estate", "XLRE"),
        SectorEtf::new("Materials", "XLB"),
    ]
}

/// Thresholds for the market alert generator.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    pub vix: VixThresholds,
    /// Absolute VIX point change that counts as a spike (default: 3).
    pub vix_spike_points: f64,
    /// Sectors requested from the market data source.
    pub sectors: Vec<SectorEtf>,
    /// Relative strength spread that signals rotation (default: 5).
    pub rotation_spread: f64,
    /// Absolute 1d sector move (percent) that raises a spike alert (default: 3).
    pub sector_spike_pct: f64,
    /// Absolute 1d sector move (percent) that escalates to WARNING (default: 5).
    pub sector_warning_pct: f64,
    /// Index names averaged for aggregate volatility.
    pub headline_indices: Vec<String>,
    /// Mean absolute index move (percent) that raises a volatility warning (default: 2).
    pub index_volatility_pct: f64,
    /// Current/average volume ratio that counts as anomalous (default: 3).
    pub volume_spike_ratio: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            vix: VixThresholds::default(),
            vix_spike_points: 3.0,
            sectors: default_sector_etfs(),
            rotation_spread: 5.0,
            sector_spike_pct: 3.0,
            sector_warning_pct: 5.0,
            headline_indices: vec![
                "S&P 500".to_string(),
                "NASDAQ".to_string(),
                "DOW".to_string(),
            ],
            index_volatility_pct: 2.0,
            volume_spike_ratio: 3.0,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub engine: EngineConfig,
    pub alerts: AlertConfig,
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let e = EngineConfig::default();
        let a = AlertConfig::default();

        // Format: "Technology|XLK,Energy|XLE"
        let sectors = env::var("ALERT_SECTORS")
            .ok()
            .map(|s| {
                s.split(',')
                    .filter_map(|entry| {
                        let parts: Vec<&str> = entry.split('|').collect();
                        if parts.len() >= 2 {
                            Some(SectorEtf::new(parts[0].trim(), parts[1].trim()))
                        } else {
                            None
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or(a.sectors);

        let headline_indices = env::var("ALERT_HEADLINE_INDICES")
            .ok()
            .map(|s| s.split(',').map(|i| i.trim().to_string()).collect::<Vec<_>>())
            .filter(|v| !v.is_empty())
            .unwrap_or(a.headline_indices);

        Self {
            engine: EngineConfig {
                rsi_period: env_parse("RSI_PERIOD", e.rsi_period),
                rsi_oversold: env_parse("RSI_OVERSOLD", e.rsi_oversold),
                rsi_overbought: env_parse("RSI_OVERBOUGHT", e.rsi_overbought),
                macd_fast: env_parse("MACD_FAST", e.macd_fast),
                macd_slow: env_parse("MACD_SLOW", e.macd_slow),
                macd_signal: env_parse("MACD_SIGNAL", e.macd_signal),
                macd_history: env_parse("MACD_HISTORY", e.macd_history),
                bollinger_period: env_parse("BOLLINGER_PERIOD", e.bollinger_period),
                bollinger_k: env_parse("BOLLINGER_K", e.bollinger_k),
                sma_short: env_parse("SMA_SHORT", e.sma_short),
                sma_long: env_parse("SMA_LONG", e.sma_long),
                stochastic_period: env_parse("STOCHASTIC_PERIOD", e.stochastic_period),
                stochastic_smoothing: env_parse("STOCHASTIC_SMOOTHING", e.stochastic_smoothing),
                williams_period: env_parse("WILLIAMS_PERIOD", e.williams_period),
                atr_period: env_parse("ATR_PERIOD", e.atr_period),
                volume_lookback: env_parse("VOLUME_LOOKBACK", e.volume_lookback),
                volume_high_ratio: env_parse("VOLUME_HIGH_RATIO", e.volume_high_ratio),
                volume_low_ratio: env_parse("VOLUME_LOW_RATIO", e.volume_low_ratio),
                hold_confidence: env_parse("HOLD_CONFIDENCE", e.hold_confidence).clamp(50, 90),
            },
            alerts: AlertConfig {
                vix: VixThresholds {
                    low: env_parse("VIX_LOW", a.vix.low),
                    elevated: env_parse("VIX_ELEVATED", a.vix.elevated),
                    high: env_parse("VIX_HIGH", a.vix.high),
                },
                vix_spike_points: env_parse("VIX_SPIKE_POINTS", a.vix_spike_points),
                sectors,
                rotation_spread: env_parse("SECTOR_ROTATION_SPREAD", a.rotation_spread),
                sector_spike_pct: env_parse("SECTOR_SPIKE_PCT", a.sector_spike_pct),
                sector_warning_pct: env_parse("SECTOR_WARNING_PCT", a.sector_warning_pct),
                headline_indices,
                index_volatility_pct: env_parse("INDEX_VOLATILITY_PCT", a.index_volatility_pct),
                volume_spike_ratio: env_parse("VOLUME_SPIKE_RATIO", a.volume_spike_ratio),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.rsi_period, 14);
        assert_eq!(config.macd_fast, 12);
        assert_eq!(config.macd_slow, 26);
        assert_eq!(config.macd_signal, 9);
        assert_eq!(config.hold_confidence, 60);
    }

    #[test]
    fn test_alert_defaults() {
        let config = AlertConfig::default();
        assert_eq!(config.vix.low, 12.0);
        assert_eq!(config.vix.high, 40.0);
        assert_eq!(config.sectors.len(), 11);
        assert_eq!(config.headline_indices.len(), 3);
    }

    #[test]
    fn test_hold_confidence_from_env_is_clamped() {
        env::set_var("HOLD_CONFIDENCE", "200");
        let config = Config::from_env();
        env::remove_var("HOLD_CONFIDENCE");
        assert_eq!(config.engine.hold_confidence, 90);
    }

    #[test]
    fn test_env_parse_falls_back_on_garbage() {
        assert_eq!(env_parse("AUGUR_TEST_UNSET_KEY", 7usize), 7);
    }
}
