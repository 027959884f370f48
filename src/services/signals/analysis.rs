//! Extended stock analysis report: environment, pivots and risk targets.

use crate::types::{
    EnvironmentKind, IndicatorBundle, MarketEnvironment, PivotPoints, PriceBar, RiskTargets,
    SignalType, StockAnalysis, TradingSignal, TrendDirection,
};

/// Strength above which the market is considered trending.
const TRENDING_STRENGTH: u8 = 75;
const STOP_ATR_MULTIPLE: f64 = 2.0;
const TARGET_ATR_MULTIPLE: f64 = 3.0;
const TP1_PCT: f64 = 0.02;
const TP2_PCT: f64 = 0.05;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Classic floor pivots from the bar's high, low and close.
pub fn pivot_points(bar: &PriceBar) -> PivotPoints {
    let pivot = (bar.high + bar.low + bar.close) / 3.0;
    let range = bar.high - bar.low;
    PivotPoints {
        pivot,
        r1: 2.0 * pivot - bar.low,
        s1: 2.0 * pivot - bar.high,
        r2: pivot + range,
        s2: pivot - range,
    }
}

/// ATR-scaled stop and targets around `close`.
pub fn risk_targets(signal_type: SignalType, close: f64, atr: f64) -> RiskTargets {
    let (stop_loss, take_profit_1, take_profit_2, take_profit_3) = match signal_type {
        SignalType::Buy => (
            close - STOP_ATR_MULTIPLE * atr,
            close * (1.0 + TP1_PCT),
            close * (1.0 + TP2_PCT),
            close + TARGET_ATR_MULTIPLE * atr,
        ),
        SignalType::Sell => (
            close + STOP_ATR_MULTIPLE * atr,
            close * (1.0 - TP1_PCT),
            close * (1.0 - TP2_PCT),
            close - TARGET_ATR_MULTIPLE * atr,
        ),
        SignalType::Hold => (
            close - STOP_ATR_MULTIPLE * atr,
            close * (1.0 + TP1_PCT),
            close * (1.0 + TP2_PCT),
            close,
        ),
    };

    let risk = (close - stop_loss).abs();
    let risk_reward_ratio = if risk == 0.0 {
        0.0
    } else {
        round2((take_profit_3 - close).abs() / risk)
    };

    RiskTargets {
        entry_price: close,
        stop_loss,
        take_profit_1: round2(take_profit_1),
        take_profit_2: round2(take_profit_2),
        take_profit_3,
        risk_reward_ratio,
    }
}

/// Build the analysis report for a fused signal.
///
/// `last_bar` must be the bar the signal was computed for.
pub fn build_analysis(
    signal: &TradingSignal,
    bundle: &IndicatorBundle,
    last_bar: &PriceBar,
) -> StockAnalysis {
    let kind = if signal.strength > TRENDING_STRENGTH {
        EnvironmentKind::Trending
    } else {
        EnvironmentKind::Ranging
    };
    let market_environment = MarketEnvironment {
        kind,
        direction: TrendDirection::from(signal.signal_type),
        strength: signal.strength,
    };

    let risk_targets = risk_targets(signal.signal_type, last_bar.close, bundle.atr);
    let subs = &signal.sub_signals;

    let entry = match signal.signal_type {
        SignalType::Buy => "buy",
        SignalType::Sell => "sell",
        SignalType::Hold => "wait",
    };
    let action_plan = vec![
        format!("Entry: {}", entry),
        format!("Target: ${:.2}", risk_targets.take_profit_3),
        format!("Stop loss: ${:.2}", risk_targets.stop_loss),
        "Size positions to the stop distance".to_string(),
        format!("RSI: {} ({})", subs.rsi.value, subs.rsi.signal.label()),
        format!("MACD: {}", subs.macd.signal.label()),
    ];

    StockAnalysis {
        symbol: signal.symbol.clone(),
        recommendation: signal.signal_type,
        confidence: f64::from(signal.confidence) / 100.0,
        reasoning: vec![signal.reason.clone()],
        technical_indicators: subs.clone(),
        market_environment,
        risk_targets,
        pivot_points: pivot_points(last_bar),
        action_plan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_bars;
    use crate::services::signals::SignalFusion;
    use chrono::NaiveDate;

    fn bar(high: f64, low: f64, close: f64) -> PriceBar {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        PriceBar::new(date, close, high, low, close, 1_000)
    }

    #[test]
    fn test_pivot_points() {
        let pivots = pivot_points(&bar(110.0, 90.0, 100.0));
        assert_eq!(pivots.pivot, 100.0);
        assert_eq!(pivots.r1, 110.0);
        assert_eq!(pivots.s1, 90.0);
        assert_eq!(pivots.r2, 120.0);
        assert_eq!(pivots.s2, 80.0);
    }

    #[test]
    fn test_buy_targets() {
        let targets = risk_targets(SignalType::Buy, 100.0, 2.0);
        assert_eq!(targets.entry_price, 100.0);
        assert_eq!(targets.stop_loss, 96.0);
        assert_eq!(targets.take_profit_1, 102.0);
        assert_eq!(targets.take_profit_2, 105.0);
        assert_eq!(targets.take_profit_3, 106.0);
        assert_eq!(targets.risk_reward_ratio, 1.5);
    }

    #[test]
    fn test_sell_targets_are_mirrored() {
        let targets = risk_targets(SignalType::Sell, 100.0, 2.0);
        assert_eq!(targets.stop_loss, 104.0);
        assert_eq!(targets.take_profit_1, 98.0);
        assert_eq!(targets.take_profit_2, 95.0);
        assert_eq!(targets.take_profit_3, 94.0);
        assert_eq!(targets.risk_reward_ratio, 1.5);
    }

    #[test]
    fn test_zero_atr_has_no_risk_reward() {
        let targets = risk_targets(SignalType::Buy, 100.0, 0.0);
        assert_eq!(targets.risk_reward_ratio, 0.0);
        let hold = risk_targets(SignalType::Hold, 100.0, 2.0);
        assert_eq!(hold.take_profit_3, 100.0);
        assert_eq!(hold.risk_reward_ratio, 0.0);
    }

    #[test]
    fn test_build_analysis() {
        let bars = test_bars::downtrend(80);
        let fusion = SignalFusion::default();
        let (bundle, signal) = fusion.analyze_with_bundle("DOWN", &bars).unwrap();
        let analysis = build_analysis(&signal, &bundle, bars.last().unwrap());

        assert_eq!(analysis.symbol, "DOWN");
        assert_eq!(analysis.recommendation, signal.signal_type);
        assert_eq!(analysis.confidence, f64::from(signal.confidence) / 100.0);
        assert_eq!(analysis.reasoning, vec![signal.reason.clone()]);
        assert_eq!(
            analysis.market_environment.direction,
            TrendDirection::from(signal.signal_type)
        );
        assert_eq!(analysis.market_environment.kind, EnvironmentKind::Ranging);
        assert_eq!(analysis.action_plan.len(), 6);
        assert_eq!(analysis.risk_targets.entry_price, bars.last().unwrap().close);
    }
}
