//! Daily composite scoring.
//!
//! Each component contributes additively; a component that cannot be
//! evaluated contributes nothing and is listed in
//! [`ScoreResult::insufficient`].

use thiserror::Error;
use tracing::{debug, warn};

use crate::chan::{analyze_structure, MIN_STROKES};
use crate::chip;
use crate::config::{ConfigError, ScoringConfig};
use crate::domain::{validate_series, PriceBar, SeriesError};
use crate::indicators::{latest, Indicator, Sma};
use crate::rsrs::compute_rsrs_with;
use crate::wave::{analyze_wave_structure_with, WaveStatus};

use super::result::{ComponentKind, ComponentScores, ScoreResult};

/// A bar series the scorer refuses to evaluate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("malformed bar series: {0}")]
    Series(#[from] SeriesError),

    #[error("bar {index} belongs to '{found}', expected '{expected}'")]
    MixedSymbols {
        index: usize,
        expected: String,
        found: String,
    },
}

/// Combines the daily components (and the intraday confirmation stage) under
/// one [`ScoringConfig`].
///
/// The config is validated on construction, so every period the components
/// build indicators from is non-zero.
#[derive(Debug, Clone, Default)]
pub struct CompositeScorer {
    config: ScoringConfig,
}

impl CompositeScorer {
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score the latest bar of a daily series.
    ///
    /// Malformed input is an error. A series shorter than
    /// `min_daily_bars` is not: it yields a result with `score: None`.
    pub fn analyze_daily(&self, bars: &[PriceBar]) -> Result<ScoreResult, AnalysisError> {
        validate_series(bars)?;
        check_single_symbol(bars)?;

        let last = bars.last();
        let symbol = last.map(|b| b.symbol.clone()).unwrap_or_default();
        let date = last.map(|b| b.date);
        let close = last.map_or(0.0, |b| b.close);

        if bars.len() < self.config.min_daily_bars {
            warn!(
                symbol = %symbol,
                bars = bars.len(),
                required = self.config.min_daily_bars,
                "series too short for daily scoring"
            );
            return Ok(ScoreResult::insufficient_data(symbol, date, close));
        }

        let rules = &self.config.rules;
        let mut score = 0i32;
        let mut signal_buy = false;
        let mut reasons = Vec::new();
        let mut insufficient = Vec::new();

        let rsrs = compute_rsrs_with(bars, &self.config.rsrs);
        debug!(symbol = %symbol, beta = rsrs.beta, r2 = rsrs.r2, rsrs_score = rsrs.rsrs_score, "rsrs");
        if !rsrs.is_sufficient() {
            warn!(symbol = %symbol, "rsrs fell back to neutral");
            insufficient.push(ComponentKind::Rsrs);
        }
        if rsrs.rsrs_score > rules.rsrs_threshold {
            score += rules.rsrs_points;
            reasons.push(format!("RSRS Strong ({:.2})", rsrs.rsrs_score));
        } else if rsrs.rsrs_score < -rules.rsrs_threshold {
            score -= rules.rsrs_points;
            reasons.push(format!("RSRS Weak ({:.2})", rsrs.rsrs_score));
        }

        let chip = chip::summarize(bars, &self.config.chip);
        debug!(
            symbol = %symbol,
            profit_ratio = chip.profit_ratio,
            concentration = chip.concentration,
            residual_mass = chip.residual_mass,
            "chip"
        );
        if !chip.sufficient {
            warn!(symbol = %symbol, "chip distribution fell back to neutral");
            insufficient.push(ComponentKind::Chip);
        }
        if chip.profit_ratio > rules.chip_high_profit {
            score += rules.chip_high_points;
            reasons.push(format!(
                "Chip: High Profit Ratio (>{:.0}%)",
                rules.chip_high_profit * 100.0
            ));
        } else if chip.profit_ratio > rules.chip_mid_profit {
            score += rules.chip_mid_points;
            reasons.push(format!(
                "Chip: Moderate Profit Ratio (>{:.0}%)",
                rules.chip_mid_profit * 100.0
            ));
        }
        if chip.concentration < rules.concentration_max {
            score += rules.concentration_points;
            reasons.push("Chip: Highly Concentrated".to_string());
        }

        let (strokes, buy_points) = analyze_structure(bars);
        debug!(symbol = %symbol, strokes = strokes.len(), buy2 = buy_points.buy2, buy3 = buy_points.buy3, "chan");
        if strokes.len() < MIN_STROKES {
            insufficient.push(ComponentKind::Chan);
        }
        if buy_points.buy2 {
            score += rules.buy2_points;
            signal_buy = true;
            reasons.push("Chan: Buy 2 Point".to_string());
        }
        if buy_points.buy3 {
            score += rules.buy3_points;
            signal_buy = true;
            reasons.push("Chan: Buy 3 Point (Strong Breakout)".to_string());
        }

        let wave = analyze_wave_structure_with(bars, &self.config.wave);
        debug!(symbol = %symbol, ao = wave.ao, is_wave3 = wave.is_wave3, divergence = wave.divergence, "wave");
        if wave.status == WaveStatus::Unknown {
            warn!(symbol = %symbol, "wave analysis fell back to unknown");
            insufficient.push(ComponentKind::Wave);
        }
        if wave.is_wave3 {
            score += rules.wave3_points;
            reasons.push("Wave: Potential Wave 3".to_string());
        }
        if wave.divergence {
            score -= rules.divergence_penalty;
            reasons.push("Wave: Bearish Divergence (Risk)".to_string());
        }

        let trend = &self.config.trend;
        let ma_short = latest(&Sma::new(trend.short_period).compute(bars));
        let ma_long = latest(&Sma::new(trend.long_period).compute(bars));
        match (ma_short, ma_long) {
            (Some(short), Some(long)) => {
                if short > long {
                    score += rules.trend_points;
                    reasons.push(format!(
                        "Trend: MA{} above MA{}",
                        trend.short_period, trend.long_period
                    ));
                }
            }
            _ => insufficient.push(ComponentKind::Trend),
        }

        debug!(symbol = %symbol, score, signal_buy, "daily score");

        Ok(ScoreResult {
            symbol,
            date,
            close,
            score: Some(score),
            signal_buy,
            reasons,
            components: Some(ComponentScores {
                rsrs,
                chip,
                buy_points,
                stroke_count: strokes.len(),
                wave,
                ma_short,
                ma_long,
            }),
            insufficient,
        })
    }
}

fn check_single_symbol(bars: &[PriceBar]) -> Result<(), AnalysisError> {
    let Some(first) = bars.first() else {
        return Ok(());
    };
    match bars.iter().position(|b| b.symbol != first.symbol) {
        Some(index) => Err(AnalysisError::MixedSymbols {
            index,
            expected: first.symbol.clone(),
            found: bars[index].symbol.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreRules;
    use crate::indicators::make_bars;
    use crate::scoring::result::INSUFFICIENT_DATA;

    fn uptrend(len: usize) -> Vec<PriceBar> {
        let closes: Vec<f64> = (0..len).map(|i| 20.0 + i as f64 * 0.1).collect();
        make_bars(&closes)
    }

    #[test]
    fn short_series_is_unscored() {
        let result = CompositeScorer::default()
            .analyze_daily(&make_bars(&[10.0; 59]))
            .unwrap();
        assert_eq!(result.score, None);
        assert!(!result.signal_buy);
        assert_eq!(result.reasons, vec![INSUFFICIENT_DATA.to_string()]);
        assert!(result.components.is_none());
        assert_eq!(result.symbol, "TEST");
    }

    #[test]
    fn empty_series_is_unscored() {
        let result = CompositeScorer::default().analyze_daily(&[]).unwrap();
        assert_eq!(result.score, None);
        assert_eq!(result.date, None);
        assert_eq!(result.score_or_zero(), 0);
    }

    #[test]
    fn malformed_series_is_an_error() {
        let mut bars = uptrend(80);
        bars[40].close = f64::NAN;
        let err = CompositeScorer::default().analyze_daily(&bars).unwrap_err();
        assert!(matches!(err, AnalysisError::Series(SeriesError::NonFinitePrice { index: 40, .. })));
    }

    #[test]
    fn mixed_symbols_are_rejected() {
        let mut bars = uptrend(80);
        bars[10].symbol = "OTHER".to_string();
        let err = CompositeScorer::default().analyze_daily(&bars).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MixedSymbols {
                index: 10,
                expected: "TEST".to_string(),
                found: "OTHER".to_string(),
            }
        );
    }

    #[test]
    fn steady_uptrend_collects_trend_and_profit_points() {
        let bars = uptrend(120);
        let result = CompositeScorer::default().analyze_daily(&bars).unwrap();

        assert!(result.is_scored());
        let components = result.components.as_ref().unwrap();
        assert!(components.ma_short.unwrap() > components.ma_long.unwrap());
        assert!(result.reasons.iter().any(|r| r == "Trend: MA20 above MA60"));
        // Every past close is below the latest one.
        assert!(components.chip.profit_ratio > 0.9);
        assert!(result.reasons.iter().any(|r| r.starts_with("Chip: High Profit Ratio")));
        // Monotone closes leave no pullback strokes.
        assert!(!result.signal_buy);
        assert!(result.insufficient.contains(&ComponentKind::Chan));
        assert_eq!(result.date, bars.last().map(|b| b.date));
    }

    #[test]
    fn chip_below_minimum_is_flagged() {
        let result = CompositeScorer::default().analyze_daily(&uptrend(80)).unwrap();
        assert!(result.insufficient.contains(&ComponentKind::Chip));
        let chip = &result.components.as_ref().unwrap().chip;
        assert!(!chip.sufficient);
        assert_eq!(chip.profit_ratio, 0.0);
        assert!(!result.reasons.iter().any(|r| r.starts_with("Chip")));
    }

    #[test]
    fn signal_buy_tracks_buy_points() {
        let mut closes: Vec<f64> = (0..40).map(|i| 30.0 - i as f64 * 0.05).collect();
        closes.extend([27.0, 26.0, 25.0, 24.0, 25.0, 26.0, 27.0, 28.0, 29.0, 30.0]);
        closes.extend([31.0, 32.0, 31.0, 29.0, 27.0, 26.0, 25.5, 26.5, 28.0, 30.0]);
        closes.extend([32.0, 33.0, 34.0, 33.0, 31.0, 29.5, 29.0, 30.0]);
        let bars = make_bars(&closes);
        let result = CompositeScorer::default().analyze_daily(&bars).unwrap();
        let components = result.components.as_ref().unwrap();
        assert_eq!(result.signal_buy, components.buy_points.any());
        if components.buy_points.buy2 {
            assert!(result.reasons.iter().any(|r| r == "Chan: Buy 2 Point"));
        }
    }

    #[test]
    fn custom_weights_are_applied() {
        let mut config = ScoringConfig::default();
        config.rules.trend_points = 50;
        let result = CompositeScorer::new(config)
            .unwrap()
            .analyze_daily(&uptrend(120))
            .unwrap();
        let baseline = CompositeScorer::default().analyze_daily(&uptrend(120)).unwrap();
        assert_eq!(result.score.unwrap() - baseline.score.unwrap(), 45);
    }

    #[test]
    fn zero_periods_are_rejected_at_construction() {
        let mut config = ScoringConfig::default();
        config.trend.short_period = 0;
        assert!(matches!(CompositeScorer::new(config), Err(ConfigError::Invalid(_))));

        let mut config = ScoringConfig::default();
        config.wave.fast = 0;
        assert!(matches!(CompositeScorer::new(config), Err(ConfigError::Invalid(_))));
    }

    /// Score of `bars` with default rules, minus the score with `zero` applied.
    fn rule_delta(bars: &[PriceBar], zero: impl Fn(&mut ScoreRules)) -> (i32, ScoreResult) {
        let result = CompositeScorer::default().analyze_daily(bars).unwrap();
        let mut config = ScoringConfig::default();
        zero(&mut config.rules);
        let without = CompositeScorer::new(config)
            .unwrap()
            .analyze_daily(bars)
            .unwrap();
        (result.score.unwrap() - without.score.unwrap(), result)
    }

    /// Every high sits one above its low, except the last bar's which is
    /// shifted by `shift`. Only the final regression window sees the shift.
    fn rsrs_breakout(shift: f64) -> Vec<PriceBar> {
        let mut bars = make_bars(&vec![20.0; 120]);
        for (i, bar) in bars.iter_mut().enumerate() {
            bar.low = 20.0 + i as f64 * 0.2;
            bar.high = bar.low + 1.0;
            bar.open = bar.low + 0.5;
            bar.close = bar.low + 0.5;
        }
        let last = bars.len() - 1;
        bars[last].high += shift;
        bars
    }

    #[test]
    fn rsrs_breakout_scores_strong() {
        let (delta, result) = rule_delta(&rsrs_breakout(0.5), |r| r.rsrs_points = 0);
        assert_eq!(delta, 30);
        let rsrs = &result.components.as_ref().unwrap().rsrs;
        assert!(rsrs.rsrs_score > 0.7, "rsrs_score = {}", rsrs.rsrs_score);
        assert!(result.reasons.iter().any(|r| r.starts_with("RSRS Strong (")));
    }

    #[test]
    fn rsrs_breakdown_scores_weak() {
        let (delta, result) = rule_delta(&rsrs_breakout(-0.4), |r| r.rsrs_points = 0);
        assert_eq!(delta, -30);
        let rsrs = &result.components.as_ref().unwrap().rsrs;
        assert!(rsrs.rsrs_score < -0.7, "rsrs_score = {}", rsrs.rsrs_score);
        assert!(result.reasons.iter().any(|r| r.starts_with("RSRS Weak (")));
    }

    #[test]
    fn tight_high_turnover_tail_is_concentrated() {
        let mut closes: Vec<f64> = (0..100)
            .map(|i| 20.0 + 10.0 * (i as f64 * 0.3).sin())
            .collect();
        closes.extend((0..20).map(|k| 30.0 + k as f64 * 0.01));
        let mut bars = make_bars(&closes);
        for bar in &mut bars[100..] {
            bar.turnover = 0.5;
        }

        let (delta, result) = rule_delta(&bars, |r| r.concentration_points = 0);
        assert_eq!(delta, 10);
        let chip = &result.components.as_ref().unwrap().chip;
        assert!(chip.concentration < 0.15, "concentration = {}", chip.concentration);
        assert!(result.reasons.iter().any(|r| r == "Chip: Highly Concentrated"));
    }

    #[test]
    fn accelerating_rally_scores_wave3() {
        let closes: Vec<f64> = (0..80).map(|i| 10.0 + (i as f64 * 0.05).powi(2)).collect();
        let (delta, result) = rule_delta(&make_bars(&closes), |r| r.wave3_points = 0);
        assert_eq!(delta, 15);
        assert!(result.components.as_ref().unwrap().wave.is_wave3);
        assert!(result.reasons.iter().any(|r| r == "Wave: Potential Wave 3"));
    }

    #[test]
    fn stalling_rally_is_penalized_for_divergence() {
        let mut closes: Vec<f64> = vec![10.0; 20];
        closes.extend((0..30).map(|i| 10.0 + i as f64 * 0.5));
        closes.extend((0..30).map(|i| 24.5 + i as f64 * 0.02));
        let (delta, result) = rule_delta(&make_bars(&closes), |r| r.divergence_penalty = 0);
        assert_eq!(delta, -20);
        assert!(result.components.as_ref().unwrap().wave.divergence);
        assert!(result
            .reasons
            .iter()
            .any(|r| r == "Wave: Bearish Divergence (Risk)"));
    }
}
