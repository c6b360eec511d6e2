//! Serializable scoring configuration.
//!
//! Every threshold and weight the composite scorer uses lives here, with
//! defaults equal to the standard rule set. All tables are
//! `#[serde(default)]`, so a TOML file only needs the values it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chip::ChipParams;
use crate::microstructure::VpinParams;
use crate::rsrs::RsrsParams;
use crate::wave::WaveParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse scoring TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize scoring config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid scoring config: {0}")]
    Invalid(String),
}

/// Points awarded (or deducted) by each daily rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRules {
    /// |rsrs_score| above this moves the score by `rsrs_points`.
    pub rsrs_threshold: f64,
    pub rsrs_points: i32,
    pub chip_high_profit: f64,
    pub chip_high_points: i32,
    pub chip_mid_profit: f64,
    pub chip_mid_points: i32,
    /// Concentration strictly below this counts as concentrated.
    pub concentration_max: f64,
    pub concentration_points: i32,
    pub buy2_points: i32,
    pub buy3_points: i32,
    pub wave3_points: i32,
    /// Deducted when a bearish divergence is flagged.
    pub divergence_penalty: i32,
    pub trend_points: i32,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            rsrs_threshold: 0.7,
            rsrs_points: 30,
            chip_high_profit: 0.9,
            chip_high_points: 20,
            chip_mid_profit: 0.5,
            chip_mid_points: 10,
            concentration_max: 0.15,
            concentration_points: 10,
            buy2_points: 25,
            buy3_points: 30,
            wave3_points: 15,
            divergence_penalty: 20,
            trend_points: 5,
        }
    }
}

/// Moving-average alignment filter: short MA above long MA adds points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendFilter {
    pub short_period: usize,
    pub long_period: usize,
}

impl Default for TrendFilter {
    fn default() -> Self {
        Self {
            short_period: 20,
            long_period: 60,
        }
    }
}

/// Intraday confirmation thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntradayRules {
    /// OFI strictly above this confirms buying pressure.
    pub ofi_threshold: f64,
    /// VPIN at or above this raises a toxicity alert.
    pub vpin_alert: f64,
    pub vpin: VpinParams,
}

impl Default for IntradayRules {
    fn default() -> Self {
        Self {
            ofi_threshold: 0.0,
            vpin_alert: 0.7,
            vpin: VpinParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Daily analysis needs at least this many bars.
    pub min_daily_bars: usize,
    pub rsrs: RsrsParams,
    pub chip: ChipParams,
    pub wave: WaveParams,
    pub trend: TrendFilter,
    pub rules: ScoreRules,
    pub intraday: IntradayRules,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_daily_bars: 60,
            rsrs: RsrsParams::default(),
            chip: ChipParams::default(),
            wave: WaveParams::default(),
            trend: TrendFilter::default(),
            rules: ScoreRules::default(),
            intraday: IntradayRules::default(),
        }
    }
}

impl ScoringConfig {
    /// Parse and validate a scoring config from TOML.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject parameter combinations no component can evaluate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.rsrs.n < 2 {
            return invalid(format!("rsrs.n must be >= 2, got {}", self.rsrs.n));
        }
        if self.rsrs.m == 0 {
            return invalid("rsrs.m must be >= 1".into());
        }
        if self.chip.window == 0 {
            return invalid("chip.window must be >= 1".into());
        }
        if !(self.chip.decay.is_finite() && self.chip.decay >= 0.0) {
            return invalid(format!("chip.decay must be >= 0, got {}", self.chip.decay));
        }
        if self.wave.fast == 0 || self.wave.fast >= self.wave.slow {
            return invalid(format!(
                "wave.fast must be in 1..wave.slow, got fast={} slow={}",
                self.wave.fast, self.wave.slow
            ));
        }
        if self.trend.short_period == 0 || self.trend.short_period >= self.trend.long_period {
            return invalid(format!(
                "trend.short_period must be in 1..trend.long_period, got short={} long={}",
                self.trend.short_period, self.trend.long_period
            ));
        }
        if self.trend.long_period > self.min_daily_bars {
            return invalid(format!(
                "trend.long_period ({}) exceeds min_daily_bars ({})",
                self.trend.long_period, self.min_daily_bars
            ));
        }
        if self.intraday.vpin.bucket_volume <= 0.0 || self.intraday.vpin.window_buckets == 0 {
            return invalid("intraday.vpin needs a positive bucket_volume and window_buckets".into());
        }
        Ok(())
    }
}
