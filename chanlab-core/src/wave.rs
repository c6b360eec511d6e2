//! Elliott-wave heuristics on the awesome oscillator.
//!
//! Over the trailing window:
//! - wave 3: the oscillator is positive and at least `wave3_ratio` of its
//!   window maximum (strong, sustained momentum);
//! - divergence: the close is within `price_tolerance` of the window's highest
//!   close while the oscillator is positive but at most `divergence_ratio` of
//!   its maximum (price strength not confirmed, wave-5 risk).
//!
//! Wave-4 pullbacks are not detected.

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;
use crate::indicators::{AwesomeOscillator, Indicator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    pub min_bars: usize,
    /// Trailing window for oscillator/price extremes.
    pub window: usize,
    pub fast: usize,
    pub slow: usize,
    pub wave3_ratio: f64,
    pub divergence_ratio: f64,
    /// Close must be at least `(1 - price_tolerance)` of the window high.
    pub price_tolerance: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            min_bars: 50,
            window: 50,
            fast: 5,
            slow: 34,
            wave3_ratio: 0.8,
            divergence_ratio: 0.7,
            price_tolerance: 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveStatus {
    /// Not enough bars to evaluate.
    Unknown,
    Neutral,
    Bullish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveState {
    pub status: WaveStatus,
    pub is_wave3: bool,
    pub divergence: bool,
    /// Oscillator crossed from negative to positive on the latest bar.
    pub zero_cross_up: bool,
    pub ao: f64,
    pub ao_max: f64,
    pub ao_min: f64,
    pub desc: String,
}

impl WaveState {
    fn unknown() -> Self {
        Self {
            status: WaveStatus::Unknown,
            is_wave3: false,
            divergence: false,
            zero_cross_up: false,
            ao: 0.0,
            ao_max: 0.0,
            ao_min: 0.0,
            desc: "Not enough data".to_string(),
        }
    }
}

/// Evaluate the wave state of the latest bar with default parameters.
pub fn analyze_wave_structure(bars: &[PriceBar]) -> WaveState {
    analyze_wave_structure_with(bars, &WaveParams::default())
}

pub fn analyze_wave_structure_with(bars: &[PriceBar], params: &WaveParams) -> WaveState {
    if bars.len() < params.min_bars.max(2) || params.fast == 0 || params.fast >= params.slow {
        return WaveState::unknown();
    }

    let ao = AwesomeOscillator::new(params.fast, params.slow).compute(bars);
    let n = ao.len();
    let last_ao = ao[n - 1];
    if last_ao.is_nan() {
        return WaveState::unknown();
    }
    let prev_ao = ao[n - 2];

    let start = n.saturating_sub(params.window.max(1));
    let (ao_max, ao_min) = ao[start..]
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f64::NEG_INFINITY, f64::INFINITY), |(hi, lo), &v| {
            (hi.max(v), lo.min(v))
        });
    let price_max = bars[start..]
        .iter()
        .map(|b| b.close)
        .fold(f64::NEG_INFINITY, f64::max);
    let close = bars[n - 1].close;

    let mut state = WaveState {
        status: WaveStatus::Neutral,
        is_wave3: false,
        divergence: false,
        zero_cross_up: prev_ao < 0.0 && last_ao > 0.0,
        ao: last_ao,
        ao_max,
        ao_min,
        desc: String::new(),
    };

    if last_ao > 0.0 && last_ao >= ao_max * params.wave3_ratio {
        state.status = WaveStatus::Bullish;
        state.is_wave3 = true;
        state
            .desc
            .push_str("Strong AO Momentum (Potential Wave 3). ");
    }

    if close >= price_max * (1.0 - params.price_tolerance)
        && last_ao > 0.0
        && last_ao <= ao_max * params.divergence_ratio
    {
        state.divergence = true;
        state
            .desc
            .push_str("Bearish Divergence (Price High but AO Weak). ");
    }

    state
}
