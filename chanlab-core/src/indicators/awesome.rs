//! Awesome Oscillator (AO).
//!
//! SMA(fast) - SMA(slow) of the median price (high + low) / 2.
//! Lookback: slow - 1.

use super::sma::{PriceSource, Sma};
use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct AwesomeOscillator {
    fast: Sma,
    slow: Sma,
    name: String,
}

impl AwesomeOscillator {
    pub fn new(fast: usize, slow: usize) -> Self {
        assert!(fast < slow, "AO fast period must be < slow period");
        Self {
            fast: Sma::with_source(fast, PriceSource::Median),
            slow: Sma::with_source(slow, PriceSource::Median),
            name: format!("ao_{fast}_{slow}"),
        }
    }
}

impl Default for AwesomeOscillator {
    fn default() -> Self {
        Self::new(5, 34)
    }
}

impl Indicator for AwesomeOscillator {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.slow.lookback()
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let fast = self.fast.compute(bars);
        let slow = self.slow.compute(bars);
        fast.iter().zip(&slow).map(|(f, s)| f - s).collect()
    }
}
