//! Chip (cost-basis) distribution estimated from turnover decay.
//!
//! Shares traded on session i were bought at that session's close. Every
//! later session re-trades a `turnover` fraction of the float, so the mass
//! still held at price[i] is
//!
//! ```text
//! w[i] = t[i] * Π_{j>i} (1 - t[j])
//! ```
//!
//! with the most recent session keeping its whole turnover. Only the last
//! `window` sessions are modelled. The mass bought before the window and never
//! re-traded inside it is `Π_{j in window} (1 - t[j])`; it is reported as
//! `residual_mass`, the upper bound on what truncation discards. The
//! retained weights are renormalized to sum to 1.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

/// Lower/upper percentiles of the concentration band.
const BAND_LOW: f64 = 0.05;
const BAND_HIGH: f64 = 0.95;

/// Concentration reported when no band can be measured. Wide enough that no
/// scoring rule treats it as concentrated.
pub const NEUTRAL_CONCENTRATION: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChipParams {
    /// Multiplier applied to each session's turnover.
    pub decay: f64,
    /// Number of most recent sessions carrying chip mass.
    pub window: usize,
    /// Shorter series produce the neutral summary.
    pub min_bars: usize,
}

impl Default for ChipParams {
    fn default() -> Self {
        Self {
            decay: 1.0,
            window: 300,
            min_bars: 100,
        }
    }
}

/// Mass still held at one session's price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipLot {
    pub date: NaiveDate,
    pub price: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipDistribution {
    lots: Vec<ChipLot>,
    /// Sum of the raw (pre-normalization) weights.
    raw_total: f64,
    residual_mass: f64,
    sufficient: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipSummary {
    /// Mass held strictly below the current price.
    pub profit_ratio: f64,
    /// Weighted mean cost.
    pub avg_cost: f64,
    /// (p95 - p05) / (p05 + p95) * 2; smaller means tighter.
    pub concentration: f64,
    pub cost05: f64,
    pub cost95: f64,
    pub residual_mass: f64,
    /// False when the series was too short or carried no turnover.
    pub sufficient: bool,
}

impl ChipSummary {
    fn neutral(residual_mass: f64) -> Self {
        Self {
            profit_ratio: 0.0,
            avg_cost: 0.0,
            concentration: NEUTRAL_CONCENTRATION,
            cost05: 0.0,
            cost95: 0.0,
            residual_mass,
            sufficient: false,
        }
    }
}

impl ChipDistribution {
    /// Estimate the distribution over the most recent `params.window` sessions.
    pub fn estimate(bars: &[PriceBar], params: &ChipParams) -> Self {
        if bars.len() < params.min_bars || bars.is_empty() {
            return Self {
                lots: Vec::new(),
                raw_total: 0.0,
                residual_mass: 1.0,
                sufficient: false,
            };
        }

        let window = bars.len().min(params.window.max(1));
        let recent = &bars[bars.len() - window..];

        let mut weights = vec![0.0; window];
        // Product of retention over the sessions after i.
        let mut surviving = 1.0;
        for (i, bar) in recent.iter().enumerate().rev() {
            let turnover = bar.turnover * params.decay;
            weights[i] = turnover * surviving;
            surviving *= (1.0 - turnover).clamp(0.0, 1.0);
        }

        let raw_total: f64 = weights.iter().sum();
        if raw_total > 0.0 {
            for w in &mut weights {
                *w /= raw_total;
            }
        }

        let lots = recent
            .iter()
            .zip(weights)
            .map(|(bar, weight)| ChipLot {
                date: bar.date,
                price: bar.close,
                weight,
            })
            .collect();

        Self {
            lots,
            raw_total,
            residual_mass: surviving,
            sufficient: true,
        }
    }

    pub fn lots(&self) -> &[ChipLot] {
        &self.lots
    }

    /// Sum of the normalized weights (1.0 unless degenerate).
    pub fn total_weight(&self) -> f64 {
        self.lots.iter().map(|l| l.weight).sum()
    }

    pub fn raw_total(&self) -> f64 {
        self.raw_total
    }

    pub fn residual_mass(&self) -> f64 {
        self.residual_mass
    }

    pub fn is_degenerate(&self) -> bool {
        !self.sufficient || self.raw_total <= 0.0
    }

    /// Profit ratio, average cost and concentration band relative to `current_price`.
    pub fn summary(&self, current_price: f64) -> ChipSummary {
        if self.is_degenerate() {
            return ChipSummary::neutral(self.residual_mass);
        }

        let profit_ratio = self
            .lots
            .iter()
            .filter(|l| l.price < current_price)
            .map(|l| l.weight)
            .sum();
        let avg_cost = self.lots.iter().map(|l| l.price * l.weight).sum();

        let mut sorted: Vec<(f64, f64)> = self.lots.iter().map(|l| (l.price, l.weight)).collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
        let cost05 = weighted_percentile(&sorted, BAND_LOW);
        let cost95 = weighted_percentile(&sorted, BAND_HIGH);

        let denominator = cost05 + cost95;
        let concentration = if denominator > 0.0 {
            (cost95 - cost05) / denominator * 2.0
        } else {
            NEUTRAL_CONCENTRATION
        };

        ChipSummary {
            profit_ratio,
            avg_cost,
            concentration,
            cost05,
            cost95,
            residual_mass: self.residual_mass,
            sufficient: true,
        }
    }
}

/// Price at the first position whose cumulative weight reaches `q`.
///
/// `sorted` must be ordered by price. Falls back to the highest price when
/// rounding keeps the cumulative sum just below `q`.
fn weighted_percentile(sorted: &[(f64, f64)], q: f64) -> f64 {
    let mut cumulative = 0.0;
    for &(price, weight) in sorted {
        cumulative += weight;
        if cumulative >= q {
            return price;
        }
    }
    sorted.last().map_or(0.0, |&(price, _)| price)
}

/// Estimate the chip distribution and summarize it against the latest close.
pub fn estimate_chip_distribution(bars: &[PriceBar], decay: f64) -> ChipSummary {
    let params = ChipParams {
        decay,
        ..ChipParams::default()
    };
    summarize(bars, &params)
}

/// Same as [`estimate_chip_distribution`] with explicit parameters.
pub fn summarize(bars: &[PriceBar], params: &ChipParams) -> ChipSummary {
    let current_price = bars.last().map_or(0.0, |b| b.close);
    ChipDistribution::estimate(bars, params).summary(current_price)
}
