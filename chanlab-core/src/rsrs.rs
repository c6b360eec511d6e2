//! RSRS: resistance/support relative strength.
//!
//! For every window of `n` consecutive bars, regress high on low by ordinary
//! least squares (with intercept). The latest slope is standardized against
//! the trailing `m` slopes (population std), and the z-score is weighted by
//! the latest r²:
//!
//! ```text
//! rsrs_score = (beta_t - mean(beta)) / std(beta) * r2_t
//! ```
//!
//! The fit is rolled with running sums of x, y, xy, x² and y², so the cost is
//! linear in the series length.

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

/// Slope dispersion below this (relative to the mean slope) counts as zero.
const STD_EPSILON: f64 = 1e-10;
/// Centered sum of squares below this fraction of the raw one is treated as flat.
const FLAT_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsrsParams {
    /// Regression window.
    pub n: usize,
    /// Standardization window (number of trailing slopes).
    pub m: usize,
    /// Extra bars kept beyond `m + n` when truncating history.
    pub margin: usize,
}

impl Default for RsrsParams {
    fn default() -> Self {
        Self {
            n: 18,
            m: 600,
            margin: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RsrsState {
    pub beta: f64,
    pub r2: f64,
    pub z_score: f64,
    pub rsrs_score: f64,
    /// Number of slopes the z-score was computed over (0 when insufficient).
    pub windows: usize,
}

impl RsrsState {
    pub fn is_sufficient(&self) -> bool {
        self.windows > 0
    }
}

/// Slope and r² of one regression window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowFit {
    pub beta: f64,
    pub r2: f64,
}

/// Running sufficient statistics for simple linear regression.
#[derive(Debug, Clone, Copy, Default)]
struct RunningFit {
    count: f64,
    sx: f64,
    sy: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

impl RunningFit {
    fn add(&mut self, x: f64, y: f64) {
        self.count += 1.0;
        self.sx += x;
        self.sy += y;
        self.sxx += x * x;
        self.syy += y * y;
        self.sxy += x * y;
    }

    fn remove(&mut self, x: f64, y: f64) {
        self.count -= 1.0;
        self.sx -= x;
        self.sy -= y;
        self.sxx -= x * x;
        self.syy -= y * y;
        self.sxy -= x * y;
    }

    fn fit(&self) -> WindowFit {
        let n = self.count;
        let var_x = self.sxx - self.sx * self.sx / n;
        let var_y = self.syy - self.sy * self.sy / n;
        let cov = self.sxy - self.sx * self.sy / n;

        // Flat lows (or flat highs) leave the slope or r² undefined.
        if var_x <= FLAT_EPSILON * self.sxx.abs() || var_y <= FLAT_EPSILON * self.syy.abs() {
            return WindowFit { beta: 0.0, r2: 0.0 };
        }

        let beta = cov / var_x;
        let r2 = ((cov * cov) / (var_x * var_y)).clamp(0.0, 1.0);
        WindowFit { beta, r2 }
    }
}

/// Rolling OLS of high on low, one fit per window end-point.
///
/// Returns an empty vector when there are fewer than `n` bars.
pub fn rolling_fits(bars: &[PriceBar], n: usize) -> Vec<WindowFit> {
    if n == 0 || bars.len() < n {
        return Vec::new();
    }

    let mut fits = Vec::with_capacity(bars.len() - n + 1);
    let mut running = RunningFit::default();
    for (i, bar) in bars.iter().enumerate() {
        running.add(bar.low, bar.high);
        if i >= n {
            let leaving = &bars[i - n];
            running.remove(leaving.low, leaving.high);
        }
        if i + 1 >= n {
            fits.push(running.fit());
        }
    }
    fits
}

/// Compute the standardized RSRS score for the latest bar.
pub fn compute_rsrs(bars: &[PriceBar], n: usize, m: usize) -> RsrsState {
    compute_rsrs_with(
        bars,
        &RsrsParams {
            n,
            m,
            ..RsrsParams::default()
        },
    )
}

/// Same as [`compute_rsrs`] with explicit parameters.
pub fn compute_rsrs_with(bars: &[PriceBar], params: &RsrsParams) -> RsrsState {
    let (n, m) = (params.n, params.m.max(1));
    if n == 0 || bars.len() < n + 1 {
        return RsrsState::default();
    }

    // Older windows cannot reach the trailing-m set.
    let keep = m + n + params.margin;
    let history = if bars.len() > keep {
        &bars[bars.len() - keep..]
    } else {
        bars
    };

    let fits = rolling_fits(history, n);
    let Some(latest) = fits.last().copied() else {
        return RsrsState::default();
    };

    let trailing = &fits[fits.len().saturating_sub(m)..];
    let count = trailing.len() as f64;
    let mean = trailing.iter().map(|f| f.beta).sum::<f64>() / count;
    let variance = trailing
        .iter()
        .map(|f| (f.beta - mean).powi(2))
        .sum::<f64>()
        / count;
    let std = variance.sqrt();

    let z_score = if std > STD_EPSILON * mean.abs().max(1.0) {
        (latest.beta - mean) / std
    } else {
        0.0
    };

    RsrsState {
        beta: latest.beta,
        r2: latest.r2,
        z_score,
        rsrs_score: z_score * latest.r2,
        windows: trailing.len(),
    }
}
