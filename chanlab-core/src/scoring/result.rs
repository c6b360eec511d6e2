//! Result records produced by the composite scorer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::chan::BuyPoints;
use crate::chip::ChipSummary;
use crate::domain::Symbol;
use crate::rsrs::RsrsState;
use crate::wave::WaveState;

/// Reason recorded when the series is below the daily minimum.
pub const INSUFFICIENT_DATA: &str = "Insufficient data";

/// Daily components that can fall back to a neutral contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Rsrs,
    Chip,
    Chan,
    Wave,
    Trend,
}

/// Raw outputs of every daily component, kept for inspection and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub rsrs: RsrsState,
    pub chip: ChipSummary,
    pub buy_points: BuyPoints,
    pub stroke_count: usize,
    pub wave: WaveState,
    /// Short and long moving averages of the close; `None` before warmup.
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
}

/// Outcome of `analyze_daily` for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub symbol: Symbol,
    /// Date of the latest bar; `None` only for an empty series.
    pub date: Option<NaiveDate>,
    pub close: f64,
    /// Additive score; `None` when the series is too short to score.
    pub score: Option<i32>,
    pub signal_buy: bool,
    /// Human-readable contributions, in evaluation order.
    pub reasons: Vec<String>,
    /// `None` when the series is too short to score.
    pub components: Option<ComponentScores>,
    /// Components that returned a neutral fallback.
    pub insufficient: Vec<ComponentKind>,
}

impl ScoreResult {
    pub(crate) fn insufficient_data(symbol: Symbol, date: Option<NaiveDate>, close: f64) -> Self {
        Self {
            symbol,
            date,
            close,
            score: None,
            signal_buy: false,
            reasons: vec![INSUFFICIENT_DATA.to_string()],
            components: None,
            insufficient: vec![
                ComponentKind::Rsrs,
                ComponentKind::Chip,
                ComponentKind::Chan,
                ComponentKind::Wave,
                ComponentKind::Trend,
            ],
        }
    }

    /// True when the series was long enough to be scored at all.
    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }

    /// Score with insufficient data counted as 0.
    pub fn score_or_zero(&self) -> i32 {
        self.score.unwrap_or(0)
    }
}

/// Outcome of `analyze_intraday`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntradayResult {
    /// Carried over from the daily result, when one was supplied.
    pub symbol: Option<Symbol>,
    /// True when order flow shows buying pressure.
    pub confirmed: bool,
    pub ofi: f64,
    /// `None` when no trade prints were supplied.
    pub vpin: Option<f64>,
    pub toxicity_alert: bool,
    pub notes: Vec<String>,
}
