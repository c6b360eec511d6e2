//! Composite scoring: daily component fusion and intraday confirmation.

pub mod composite;
pub mod intraday;
pub mod result;

pub use composite::{AnalysisError, CompositeScorer};
pub use result::{ComponentKind, ComponentScores, IntradayResult, ScoreResult, INSUFFICIENT_DATA};

use crate::domain::{BookSnapshot, PriceBar, TradePrint};

/// [`CompositeScorer::analyze_daily`] with the default configuration.
pub fn analyze_daily(bars: &[PriceBar]) -> Result<ScoreResult, AnalysisError> {
    CompositeScorer::default().analyze_daily(bars)
}

/// [`CompositeScorer::analyze_intraday`] with the default configuration.
pub fn analyze_intraday(
    snapshots: &[BookSnapshot],
    trades: Option<&[TradePrint]>,
    daily: Option<&ScoreResult>,
) -> IntradayResult {
    CompositeScorer::default().analyze_intraday(snapshots, trades, daily)
}
