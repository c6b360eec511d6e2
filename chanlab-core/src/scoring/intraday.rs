//! Intraday confirmation stage.
//!
//! OFI decides confirmation. VPIN runs alongside when trade prints are
//! available and only raises a toxicity alert; it never confirms or vetoes.

use tracing::debug;

use crate::domain::{BookSnapshot, TradePrint};
use crate::microstructure::{compute_ofi, compute_vpin_with};

use super::composite::CompositeScorer;
use super::result::{IntradayResult, ScoreResult};

impl CompositeScorer {
    pub fn analyze_intraday(
        &self,
        snapshots: &[BookSnapshot],
        trades: Option<&[TradePrint]>,
        daily: Option<&ScoreResult>,
    ) -> IntradayResult {
        let rules = &self.config().intraday;
        let symbol = daily.map(|d| d.symbol.clone());
        let mut notes = Vec::new();

        let ofi = compute_ofi(snapshots);
        let confirmed = ofi > rules.ofi_threshold;
        if confirmed {
            notes.push(format!("OFI Positive ({ofi:.2}) - Buying Pressure"));
        } else {
            notes.push(format!("OFI Negative ({ofi:.2}) - Selling Pressure"));
        }

        let vpin = trades.map(|t| compute_vpin_with(t, &rules.vpin));
        let toxicity_alert = vpin.is_some_and(|v| v >= rules.vpin_alert);
        if let Some(v) = vpin {
            if toxicity_alert {
                notes.push(format!("VPIN High ({v:.2}) - Toxic Flow"));
            } else {
                notes.push(format!("VPIN {v:.2}"));
            }
        }

        debug!(
            symbol = symbol.as_deref().unwrap_or(""),
            ofi,
            vpin = vpin.unwrap_or(0.0),
            confirmed,
            toxicity_alert,
            "intraday"
        );

        IntradayResult {
            symbol,
            confirmed,
            ofi,
            vpin,
            toxicity_alert,
            notes,
        }
    }
}
