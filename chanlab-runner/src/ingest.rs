//! Raw provider rows → validated engine bars.
//!
//! Rows are sorted by date, void rows (non-finite prices) are dropped,
//! duplicate dates are rejected, and turnover is converted from percent to a
//! fraction. The result always passes `validate_series`.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use chanlab_core::domain::{validate_series, PriceBar, SeriesError};

use crate::provider::RawDailyBar;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("no usable bars for '{symbol}'")]
    Empty { symbol: String },

    #[error("duplicate date {date} for '{symbol}'")]
    DuplicateDate { symbol: String, date: NaiveDate },

    #[error("series for '{symbol}' is malformed: {source}")]
    Series {
        symbol: String,
        #[source]
        source: SeriesError,
    },
}

/// Normalize a provider response into an engine-ready series.
pub fn ingest(symbol: &str, mut raw: Vec<RawDailyBar>) -> Result<Vec<PriceBar>, IngestError> {
    raw.sort_by_key(|r| r.date);

    if let Some(pair) = raw.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(IngestError::DuplicateDate {
            symbol: symbol.to_string(),
            date: pair[1].date,
        });
    }

    let total = raw.len();
    let bars: Vec<PriceBar> = raw
        .into_iter()
        .filter_map(|r| to_price_bar(symbol, r))
        .collect();
    if bars.len() < total {
        debug!(symbol, dropped = total - bars.len(), "dropped void rows");
    }

    if bars.is_empty() {
        return Err(IngestError::Empty {
            symbol: symbol.to_string(),
        });
    }

    validate_series(&bars).map_err(|source| IngestError::Series {
        symbol: symbol.to_string(),
        source,
    })?;
    Ok(bars)
}

fn to_price_bar(symbol: &str, raw: RawDailyBar) -> Option<PriceBar> {
    let prices = [raw.open, raw.high, raw.low, raw.close];
    if prices.iter().any(|p| !p.is_finite()) {
        return None;
    }
    // A missing turnover reading counts as no turnover.
    let turnover = if raw.turnover_pct.is_finite() {
        raw.turnover_pct / 100.0
    } else {
        0.0
    };
    Some(PriceBar {
        symbol: symbol.to_string(),
        date: raw.date,
        open: raw.open,
        high: raw.high,
        low: raw.low,
        close: raw.close,
        volume: raw.volume,
        turnover,
        pct_change: if raw.pct_change.is_finite() {
            raw.pct_change
        } else {
            0.0
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(day: u32, close: f64, turnover_pct: f64) -> RawDailyBar {
        RawDailyBar {
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            open: close,
            high: close + 0.5,
            low: close - 0.5,
            close,
            volume: 120_000,
            turnover_pct,
            pct_change: 0.0,
        }
    }

    #[test]
    fn converts_percent_turnover_and_sorts() {
        let bars = ingest("600519", vec![raw(3, 11.0, 2.5), raw(2, 10.0, 1.0)]).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert!((bars[0].turnover - 0.01).abs() < 1e-12);
        assert!((bars[1].turnover - 0.025).abs() < 1e-12);
        assert!(bars.iter().all(|b| b.symbol == "600519"));
    }

    #[test]
    fn drops_void_rows() {
        let bars = ingest("000001", vec![raw(2, 10.0, 1.0), raw(3, f64::NAN, 1.0), raw(6, 10.5, 1.0)]).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, 10.5);
    }

    #[test]
    fn missing_turnover_is_zero() {
        let bars = ingest("000001", vec![raw(2, 10.0, f64::NAN)]).unwrap();
        assert_eq!(bars[0].turnover, 0.0);
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = ingest("000858", vec![raw(2, 10.0, 1.0), raw(2, 10.2, 1.0)]).unwrap_err();
        assert!(matches!(err, IngestError::DuplicateDate { .. }));
    }

    #[test]
    fn rejects_negative_turnover() {
        let err = ingest("000858", vec![raw(2, 10.0, 1.0), raw(3, 10.2, -4.0)]).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Series {
                source: SeriesError::InvalidTurnover { index: 1, .. },
                ..
            }
        ));
    }

    #[test]
    fn all_void_is_empty() {
        let err = ingest("000858", vec![raw(2, f64::NAN, 1.0)]).unwrap_err();
        assert!(matches!(err, IngestError::Empty { .. }));
        assert!(matches!(ingest("000858", Vec::new()), Err(IngestError::Empty { .. })));
    }
}
