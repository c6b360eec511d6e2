//! PriceBar: one trading session of daily history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily OHLCV bar for a single symbol, with the session's turnover.
///
/// `turnover` is always a fraction of the float traded in the session
/// (0.025 == 2.5%). Providers that report percentages are normalized at
/// ingestion time, never inside the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub turnover: f64,
    /// Percent change versus the previous close, as reported (1.5 == +1.5%).
    pub pct_change: f64,
}

impl PriceBar {
    /// (high + low) / 2.
    pub fn median_price(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// Returns true if any OHLC field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// Basic OHLC sanity check: high >= low, high >= open/close, low <= open/close.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.close > 0.0
            && self.turnover.is_finite()
            && self.turnover >= 0.0
    }
}

/// A bar series that breaks the caller contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("non-finite price on {date} (bar {index})")]
    NonFinitePrice { index: usize, date: NaiveDate },

    #[error("invalid turnover {turnover} on {date} (bar {index}); expected a non-negative fraction")]
    InvalidTurnover {
        index: usize,
        date: NaiveDate,
        turnover: f64,
    },

    #[error("dates not strictly increasing at bar {index}: {previous} then {date}")]
    NonMonotonicDates {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },
}

/// Check the series contract: finite prices, usable turnover, strictly increasing dates.
///
/// Components never repair a malformed series; callers run this once and
/// report the failure against the specific symbol.
pub fn validate_series(bars: &[PriceBar]) -> Result<(), SeriesError> {
    for (index, bar) in bars.iter().enumerate() {
        if bar.is_void() {
            return Err(SeriesError::NonFinitePrice {
                index,
                date: bar.date,
            });
        }
        if !bar.turnover.is_finite() || bar.turnover < 0.0 {
            return Err(SeriesError::InvalidTurnover {
                index,
                date: bar.date,
                turnover: bar.turnover,
            });
        }
        if index > 0 {
            let previous = bars[index - 1].date;
            if bar.date <= previous {
                return Err(SeriesError::NonMonotonicDates {
                    index,
                    previous,
                    date: bar.date,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> PriceBar {
        PriceBar {
            symbol: "600519".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000,
            turnover: 0.012,
            pct_change: 3.0,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
        assert_eq!(sample_bar().median_price(), 101.5);
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar();
        bar.open = f64::NAN;
        assert!(bar.is_void());
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 97.0;
        assert!(!bar.is_sane());
    }

    #[test]
    fn validate_accepts_increasing_dates() {
        let first = sample_bar();
        let mut second = sample_bar();
        second.date = first.date.succ_opt().unwrap();
        assert!(validate_series(&[first, second]).is_ok());
        assert!(validate_series(&[]).is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_dates() {
        let err = validate_series(&[sample_bar(), sample_bar()]).unwrap_err();
        assert!(matches!(err, SeriesError::NonMonotonicDates { index: 1, .. }));
    }

    #[test]
    fn validate_rejects_negative_turnover() {
        let mut bar = sample_bar();
        bar.turnover = -0.1;
        let err = validate_series(&[bar]).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidTurnover { index: 0, .. }));
    }

    #[test]
    fn validate_rejects_nan_close() {
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        assert!(matches!(
            validate_series(&[bar]),
            Err(SeriesError::NonFinitePrice { index: 0, .. })
        ));
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: PriceBar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
