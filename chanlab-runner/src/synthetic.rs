//! Deterministic synthetic market data.
//!
//! Each symbol gets its own random walk seeded from the BLAKE3 hash of the
//! symbol, so repeated fetches (and repeated scans) return identical bars.
//! Weekends are skipped; holidays are not modeled.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::provider::{FetchError, MarketDataProvider, RawDailyBar};

/// Session handle for the synthetic provider. Carries no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticSession;

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    start_price: f64,
    /// Symbols that answer with `SymbolNotFound`.
    unknown: HashSet<String>,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            start_price: 20.0,
            unknown: HashSet::new(),
        }
    }
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `symbols` fail with `SymbolNotFound`, for exercising error paths.
    pub fn with_unknown<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unknown.extend(symbols.into_iter().map(Into::into));
        self
    }
}

impl MarketDataProvider for SyntheticProvider {
    type Session = SyntheticSession;

    fn name(&self) -> &str {
        "synthetic"
    }

    fn open_session(&self) -> Result<SyntheticSession, FetchError> {
        Ok(SyntheticSession)
    }

    fn fetch_daily(
        &self,
        _session: &SyntheticSession,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawDailyBar>, FetchError> {
        if self.unknown.contains(symbol) {
            return Err(FetchError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        Ok(generate_daily_bars(symbol, start, end, self.start_price))
    }
}

/// Random-walk daily bars for `symbol` over `start..=end`, weekdays only.
pub fn generate_daily_bars(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    start_price: f64,
) -> Vec<RawDailyBar> {
    // Deterministic seed from symbol name
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = start_price;
    let mut current = start;

    while current <= end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);
        let turnover_pct = rng.gen_range(0.2..6.0);

        bars.push(RawDailyBar {
            date: current,
            open,
            high,
            low,
            close,
            volume,
            turnover_pct,
            pct_change: daily_return * 100.0,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}
