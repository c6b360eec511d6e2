//! Market data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over upstream sources so the scanner
//! can run against a live feed, a fixture, or the synthetic generator. Any
//! login or connection state lives in the provider's `Session`, which the
//! caller opens once and passes to every fetch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily bar as reported upstream, before normalization.
///
/// `turnover_pct` is a percentage (2.5 == 2.5% of float traded); ingestion
/// converts it to the fraction the engine expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub turnover_pct: f64,
    pub pct_change: f64,
}

/// Structured error types for provider operations.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("login rejected by provider: {0}")]
    LoginFailed(String),

    #[error("session is closed")]
    SessionClosed,

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("provider error: {0}")]
    Other(String),
}

/// Trait for daily market data providers.
pub trait MarketDataProvider: Send + Sync {
    /// Caller-owned connection state, shared read-only across scan workers.
    type Session: Send + Sync;

    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn open_session(&self) -> Result<Self::Session, FetchError>;

    /// Fetch daily bars for a symbol over `start..=end`.
    fn fetch_daily(
        &self,
        session: &Self::Session,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawDailyBar>, FetchError>;

    /// Index constituents the provider can list; empty when unsupported.
    fn list_universe(&self, _session: &Self::Session) -> Result<Vec<String>, FetchError> {
        Ok(Vec::new())
    }
}
