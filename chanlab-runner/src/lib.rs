//! Chanlab Runner: data ingestion and universe scanning.
//!
//! This crate builds on `chanlab-core` to provide:
//! - A market data provider trait with a caller-owned session handle
//! - Normalization of raw provider rows into validated bar series
//! - A deterministic synthetic provider for demos and tests
//! - Bounded-parallel universe scans with candidate ranking
//! - TOML scan configuration with content fingerprints

pub mod config;
pub mod ingest;
pub mod provider;
pub mod scanner;
pub mod synthetic;

pub use config::{ConfigError, ScanConfig, FALLBACK_UNIVERSE};
pub use ingest::{ingest, IngestError};
pub use provider::{FetchError, MarketDataProvider, RawDailyBar};
pub use scanner::{ScanError, ScanFailure, ScanReport, Scanner};
pub use synthetic::{generate_daily_bars, SyntheticProvider, SyntheticSession};
