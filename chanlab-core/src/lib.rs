//! Chanlab Core: the signal computation engine.
//!
//! This crate holds every computation that turns price history into a score:
//! - Domain types (daily bars, book snapshots, trade prints)
//! - Indicators (SMA, awesome oscillator)
//! - Chan-theory structure: fractals, strokes, buy points
//! - Chip (cost-basis) distribution, RSRS, wave heuristics
//! - Micro-structure estimators (OFI, VPIN)
//! - Composite scorer and its TOML configuration
//!
//! Everything here is synchronous and free of I/O. Each call borrows an
//! immutable series and returns a fresh result, so independent instruments
//! can be scored on any number of threads.

pub mod chan;
pub mod chip;
pub mod config;
pub mod domain;
pub mod indicators;
pub mod microstructure;
pub mod rsrs;
pub mod scoring;
pub mod wave;

pub use config::{ConfigError, ScoringConfig};
pub use domain::{BookSnapshot, PriceBar, SeriesError, Symbol, TradePrint};
pub use scoring::{
    analyze_daily, analyze_intraday, AnalysisError, CompositeScorer, IntradayResult, ScoreResult,
};
