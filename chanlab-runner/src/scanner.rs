//! Universe scan: fetch → ingest → score for every symbol, in parallel.
//!
//! Symbols are processed on a private rayon pool sized by
//! `ScanConfig::max_workers`, so provider rate limits hold regardless of the
//! machine's core count. One symbol failing never aborts the scan; its error
//! chain is recorded as a [`ScanFailure`].

use anyhow::Context;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use chanlab_core::scoring::{CompositeScorer, ScoreResult};

use crate::config::{ConfigError, ScanConfig, FALLBACK_UNIVERSE};
use crate::ingest::ingest;
use crate::provider::{FetchError, MarketDataProvider};

/// Errors that stop a scan before any symbol is processed.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open provider session: {0}")]
    Session(#[from] FetchError),

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// A symbol that could not be scored, with its full error chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanFailure {
    pub symbol: String,
    pub reason: String,
}

/// Outcome of one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub provider: String,
    /// Fingerprint of the scan config that produced this report.
    pub config_fingerprint: String,
    pub start: NaiveDate,
    pub as_of: NaiveDate,
    /// Scored symbols (including unscored short histories), ordered by symbol.
    pub results: Vec<ScoreResult>,
    /// Ordered by symbol.
    pub failures: Vec<ScanFailure>,
    pub min_score: i32,
    pub top_n: usize,
}

impl ScanReport {
    /// Results scoring above `min_score` or carrying a buy signal, best first.
    ///
    /// Ties are broken by symbol; at most `top_n` entries are returned.
    pub fn candidates(&self) -> Vec<&ScoreResult> {
        let mut picked: Vec<&ScoreResult> = self
            .results
            .iter()
            .filter(|r| r.score.is_some_and(|s| s > self.min_score) || r.signal_buy)
            .collect();
        picked.sort_by(|a, b| {
            b.score_or_zero()
                .cmp(&a.score_or_zero())
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        picked.truncate(self.top_n);
        picked
    }

    pub fn scanned(&self) -> usize {
        self.results.len() + self.failures.len()
    }
}

/// Runs scans against one provider with one configuration.
pub struct Scanner<P: MarketDataProvider> {
    provider: P,
    config: ScanConfig,
    scorer: CompositeScorer,
    fingerprint: String,
}

impl<P: MarketDataProvider> Scanner<P> {
    pub fn new(provider: P, config: ScanConfig) -> Result<Self, ScanError> {
        config.validate()?;
        let fingerprint = config.fingerprint()?;
        let scorer = CompositeScorer::new(config.scoring.clone()).map_err(ConfigError::from)?;
        Ok(Self {
            provider,
            config,
            scorer,
            fingerprint,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn open_session(&self) -> Result<P::Session, ScanError> {
        Ok(self.provider.open_session()?)
    }

    /// Configured universe, else the provider's listing, else the fallback list.
    pub fn resolve_universe(&self, session: &P::Session) -> Vec<String> {
        if !self.config.universe.is_empty() {
            return self.config.universe.clone();
        }
        match self.provider.list_universe(session) {
            Ok(symbols) if !symbols.is_empty() => symbols,
            Ok(_) => {
                warn!(provider = self.provider.name(), "provider listed no symbols, using fallback universe");
                fallback_universe()
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "universe listing failed, using fallback universe");
                fallback_universe()
            }
        }
    }

    /// Scan `symbols` with history ending at `as_of`.
    ///
    /// At most `max_symbols` symbols are processed, in the order given.
    pub fn scan(
        &self,
        session: &P::Session,
        symbols: &[String],
        as_of: NaiveDate,
    ) -> Result<ScanReport, ScanError> {
        let start = as_of - chrono::Duration::days(i64::from(self.config.lookback_days));
        let selected = &symbols[..symbols.len().min(self.config.max_symbols)];
        if selected.len() < symbols.len() {
            warn!(
                requested = symbols.len(),
                limit = self.config.max_symbols,
                "universe truncated"
            );
        }

        info!(
            provider = self.provider.name(),
            symbols = selected.len(),
            workers = self.config.max_workers,
            %start,
            %as_of,
            "scan started"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_workers)
            .thread_name(|i| format!("chanlab-scan-{i}"))
            .build()?;

        let outcomes: Vec<(String, anyhow::Result<ScoreResult>)> = pool.install(|| {
            selected
                .par_iter()
                .map(|symbol| {
                    let outcome = self.scan_symbol(session, symbol, start, as_of);
                    (symbol.clone(), outcome)
                })
                .collect()
        });

        let mut results = Vec::new();
        let mut failures = Vec::new();
        for (symbol, outcome) in outcomes {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(symbol = %symbol, error = %format!("{e:#}"), "symbol failed");
                    failures.push(ScanFailure {
                        symbol,
                        reason: format!("{e:#}"),
                    });
                }
            }
        }
        results.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        failures.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        let report = ScanReport {
            provider: self.provider.name().to_string(),
            config_fingerprint: self.fingerprint.clone(),
            start,
            as_of,
            results,
            failures,
            min_score: self.config.min_score,
            top_n: self.config.top_n,
        };
        info!(
            scored = report.results.len(),
            failed = report.failures.len(),
            candidates = report.candidates().len(),
            "scan complete"
        );
        Ok(report)
    }

    fn scan_symbol(
        &self,
        session: &P::Session,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<ScoreResult> {
        let raw = self
            .provider
            .fetch_daily(session, symbol, start, end)
            .with_context(|| format!("fetching {symbol}"))?;
        let bars = ingest(symbol, raw).with_context(|| format!("ingesting {symbol}"))?;
        let result = self
            .scorer
            .analyze_daily(&bars)
            .with_context(|| format!("scoring {symbol}"))?;
        Ok(result)
    }
}

fn fallback_universe() -> Vec<String> {
    FALLBACK_UNIVERSE.iter().map(|s| s.to_string()).collect()
}
