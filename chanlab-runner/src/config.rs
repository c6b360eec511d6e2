//! Serializable scan configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use chanlab_core::config::ScoringConfig;

/// Symbols scanned when neither the config nor the provider supplies a universe.
pub const FALLBACK_UNIVERSE: [&str; 3] = ["000001", "600519", "000858"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scan TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("scoring config: {0}")]
    Scoring(#[from] chanlab_core::config::ConfigError),

    #[error("failed to encode config: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid scan config: {0}")]
    Invalid(String),
}

/// Everything needed to reproduce a scan, apart from the as-of date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Symbols to scan; empty means "ask the provider, then fall back".
    pub universe: Vec<String>,
    /// Calendar days of history requested per symbol.
    pub lookback_days: u32,
    /// Concurrent fetch/score workers (bounded by provider rate limits).
    pub max_workers: usize,
    /// Upper bound on symbols per scan.
    pub max_symbols: usize,
    /// Results scoring strictly above this are candidates.
    pub min_score: i32,
    pub top_n: usize,
    pub scoring: ScoringConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            universe: Vec::new(),
            lookback_days: 700,
            max_workers: 5,
            max_symbols: 50,
            min_score: 50,
            top_n: 10,
            scoring: ScoringConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Parse and validate a scan config from TOML.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_workers == 0 {
            return Err(ConfigError::Invalid("max_workers must be >= 1".into()));
        }
        if self.max_symbols == 0 {
            return Err(ConfigError::Invalid("max_symbols must be >= 1".into()));
        }
        if (self.lookback_days as usize) < self.scoring.min_daily_bars {
            return Err(ConfigError::Invalid(format!(
                "lookback_days ({}) cannot cover min_daily_bars ({})",
                self.lookback_days, self.scoring.min_daily_bars
            )));
        }
        if let Some(blank) = self.universe.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("universe entry {blank} is blank")));
        }
        self.scoring.validate()?;
        Ok(())
    }

    /// Deterministic content hash of this configuration.
    ///
    /// Two scans with equal configs share a fingerprint, so reports can be
    /// matched to the parameters that produced them.
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_string(self)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}
