//! # VPIN (Volume-Synchronized Probability of Informed Trading)
//!
//! After Easley, López de Prado and O'Hara (2012), "Flow Toxicity and
//! Liquidity in a High-frequency World".
//!
//! Trades are signed with the tick rule, then grouped into fixed-volume
//! buckets: a trade lands in bucket `floor(cumulative_volume / bucket_volume)`
//! with its cumulative volume counted through that trade, and is never split
//! across buckets. VPIN is the summed |buy − sell| over the trailing window of
//! buckets divided by the summed bucket volume.

use serde::{Deserialize, Serialize};

use crate::domain::TradePrint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VpinParams {
    pub bucket_volume: f64,
    pub window_buckets: usize,
}

impl Default for VpinParams {
    fn default() -> Self {
        Self {
            bucket_volume: 10_000.0,
            window_buckets: 50,
        }
    }
}

/// Trade direction inferred from price changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
    /// No price change has been seen yet.
    Unknown,
}

/// Tick-rule classification: up-tick buys, down-tick sells, zero-ticks repeat
/// the last non-zero sign.
pub fn classify_ticks(trades: &[TradePrint]) -> Vec<TradeSide> {
    let mut sides = Vec::with_capacity(trades.len());
    let mut last = TradeSide::Unknown;
    let mut prev_price: Option<f64> = None;

    for trade in trades {
        if let Some(prev) = prev_price {
            if trade.price > prev {
                last = TradeSide::Buy;
            } else if trade.price < prev {
                last = TradeSide::Sell;
            }
        }
        sides.push(last);
        prev_price = Some(trade.price);
    }
    sides
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeBucket {
    pub index: u64,
    pub buy_volume: f64,
    pub sell_volume: f64,
}

impl VolumeBucket {
    pub fn imbalance(&self) -> f64 {
        (self.buy_volume - self.sell_volume).abs()
    }

    /// Classified volume only; unsigned trades are excluded.
    pub fn total(&self) -> f64 {
        self.buy_volume + self.sell_volume
    }
}

/// Group classified trades into volume buckets, in bucket order.
///
/// Buckets that receive no trade (a single large print can jump several
/// bucket indices) are absent.
pub fn volume_buckets(trades: &[TradePrint], bucket_volume: f64) -> Vec<VolumeBucket> {
    if bucket_volume <= 0.0 {
        return Vec::new();
    }

    let sides = classify_ticks(trades);
    let mut buckets: Vec<VolumeBucket> = Vec::new();
    let mut cumulative = 0.0;

    for (trade, side) in trades.iter().zip(sides) {
        cumulative += trade.volume;
        let index = (cumulative / bucket_volume).floor() as u64;

        let needs_new = buckets.last().map_or(true, |b| b.index != index);
        if needs_new {
            buckets.push(VolumeBucket {
                index,
                buy_volume: 0.0,
                sell_volume: 0.0,
            });
        }
        if let Some(bucket) = buckets.last_mut() {
            match side {
                TradeSide::Buy => bucket.buy_volume += trade.volume,
                TradeSide::Sell => bucket.sell_volume += trade.volume,
                TradeSide::Unknown => {}
            }
        }
    }
    buckets
}

/// VPIN over the trailing `window_buckets` buckets.
///
/// Returns 0 when the trades carry less than `window_buckets * bucket_volume`
/// of volume, when fewer than `window_buckets` buckets are populated, or when
/// the window holds no classified volume.
pub fn compute_vpin(trades: &[TradePrint], bucket_volume: f64, window_buckets: usize) -> f64 {
    if window_buckets == 0 || bucket_volume <= 0.0 {
        return 0.0;
    }

    let total_volume: f64 = trades.iter().map(|t| t.volume).sum();
    if total_volume < window_buckets as f64 * bucket_volume {
        return 0.0;
    }

    let buckets = volume_buckets(trades, bucket_volume);
    if buckets.len() < window_buckets {
        return 0.0;
    }

    let recent = &buckets[buckets.len() - window_buckets..];
    let imbalance: f64 = recent.iter().map(VolumeBucket::imbalance).sum();
    let volume: f64 = recent.iter().map(VolumeBucket::total).sum();
    if volume <= 0.0 {
        return 0.0;
    }
    imbalance / volume
}

/// [`compute_vpin`] with explicit parameters.
pub fn compute_vpin_with(trades: &[TradePrint], params: &VpinParams) -> f64 {
    compute_vpin(trades, params.bucket_volume, params.window_buckets)
}
