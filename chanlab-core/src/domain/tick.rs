//! Intraday inputs: top-of-book snapshots and trade prints.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Best bid/ask at one instant. Snapshots are consumed in timestamp order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub timestamp: NaiveDateTime,
    pub bid_price: f64,
    pub bid_qty: f64,
    pub ask_price: f64,
    pub ask_qty: f64,
}

/// A single executed trade. No side label: direction comes from the tick rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePrint {
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub volume: f64,
}
