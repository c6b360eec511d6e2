//! # Order Flow Imbalance (OFI)
//!
//! Level-1 order flow imbalance after Cont, Kukanov and Stoikov (2014),
//! "The Price Impact of Order Book Events".
//!
//! For each step, bid-side flow is the new queue when the bid rose, the queue
//! change when it held, and minus the old queue when it fell. Ask-side flow
//! mirrors that (a falling ask adds flow). Net OFI is bid flow minus ask flow;
//! the first snapshot has no predecessor and contributes nothing.

use crate::domain::BookSnapshot;

/// Flow contributed by one side of the book between two snapshots.
///
/// `improved` is true when the price moved toward the other side of the book
/// (bid up, ask down).
fn side_flow(price: f64, qty: f64, prev_price: f64, prev_qty: f64, improved: bool) -> f64 {
    if price == prev_price {
        qty - prev_qty
    } else if improved {
        qty
    } else {
        -prev_qty
    }
}

/// Net OFI between two consecutive snapshots.
pub fn step_ofi(prev: &BookSnapshot, cur: &BookSnapshot) -> f64 {
    let e_bid = side_flow(
        cur.bid_price,
        cur.bid_qty,
        prev.bid_price,
        prev.bid_qty,
        cur.bid_price > prev.bid_price,
    );
    let e_ask = side_flow(
        cur.ask_price,
        cur.ask_qty,
        prev.ask_price,
        prev.ask_qty,
        cur.ask_price < prev.ask_price,
    );
    e_bid - e_ask
}

/// Per-snapshot OFI; element 0 is always 0.
pub fn ofi_series(snapshots: &[BookSnapshot]) -> Vec<f64> {
    if snapshots.is_empty() {
        return Vec::new();
    }
    std::iter::once(0.0)
        .chain(snapshots.windows(2).map(|w| step_ofi(&w[0], &w[1])))
        .collect()
}

/// Cumulative OFI over the window. Fewer than two snapshots yields 0.
pub fn compute_ofi(snapshots: &[BookSnapshot]) -> f64 {
    if snapshots.len() < 2 {
        return 0.0;
    }
    snapshots.windows(2).map(|w| step_ofi(&w[0], &w[1])).sum()
}
