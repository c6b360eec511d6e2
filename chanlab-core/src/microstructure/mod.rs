//! Intraday micro-structure estimators: order flow imbalance and VPIN.
//!
//! Both take ordered in-memory series and return plain numbers; neither
//! keeps state between calls.

pub mod ofi;
pub mod vpin;

pub use ofi::{compute_ofi, ofi_series, step_ofi};
pub use vpin::{
    classify_ticks, compute_vpin, compute_vpin_with, volume_buckets, TradeSide, VolumeBucket,
    VpinParams,
};
