//! Domain types for ChanLab

pub mod bar;
pub mod tick;

pub use bar::{validate_series, PriceBar, SeriesError};
pub use tick::{BookSnapshot, TradePrint};

/// Symbol type alias
pub type Symbol = String;
