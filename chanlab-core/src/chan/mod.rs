//! Chan-theory swing structure: fractals → strokes → buy points.
//!
//! The stages run strictly in that order; each consumes the previous stage's
//! output and borrows the caller's bar series.

pub mod buy_point;
pub mod fractal;
pub mod stroke;

pub use buy_point::{classify_buy_points, BuyCheck, BuyPoints, MIN_STROKES};
pub use fractal::{detect_fractals, AnnotatedBars, Fractal, FractalKind};
pub use stroke::{build_strokes, Stroke, StrokeDirection};

use crate::domain::PriceBar;

/// Run the full fractal → stroke → buy-point pipeline on a bar series.
pub fn analyze_structure(bars: &[PriceBar]) -> (Vec<Stroke>, BuyPoints) {
    let annotated = detect_fractals(bars);
    let strokes = build_strokes(&annotated);
    let current_price = bars.last().map_or(0.0, |b| b.close);
    let buy_points = classify_buy_points(&strokes, current_price);
    (strokes, buy_points)
}
