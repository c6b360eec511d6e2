//! Stroke ("bi") construction from fractals.
//!
//! Fractals are scanned in order with a single pending fractal. A fractal of
//! the same kind as the pending one replaces it only when more extreme
//! (higher Top, lower Bottom); an opposite-kind fractal closes a stroke from
//! the pending fractal and becomes the new pending one. No minimum bar
//! distance between fractals is enforced.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::fractal::{AnnotatedBars, Fractal, FractalKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeDirection {
    /// Bottom to Top.
    Up,
    /// Top to Bottom.
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub start_index: usize,
    pub start_date: NaiveDate,
    pub start_price: f64,
    pub end_index: usize,
    pub end_date: NaiveDate,
    pub end_price: f64,
    pub direction: StrokeDirection,
}

impl Stroke {
    fn between(from: &Fractal, to: &Fractal) -> Self {
        let direction = match from.kind {
            FractalKind::Top => StrokeDirection::Down,
            FractalKind::Bottom => StrokeDirection::Up,
        };
        Self {
            start_index: from.index,
            start_date: from.date,
            start_price: from.price,
            end_index: to.index,
            end_date: to.date,
            end_price: to.price,
            direction,
        }
    }

    /// Signed price distance covered by the stroke.
    pub fn span(&self) -> f64 {
        self.end_price - self.start_price
    }
}

fn more_extreme(candidate: &Fractal, pending: &Fractal) -> bool {
    match candidate.kind {
        FractalKind::Top => candidate.price > pending.price,
        FractalKind::Bottom => candidate.price < pending.price,
    }
}

/// Build the alternating stroke sequence from an annotated series.
pub fn build_strokes(annotated: &AnnotatedBars<'_>) -> Vec<Stroke> {
    let mut strokes = Vec::new();
    let mut pending: Option<Fractal> = None;

    for fractal in annotated.fractals() {
        match pending.take() {
            None => pending = Some(fractal),
            Some(current) if current.kind == fractal.kind => {
                pending = Some(if more_extreme(&fractal, &current) {
                    fractal
                } else {
                    current
                });
            }
            Some(current) => {
                strokes.push(Stroke::between(&current, &fractal));
                pending = Some(fractal);
            }
        }
    }

    strokes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chan::fractal::detect_fractals;
    use crate::domain::PriceBar;
    use crate::indicators::make_bars;

    /// Bars whose highs and lows both follow `levels`, so peaks are Tops and
    /// troughs are Bottoms.
    fn zigzag(levels: &[f64]) -> Vec<PriceBar> {
        let mut bars = make_bars(levels);
        for (bar, &level) in bars.iter_mut().zip(levels) {
            bar.high = level + 0.5;
            bar.low = level - 0.5;
        }
        bars
    }

    #[test]
    fn alternating_fractals_form_strokes() {
        // Top at 2, Bottom at 4, Top at 6
        let bars = zigzag(&[10.0, 11.0, 15.0, 12.0, 8.0, 11.0, 14.0, 13.0]);
        let annotated = detect_fractals(&bars);
        let strokes = build_strokes(&annotated);

        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0].direction, StrokeDirection::Down);
        assert_eq!(strokes[0].start_price, 15.5);
        assert_eq!(strokes[0].end_price, 7.5);
        assert_eq!(strokes[1].direction, StrokeDirection::Up);
        assert_eq!(strokes[1].start_index, strokes[0].end_index);
        assert_eq!(strokes[1].end_price, 14.5);
        assert!(strokes[0].span() < 0.0);
    }

    #[test]
    fn same_kind_keeps_more_extreme() {
        // Top at 1 (12), Top at 3 (14) with no bottom between, then Bottom at 5.
        let mut bars = zigzag(&[10.0, 12.0, 11.0, 14.0, 10.0, 6.0, 9.0]);
        // Keep bar 2's low above its neighbours so it does not form a Bottom.
        bars[2].low = 11.5;
        let annotated = detect_fractals(&bars);
        assert_eq!(annotated.mark(1), Some(FractalKind::Top));
        assert_eq!(annotated.mark(3), Some(FractalKind::Top));

        let strokes = build_strokes(&annotated);
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].start_index, 3);
        assert_eq!(strokes[0].start_price, 14.5);
    }

    #[test]
    fn less_extreme_duplicate_is_dropped() {
        let mut bars = zigzag(&[10.0, 14.0, 11.0, 12.0, 10.0, 6.0, 9.0]);
        bars[2].low = 11.5;
        let strokes = build_strokes(&detect_fractals(&bars));
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].start_index, 1);
    }

    #[test]
    fn later_extreme_moves_next_stroke_start() {
        // Top@1, Bottom@2, lower Bottom@5, Top@7; bars 3, 4 and 6 are unmarked.
        let levels = [
            (10.0, 8.0),
            (14.0, 9.0),
            (11.0, 6.0),
            (11.0, 7.0),
            (10.0, 5.0),
            (9.0, 4.0),
            (12.0, 6.0),
            (15.0, 8.0),
            (13.0, 9.0),
        ];
        let mut bars = make_bars(&[10.0; 9]);
        for (bar, &(high, low)) in bars.iter_mut().zip(&levels) {
            bar.high = high;
            bar.low = low;
        }
        let annotated = detect_fractals(&bars);
        let marked: Vec<(usize, FractalKind)> =
            annotated.fractals().map(|f| (f.index, f.kind)).collect();
        assert_eq!(
            marked,
            vec![
                (1, FractalKind::Top),
                (2, FractalKind::Bottom),
                (5, FractalKind::Bottom),
                (7, FractalKind::Top),
            ]
        );

        let strokes = build_strokes(&annotated);
        assert_eq!(strokes.len(), 2);
        assert_eq!((strokes[0].start_index, strokes[0].end_index), (1, 2));
        assert_eq!(strokes[0].end_price, 6.0);
        // The lower Bottom replaced the one that closed the first stroke.
        assert_eq!((strokes[1].start_index, strokes[1].end_index), (5, 7));
        assert_eq!(strokes[1].start_price, 4.0);
        assert_eq!(strokes[1].direction, StrokeDirection::Up);
    }

    #[test]
    fn no_fractals_no_strokes() {
        let bars = zigzag(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(build_strokes(&detect_fractals(&bars)).is_empty());
    }
}
