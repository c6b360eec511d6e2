//! Fractal detection over 3-bar windows.
//!
//! A Top is a bar whose high is strictly above both neighbours' highs; a
//! Bottom is a bar whose low is strictly below both neighbours' lows. The
//! first and last bars never qualify. A bar meeting both conditions (an
//! outside bar in a noisy, flat stretch) is left unmarked.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractalKind {
    Top,
    Bottom,
}

/// A classified extremum, pointing back into the bar series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fractal {
    pub index: usize,
    pub kind: FractalKind,
    /// The bar's high for a Top, its low for a Bottom.
    pub price: f64,
    pub date: NaiveDate,
}

/// A bar series annotated with one optional fractal mark per bar.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedBars<'a> {
    bars: &'a [PriceBar],
    marks: Vec<Option<FractalKind>>,
}

impl<'a> AnnotatedBars<'a> {
    pub fn bars(&self) -> &'a [PriceBar] {
        self.bars
    }

    pub fn marks(&self) -> &[Option<FractalKind>] {
        &self.marks
    }

    pub fn mark(&self, index: usize) -> Option<FractalKind> {
        self.marks.get(index).copied().flatten()
    }

    /// Marked bars in series order.
    pub fn fractals(&self) -> impl Iterator<Item = Fractal> + '_ {
        self.marks
            .iter()
            .enumerate()
            .filter_map(move |(index, mark)| {
                let kind = (*mark)?;
                let bar = &self.bars[index];
                let price = match kind {
                    FractalKind::Top => bar.high,
                    FractalKind::Bottom => bar.low,
                };
                Some(Fractal {
                    index,
                    kind,
                    price,
                    date: bar.date,
                })
            })
    }

    pub fn fractal_count(&self) -> usize {
        self.marks.iter().filter(|m| m.is_some()).count()
    }
}

/// Mark every interior bar that forms a Top or Bottom fractal.
///
/// Fewer than 3 bars yields an all-unmarked annotation.
pub fn detect_fractals(bars: &[PriceBar]) -> AnnotatedBars<'_> {
    let mut marks = vec![None; bars.len()];

    for i in 1..bars.len().saturating_sub(1) {
        let (prev, cur, next) = (&bars[i - 1], &bars[i], &bars[i + 1]);
        let is_top = cur.high > prev.high && cur.high > next.high;
        let is_bottom = cur.low < prev.low && cur.low < next.low;

        marks[i] = match (is_top, is_bottom) {
            (true, false) => Some(FractalKind::Top),
            (false, true) => Some(FractalKind::Bottom),
            _ => None,
        };
    }

    AnnotatedBars { bars, marks }
}
