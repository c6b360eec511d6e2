//! Structural buy-point classification over the stroke sequence.
//!
//! Only the last three strokes matter. Both implemented setups require the
//! most recent stroke to be a pullback (Down):
//! - Second buy: the pullback low holds above the low that started the
//!   preceding Up stroke (higher low).
//! - Third buy: the pullback low holds above the high that started the Down
//!   stroke before that (break and hold above the prior peak).
//!
//! The first buy depends on momentum divergence, which is not visible in the
//! stroke sequence alone, so it is reported as `NotApplicable`.

use serde::{Deserialize, Serialize};

use super::stroke::{Stroke, StrokeDirection};

/// Minimum number of strokes before any setup is evaluated.
pub const MIN_STROKES: usize = 4;

/// Outcome of a check that may not be decidable from strokes alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuyCheck {
    Triggered,
    NotTriggered,
    NotApplicable,
}

impl BuyCheck {
    pub fn is_triggered(self) -> bool {
        matches!(self, Self::Triggered)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyPoints {
    pub buy1: BuyCheck,
    pub buy2: bool,
    pub buy3: bool,
    /// Which setups fired, with the compared prices substituted.
    pub desc: String,
}

impl BuyPoints {
    fn none() -> Self {
        Self {
            buy1: BuyCheck::NotApplicable,
            buy2: false,
            buy3: false,
            desc: String::new(),
        }
    }

    pub fn any(&self) -> bool {
        self.buy2 || self.buy3 || self.buy1.is_triggered()
    }
}

/// Classify buy setups from the stroke list.
///
/// `_current_price` is accepted for callers that track the live quote; neither
/// implemented setup uses it.
pub fn classify_buy_points(strokes: &[Stroke], _current_price: f64) -> BuyPoints {
    let mut result = BuyPoints::none();
    if strokes.len() < MIN_STROKES {
        return result;
    }

    let last = &strokes[strokes.len() - 1];
    let prev = &strokes[strokes.len() - 2];
    let prev_prev = &strokes[strokes.len() - 3];

    if last.direction != StrokeDirection::Down {
        return result;
    }

    let last_low = last.end_price;

    let prior_low = prev.start_price;
    if last_low > prior_low {
        result.buy2 = true;
        result
            .desc
            .push_str(&format!("Buy 2: Higher Low formed ({last_low} > {prior_low}). "));
    }

    let prior_high = prev_prev.start_price;
    if last_low > prior_high {
        result.buy3 = true;
        result.desc.push_str(&format!(
            "Buy 3: Strong Trend (Low {last_low} > Prev High {prior_high}). "
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stroke(direction: StrokeDirection, start_price: f64, end_price: f64, at: usize) -> Stroke {
        let date = |i: usize| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64);
        Stroke {
            start_index: at,
            start_date: date(at),
            start_price,
            end_index: at + 3,
            end_date: date(at + 3),
            end_price,
            direction,
        }
    }

    /// Up, Down, Up, Down with the given turning prices.
    fn four(points: [f64; 5]) -> Vec<Stroke> {
        vec![
            stroke(StrokeDirection::Up, points[0], points[1], 0),
            stroke(StrokeDirection::Down, points[1], points[2], 3),
            stroke(StrokeDirection::Up, points[2], points[3], 6),
            stroke(StrokeDirection::Down, points[3], points[4], 9),
        ]
    }

    #[test]
    fn higher_low_is_second_buy() {
        let result = classify_buy_points(&four([5.0, 10.0, 6.0, 12.0, 8.0]), 9.0);
        assert!(result.buy2);
        assert!(!result.buy3);
        assert!(result.desc.contains("Buy 2"));
        assert!(result.desc.contains("8 > 6"));
        assert_eq!(result.buy1, BuyCheck::NotApplicable);
    }

    #[test]
    fn low_above_prior_peak_is_third_buy() {
        let result = classify_buy_points(&four([5.0, 10.0, 7.0, 15.0, 11.0]), 12.0);
        assert!(result.buy2);
        assert!(result.buy3);
        assert!(result.desc.contains("Buy 3"));
        assert!(result.any());
    }

    #[test]
    fn lower_low_triggers_nothing() {
        let result = classify_buy_points(&four([5.0, 10.0, 6.0, 12.0, 4.0]), 4.5);
        assert!(!result.any());
        assert!(result.desc.is_empty());
    }

    #[test]
    fn last_stroke_up_triggers_nothing() {
        let mut strokes = four([5.0, 10.0, 6.0, 12.0, 8.0]);
        strokes.push(stroke(StrokeDirection::Up, 8.0, 14.0, 12));
        assert!(!classify_buy_points(&strokes, 14.0).any());
    }

    #[test]
    fn too_few_strokes() {
        let strokes = four([5.0, 10.0, 6.0, 12.0, 8.0]);
        let result = classify_buy_points(&strokes[..3], 8.0);
        assert!(!result.buy2 && !result.buy3);
        assert!(result.desc.is_empty());
    }
}
