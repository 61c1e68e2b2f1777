//! Lag-shifted date alignment of two series.

use chrono::NaiveDate;
use insight_spi::{DateAlignedSeries, Granularity};

/// Paired values of two series found on matching (shifted) dates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedPairs {
    /// Dates of the `x` observations
    pub dates: Vec<NaiveDate>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Number of pairs found
    pub n: usize,
}

/// Align at a daily lag. See [`align_with`].
pub fn align(x: &DateAlignedSeries, y: &DateAlignedSeries, lag: i32) -> AlignedPairs {
    align_with(x, y, lag, Granularity::Daily)
}

/// Pair each observation of `x` at date `d` with `y` at `d` shifted by
/// `lag` periods of `granularity`.
///
/// A positive lag pairs `x` with `y` observed `lag` periods later, so `x`
/// is the leading series. Dates missing from `y` after shifting are
/// dropped; nothing is interpolated.
pub fn align_with(
    x: &DateAlignedSeries,
    y: &DateAlignedSeries,
    lag: i32,
    granularity: Granularity,
) -> AlignedPairs {
    let mut pairs = AlignedPairs::default();
    for point in x.points() {
        let Some(target_date) = granularity.shift(point.date, lag) else {
            continue;
        };
        if let Some(value) = y.value_on(target_date) {
            pairs.dates.push(point.date);
            pairs.x.push(point.value);
            pairs.y.push(value);
        }
    }
    pairs.n = pairs.x.len();
    pairs
}
