//! Stationarity-inducing series transforms.

use insight_api::SeriesTransform;
use insight_spi::{AnalysisError, DateAlignedSeries, Result};

use super::descriptive::mean;

/// Change from the previous observation, dated at the later observation.
///
/// Differences are taken between consecutive observations even across
/// missing dates.
pub fn first_difference(series: &DateAlignedSeries) -> Result<DateAlignedSeries> {
    if series.len() < 2 {
        return Err(AnalysisError::insufficient(2, series.len()));
    }
    let points = series.points();
    let dates: Vec<_> = points[1..].iter().map(|p| p.date).collect();
    let values: Vec<f64> = points.windows(2).map(|w| w[1].value - w[0].value).collect();
    series.with_values(&dates, &values)
}

/// Residuals of a least-squares line fitted against calendar time.
///
/// Time is the day offset from the first observation, so gaps keep their
/// true spacing.
pub fn detrend(series: &DateAlignedSeries) -> Result<DateAlignedSeries> {
    if series.len() < 2 {
        return Err(AnalysisError::insufficient(2, series.len()));
    }
    let (slope, intercept) = calendar_trend(series)?;
    let origin = series.points()[0].date;

    let dates = series.dates();
    let values: Vec<f64> = series
        .points()
        .iter()
        .map(|p| {
            let t = p.date.signed_duration_since(origin).num_days() as f64;
            p.value - (intercept + slope * t)
        })
        .collect();
    series.with_values(&dates, &values)
}

/// Apply `transform`, returning a new series.
pub fn apply_transform(
    series: &DateAlignedSeries,
    transform: SeriesTransform,
) -> Result<DateAlignedSeries> {
    match transform {
        SeriesTransform::None => Ok(series.clone()),
        SeriesTransform::FirstDifference => first_difference(series),
        SeriesTransform::Detrend => detrend(series),
    }
}

/// Slope and intercept of value against day offset from the first date.
pub(crate) fn calendar_trend(series: &DateAlignedSeries) -> Result<(f64, f64)> {
    let origin = series
        .first_date()
        .ok_or_else(|| AnalysisError::insufficient(2, 0))?;
    let t: Vec<f64> = series
        .points()
        .iter()
        .map(|p| p.date.signed_duration_since(origin).num_days() as f64)
        .collect();
    let y = series.values();

    let mean_t = mean(&t)?;
    let mean_y = mean(&y)?;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (ti, yi) in t.iter().zip(y.iter()) {
        sxy += (ti - mean_t) * (yi - mean_y);
        sxx += (ti - mean_t).powi(2);
    }
    if sxx <= 0.0 {
        return Err(AnalysisError::degenerate("all observations share one date"));
    }
    let slope = sxy / sxx;
    Ok((slope, mean_y - slope * mean_t))
}
