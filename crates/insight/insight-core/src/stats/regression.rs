//! Simple linear regression with a point prediction.

use insight_spi::{AnalysisError, DateAlignedSeries, RegressionResult, Result};

use super::descriptive::{is_constant, mean};
use super::transform::calendar_trend;

/// Fit `y = slope * x + intercept` and predict at `x_future`.
pub fn linear_regression(x: &[f64], y: &[f64], x_future: f64) -> Result<RegressionResult> {
    if x.len() != y.len() {
        return Err(AnalysisError::invalid(
            "y",
            format!("length {} does not match x length {}", y.len(), x.len()),
        ));
    }
    if x.len() < 2 {
        return Err(AnalysisError::insufficient(2, x.len()));
    }
    if is_constant(x) {
        return Err(AnalysisError::degenerate("zero variance in x"));
    }
    if !x_future.is_finite() {
        return Err(AnalysisError::invalid("x_future", "must be finite"));
    }

    let mean_x = mean(x)?;
    let mean_y = mean(y)?;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        sxy += (xi - mean_x) * (yi - mean_y);
        sxx += (xi - mean_x).powi(2);
    }
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    Ok(build_result(x, y, slope, intercept, x_future))
}

/// Fit value against calendar day offset and predict `horizon_days` past
/// the last observation.
pub fn trend_regression(series: &DateAlignedSeries, horizon_days: i64) -> Result<RegressionResult> {
    if series.len() < 2 {
        return Err(AnalysisError::insufficient(2, series.len()));
    }
    let (slope, intercept) = calendar_trend(series)?;
    let x: Vec<f64> = match series.first_date() {
        Some(origin) => series
            .points()
            .iter()
            .map(|p| p.date.signed_duration_since(origin).num_days() as f64)
            .collect(),
        None => Vec::new(),
    };
    let last = x.last().copied().unwrap_or(0.0);
    Ok(build_result(&x, &series.values(), slope, intercept, last + horizon_days as f64))
}

fn build_result(x: &[f64], y: &[f64], slope: f64, intercept: f64, x_future: f64) -> RegressionResult {
    let mean_y = y.iter().sum::<f64>() / y.len() as f64;
    let ss_tot: f64 = y.iter().map(|v| (v - mean_y).powi(2)).sum();
    let ss_res: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(xi, yi)| (yi - (intercept + slope * xi)).powi(2))
        .sum();
    let r_squared = if ss_tot > 1e-10 {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    } else {
        1.0
    };

    RegressionResult {
        slope,
        intercept,
        r_squared,
        x_future,
        prediction: intercept + slope * x_future,
        description: describe(slope, intercept, r_squared),
    }
}

fn describe(slope: f64, intercept: f64, r_squared: f64) -> String {
    let sign = if intercept < 0.0 { '-' } else { '+' };
    format!(
        "y = {:.4}x {} {:.4} (R² = {:.4})",
        slope,
        sign,
        intercept.abs(),
        r_squared
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_linear_regression_exact() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [3.0, 5.0, 7.0, 9.0];
        let fit = linear_regression(&x, &y, 10.0).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert!((fit.prediction - 21.0).abs() < 1e-10);
        assert_eq!(fit.description, "y = 2.0000x + 1.0000 (R² = 1.0000)");
    }

    #[test]
    fn test_linear_regression_negative_intercept() {
        let fit = linear_regression(&[0.0, 1.0, 2.0], &[-3.0, -1.0, 1.0], 3.0).unwrap();
        assert_eq!(fit.description, "y = 2.0000x - 3.0000 (R² = 1.0000)");
        assert!((fit.prediction - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_regression_r_squared() {
        let fit = linear_regression(&[0.0, 1.0, 2.0, 3.0], &[0.0, 2.0, 1.0, 3.0], 4.0).unwrap();
        // ss_tot = 5, ss_res = 1.8
        assert!((fit.r_squared - 0.64).abs() < 1e-12);
    }

    #[test]
    fn test_linear_regression_rejects_constant_x() {
        let result = linear_regression(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0], 1.0);
        assert!(matches!(result, Err(AnalysisError::DegenerateInput(_))));
    }

    #[test]
    fn test_linear_regression_needs_two_points() {
        assert!(linear_regression(&[1.0], &[1.0], 2.0).is_err());
    }

    #[test]
    fn test_trend_regression_uses_calendar_days() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = DateAlignedSeries::from_pairs(
            "sales",
            vec![
                (start, 100.0),
                (NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), 104.0),
                (NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(), 110.0),
            ],
        )
        .unwrap();
        let fit = trend_regression(&series, 4).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-10);
        assert_eq!(fit.x_future, 9.0);
        assert!((fit.prediction - 118.0).abs() < 1e-9);
    }
}
