//! Descriptive statistics and Pearson correlation.

use insight_spi::{AnalysisError, Result};

/// Relative tolerance below which a centered sum of squares counts as zero.
const ZERO_SPREAD_TOLERANCE: f64 = 1e-24;

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(AnalysisError::insufficient(1, 0));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn std_dev(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(AnalysisError::insufficient(2, values.len()));
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Ok((ss / (values.len() - 1) as f64).sqrt())
}

/// Population standard deviation (n denominator).
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Ok((ss / values.len() as f64).sqrt())
}

/// True when the values have no spread beyond rounding noise.
pub fn is_constant(values: &[f64]) -> bool {
    let Ok(m) = mean(values) else {
        return true;
    };
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    let scale: f64 = values.iter().map(|v| v * v).sum();
    ss <= ZERO_SPREAD_TOLERANCE * scale
}

/// Pearson correlation coefficient, clamped to [-1, 1].
///
/// Both inputs must have the same length, at least two values and a
/// non-zero spread.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
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
    if is_constant(y) {
        return Err(AnalysisError::degenerate("zero variance in y"));
    }

    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    Ok((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}
