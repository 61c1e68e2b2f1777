//! Ordinary least squares via the normal equations.

use insight_spi::{AnalysisError, Result};

/// Pivot ratio below which the normal equations are treated as singular.
const SINGULAR_PIVOT_RATIO: f64 = 1e-10;

/// Fitted OLS model.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    /// One coefficient per design column
    pub coefficients: Vec<f64>,
    /// `target - design * coefficients`
    pub residuals: Vec<f64>,
    /// Residual sum of squares
    pub rss: f64,
}

/// Fit `target ~ design` by solving `X'X b = X'y` with a Cholesky
/// factorization.
///
/// `design` holds one row per observation; every row must have the same
/// number of columns. A pivot that is not finite, or not above `1e-10`
/// times its original diagonal entry, marks a singular or near-singular
/// system and yields `DegenerateInput`.
pub fn ols_fit(design: &[Vec<f64>], target: &[f64]) -> Result<OlsFit> {
    let rows = design.len();
    if rows != target.len() {
        return Err(AnalysisError::invalid(
            "target",
            format!("{} values for {} design rows", target.len(), rows),
        ));
    }
    let cols = design.first().map(|r| r.len()).unwrap_or(0);
    if cols == 0 {
        return Err(AnalysisError::invalid("design", "must have at least one column"));
    }
    if design.iter().any(|r| r.len() != cols) {
        return Err(AnalysisError::invalid("design", "rows have differing widths"));
    }
    if rows < cols {
        return Err(AnalysisError::insufficient(cols, rows));
    }

    let mut xtx = vec![vec![0.0; cols]; cols];
    let mut xty = vec![0.0; cols];
    for (row, &y) in design.iter().zip(target.iter()) {
        for i in 0..cols {
            xty[i] += row[i] * y;
            for j in 0..=i {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    let lower = cholesky(&xtx)?;
    let coefficients = cholesky_solve(&lower, &xty);

    let residuals: Vec<f64> = design
        .iter()
        .zip(target.iter())
        .map(|(row, &y)| y - row.iter().zip(&coefficients).map(|(x, b)| x * b).sum::<f64>())
        .collect();
    let rss = residuals.iter().map(|e| e * e).sum();

    Ok(OlsFit {
        coefficients,
        residuals,
        rss,
    })
}

/// Residual sum of squares of `target ~ design`.
pub fn ols_residual_ss(design: &[Vec<f64>], target: &[f64]) -> Result<f64> {
    ols_fit(design, target).map(|fit| fit.rss)
}

/// Lower-triangular factor of a symmetric positive definite matrix.
///
/// Only the lower triangle of `a` is read.
fn cholesky(a: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];

    for j in 0..n {
        let diag = a[j][j];
        let pivot = diag - (0..j).map(|k| l[j][k] * l[j][k]).sum::<f64>();
        if !pivot.is_finite() || pivot <= SINGULAR_PIVOT_RATIO * diag.abs() || pivot <= 0.0 {
            return Err(AnalysisError::degenerate(format!(
                "singular regression design (column {} is collinear)",
                j
            )));
        }
        let root = pivot.sqrt();
        l[j][j] = root;

        for i in (j + 1)..n {
            let dot: f64 = (0..j).map(|k| l[i][k] * l[j][k]).sum();
            l[i][j] = (a[i][j] - dot) / root;
        }
    }

    Ok(l)
}

/// Solve `L L' x = b`.
fn cholesky_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = l.len();

    let mut z = vec![0.0; n];
    for i in 0..n {
        let dot: f64 = (0..i).map(|k| l[i][k] * z[k]).sum();
        z[i] = (b[i] - dot) / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let dot: f64 = ((i + 1)..n).map(|k| l[k][i] * x[k]).sum();
        x[i] = (z[i] - dot) / l[i][i];
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_intercept(xs: &[f64]) -> Vec<Vec<f64>> {
        xs.iter().map(|&x| vec![1.0, x]).collect()
    }

    #[test]
    fn test_exact_line() {
        let design = with_intercept(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        let target = [1.0, 3.0, 5.0, 7.0, 9.0];
        let fit = ols_fit(&design, &target).unwrap();
        assert!((fit.coefficients[0] - 1.0).abs() < 1e-10);
        assert!((fit.coefficients[1] - 2.0).abs() < 1e-10);
        assert!(fit.rss < 1e-18);
    }

    #[test]
    fn test_residual_ss_known_value() {
        // y = x + noise; least squares line through (0,0),(1,2),(2,1),(3,3)
        let design = with_intercept(&[0.0, 1.0, 2.0, 3.0]);
        let target = [0.0, 2.0, 1.0, 3.0];
        let fit = ols_fit(&design, &target).unwrap();
        assert!((fit.coefficients[1] - 0.8).abs() < 1e-12);
        assert!((fit.coefficients[0] - 0.3).abs() < 1e-12);
        assert!((fit.rss - 1.8).abs() < 1e-12);
        assert!((ols_residual_ss(&design, &target).unwrap() - 1.8).abs() < 1e-12);
    }

    #[test]
    fn test_residuals_orthogonal_to_design() {
        let design: Vec<Vec<f64>> = (0..12)
            .map(|i| {
                let t = i as f64;
                vec![1.0, t, (t * 0.7).sin()]
            })
            .collect();
        let target: Vec<f64> = (0..12).map(|i| ((i * 37 % 11) as f64) * 0.5).collect();
        let fit = ols_fit(&design, &target).unwrap();
        for col in 0..3 {
            let dot: f64 = design.iter().zip(&fit.residuals).map(|(r, e)| r[col] * e).sum();
            assert!(dot.abs() < 1e-9);
        }
    }

    #[test]
    fn test_collinear_columns_are_singular() {
        let design: Vec<Vec<f64>> = (0..6).map(|i| vec![1.0, i as f64, 2.0 * i as f64]).collect();
        let target = [1.0, 2.0, 3.0, 5.0, 4.0, 6.0];
        let result = ols_fit(&design, &target);
        assert!(matches!(result, Err(AnalysisError::DegenerateInput(_))));
    }

    #[test]
    fn test_zero_column_is_singular() {
        let design: Vec<Vec<f64>> = (0..5).map(|i| vec![1.0, i as f64, 0.0]).collect();
        let target = [1.0, 2.0, 3.0, 4.0, 6.0];
        assert!(ols_residual_ss(&design, &target).is_err());
    }

    #[test]
    fn test_shape_validation() {
        let design = with_intercept(&[0.0, 1.0, 2.0]);
        assert!(matches!(
            ols_fit(&design, &[1.0, 2.0]),
            Err(AnalysisError::InvalidParameter { .. })
        ));
        let ragged = vec![vec![1.0, 0.0], vec![1.0]];
        assert!(ols_fit(&ragged, &[1.0, 2.0]).is_err());
        let narrow = with_intercept(&[0.0]);
        assert!(matches!(
            ols_fit(&narrow, &[1.0]),
            Err(AnalysisError::InsufficientData { .. })
        ));
    }
}
