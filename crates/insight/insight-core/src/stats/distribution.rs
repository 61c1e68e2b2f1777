//! Student-t and F distribution functions.
//!
//! Both are evaluated through the regularized incomplete beta function,
//! computed by a continued fraction over a Lanczos log-gamma.

use insight_spi::{AnalysisError, Result};

/// Lanczos coefficients for g = 7, n = 9.
#[allow(clippy::excessive_precision)]
const LANCZOS: [f64; 9] = [
    0.99999999999980993,
    676.5203681218851,
    -1259.1392167224028,
    771.32342877765313,
    -176.61502916214059,
    12.507343278686905,
    -0.13857109526572012,
    9.9843695780195716e-6,
    1.5056327351493116e-7,
];
const LANCZOS_G: f64 = 7.0;

const CF_MAX_ITER: usize = 300;
const CF_EPSILON: f64 = 1e-15;
const CF_TINY: f64 = 1e-300;

/// Natural log of |Gamma(x)|.
pub fn ln_gamma(x: f64) -> f64 {
    use std::f64::consts::PI;

    if x < 0.5 {
        // Reflection: Gamma(x) Gamma(1 - x) = pi / sin(pi x)
        let sin_val = (PI * x).sin();
        if sin_val.abs() < 1e-300 {
            return f64::INFINITY;
        }
        return PI.ln() - sin_val.abs().ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = LANCZOS[0];
    for (i, &c) in LANCZOS.iter().enumerate().skip(1) {
        sum += c / (x + i as f64);
    }

    let t = x + LANCZOS_G + 0.5;
    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}

/// Regularized incomplete beta function I_x(a, b).
///
/// Requires `a > 0`, `b > 0` and `x` in [0, 1]; returns NaN otherwise.
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if !(a > 0.0 && b > 0.0) || !(0.0..=1.0).contains(&x) {
        return f64::NAN;
    }
    if x == 0.0 {
        return 0.0;
    }
    if x == 1.0 {
        return 1.0;
    }

    // The continued fraction converges fast only below the mean
    if x > (a + 1.0) / (a + b + 2.0) {
        return 1.0 - regularized_incomplete_beta(b, a, 1.0 - x);
    }

    let ln_prefix =
        a * x.ln() + b * (1.0 - x).ln() - ln_gamma(a) - ln_gamma(b) + ln_gamma(a + b) - a.ln();

    (ln_prefix.exp() * beta_continued_fraction(a, b, x)).clamp(0.0, 1.0)
}

/// Modified Lentz evaluation of the incomplete beta continued fraction.
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    let guard = |v: f64| if v.abs() < CF_TINY { CF_TINY } else { v };

    let mut c = 1.0_f64;
    let mut d = 1.0 / guard(1.0 - (a + b) * x / (a + 1.0));
    let mut f = d;

    for m in 1..=CF_MAX_ITER {
        let m = m as f64;

        let even = m * (b - m) * x / ((a + 2.0 * m - 1.0) * (a + 2.0 * m));
        d = 1.0 / guard(1.0 + even * d);
        c = guard(1.0 + even / c);
        f *= c * d;

        let odd = -((a + m) * (a + b + m) * x) / ((a + 2.0 * m) * (a + 2.0 * m + 1.0));
        d = 1.0 / guard(1.0 + odd * d);
        c = guard(1.0 + odd / c);
        let delta = c * d;
        f *= delta;

        if (delta - 1.0).abs() < CF_EPSILON {
            break;
        }
    }

    f
}

/// Student-t cumulative distribution P(T <= t) with `df` degrees of freedom.
pub fn student_t_cdf(t: f64, df: f64) -> Result<f64> {
    if !(df > 0.0) || !df.is_finite() {
        return Err(AnalysisError::invalid("df", "must be positive and finite"));
    }
    if t.is_nan() {
        return Err(AnalysisError::invalid("t", "must not be NaN"));
    }
    if t == 0.0 {
        return Ok(0.5);
    }
    if t.is_infinite() {
        return Ok(if t > 0.0 { 1.0 } else { 0.0 });
    }

    let tail = 0.5 * regularized_incomplete_beta(df / 2.0, 0.5, df / (df + t * t));
    Ok(if t > 0.0 { 1.0 - tail } else { tail })
}

/// Two-sided p-value of a Pearson coefficient `r` over `n` pairs.
///
/// Uses t = r * sqrt((n - 2) / (1 - r^2)) with n - 2 degrees of freedom.
/// A perfect correlation yields exactly 0.
pub fn correlation_p_value(r: f64, n: usize) -> Result<f64> {
    if n < 3 {
        return Err(AnalysisError::insufficient(3, n));
    }
    if r.is_nan() {
        return Err(AnalysisError::invalid("r", "must not be NaN"));
    }

    let r = r.clamp(-1.0, 1.0);
    let one_minus_r2 = 1.0 - r * r;
    if one_minus_r2 <= 0.0 {
        return Ok(0.0);
    }

    let df = (n - 2) as f64;
    let t2 = r * r * df / one_minus_r2;
    // 2 * (1 - CDF(|t|)) without the cancellation
    let p = regularized_incomplete_beta(df / 2.0, 0.5, df / (df + t2));
    Ok(p.clamp(0.0, 1.0))
}

/// Survival function P(F > f) of the F distribution.
pub fn f_survival(f: f64, df1: f64, df2: f64) -> Result<f64> {
    if !(df1 > 0.0) || !df1.is_finite() {
        return Err(AnalysisError::invalid("df1", "must be positive and finite"));
    }
    if !(df2 > 0.0) || !df2.is_finite() {
        return Err(AnalysisError::invalid("df2", "must be positive and finite"));
    }
    if f.is_nan() {
        return Err(AnalysisError::invalid("f", "must not be NaN"));
    }
    if f <= 0.0 {
        return Ok(1.0);
    }
    if f.is_infinite() {
        return Ok(0.0);
    }

    let x = df2 / (df2 + df1 * f);
    Ok(regularized_incomplete_beta(df2 / 2.0, df1 / 2.0, x).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-6;

    #[test]
    fn test_ln_gamma_known_values() {
        assert!(ln_gamma(1.0).abs() < 1e-10);
        assert!(ln_gamma(2.0).abs() < 1e-10);
        assert!((ln_gamma(0.5) - 0.572364942924700).abs() < 1e-10);
        assert!((ln_gamma(10.0) - 12.8018274800815).abs() < 1e-9);
        assert!((ln_gamma(100.5) - 361.435540467778).abs() < 1e-8);
    }

    #[test]
    fn test_ln_gamma_reflection() {
        // Gamma(0.25) = 3.625609908221908
        assert!((ln_gamma(0.25) - 3.625609908221908f64.ln()).abs() < 1e-10);
    }

    #[test]
    fn test_incomplete_beta_known_values() {
        assert!((regularized_incomplete_beta(2.0, 3.0, 0.4) - 0.5248).abs() < 1e-10);
        assert!((regularized_incomplete_beta(0.5, 0.5, 0.2) - 0.295167235300867).abs() < TOL);
        assert!((regularized_incomplete_beta(10.0, 20.0, 0.3) - 0.364004081071944).abs() < TOL);
    }

    #[test]
    fn test_incomplete_beta_bounds() {
        assert_eq!(regularized_incomplete_beta(2.0, 3.0, 0.0), 0.0);
        assert_eq!(regularized_incomplete_beta(2.0, 3.0, 1.0), 1.0);
        assert!(regularized_incomplete_beta(2.0, 3.0, 1.5).is_nan());
        assert!(regularized_incomplete_beta(0.0, 3.0, 0.5).is_nan());
    }

    #[test]
    fn test_incomplete_beta_symmetry() {
        let lhs = regularized_incomplete_beta(3.5, 1.5, 0.7);
        let rhs = 1.0 - regularized_incomplete_beta(1.5, 3.5, 0.3);
        assert!((lhs - rhs).abs() < 1e-12);
    }

    #[test]
    fn test_t_cdf_known_values() {
        assert!((student_t_cdf(2.0, 10.0).unwrap() - 0.963305982614630).abs() < TOL);
        assert!((student_t_cdf(-1.5, 5.0).unwrap() - 0.0969518401212367).abs() < TOL);
        assert_eq!(student_t_cdf(0.0, 3.0).unwrap(), 0.5);
    }

    #[test]
    fn test_t_cdf_symmetry() {
        let upper = student_t_cdf(1.7, 12.0).unwrap();
        let lower = student_t_cdf(-1.7, 12.0).unwrap();
        assert!((upper + lower - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_t_cdf_rejects_bad_df() {
        assert!(student_t_cdf(1.0, 0.0).is_err());
        assert!(student_t_cdf(1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_correlation_p_value_known_values() {
        assert!((correlation_p_value(0.5, 20).unwrap() - 0.0247695588041097).abs() < TOL);
        assert!((correlation_p_value(-0.3, 50).unwrap() - 0.0342861800329300).abs() < TOL);
        assert!((correlation_p_value(0.1, 10).unwrap() - 0.78342440625).abs() < TOL);
    }

    #[test]
    fn test_correlation_p_value_perfect_is_zero() {
        assert_eq!(correlation_p_value(1.0, 8).unwrap(), 0.0);
        assert_eq!(correlation_p_value(-1.0, 8).unwrap(), 0.0);
    }

    #[test]
    fn test_correlation_p_value_zero_r_is_one() {
        assert!((correlation_p_value(0.0, 25).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_p_value_needs_three_pairs() {
        assert_eq!(
            correlation_p_value(0.9, 2).unwrap_err(),
            AnalysisError::InsufficientData { required: 3, got: 2 }
        );
    }

    #[test]
    fn test_f_survival_known_values() {
        assert!((f_survival(3.0, 2.0, 20.0).unwrap() - 0.0725381502864058).abs() < TOL);
        assert!((f_survival(4.5, 3.0, 30.0).unwrap() - 0.0100949769326988).abs() < TOL);
        assert!((f_survival(1.0, 5.0, 5.0).unwrap() - 0.5).abs() < TOL);
        assert!((f_survival(0.5, 1.0, 100.0).unwrap() - 0.481144676985740).abs() < TOL);
    }

    #[test]
    fn test_f_survival_edges() {
        assert_eq!(f_survival(0.0, 2.0, 10.0).unwrap(), 1.0);
        assert_eq!(f_survival(-1.0, 2.0, 10.0).unwrap(), 1.0);
        assert_eq!(f_survival(f64::INFINITY, 2.0, 10.0).unwrap(), 0.0);
        assert!(f_survival(1.0, 0.0, 10.0).is_err());
        assert!(f_survival(f64::NAN, 2.0, 10.0).is_err());
    }
}
