//! Statistical primitives.
//!
//! - [`descriptive`]: mean, standard deviation, Pearson correlation
//! - [`distribution`]: log-gamma, incomplete beta, Student-t and F tails
//! - [`fdr`]: Benjamini-Hochberg adjustment
//! - [`ols`]: least squares through the normal equations
//! - [`transform`]: first difference and detrend
//! - [`regression`]: simple linear regression with prediction

pub mod descriptive;
pub mod distribution;
pub mod fdr;
pub mod ols;
pub mod regression;
pub mod transform;

pub use descriptive::{is_constant, mean, pearson, population_std_dev, std_dev};
pub use distribution::{
    correlation_p_value, f_survival, ln_gamma, regularized_incomplete_beta, student_t_cdf,
};
pub use fdr::benjamini_hochberg;
pub use ols::{ols_fit, ols_residual_ss, OlsFit};
pub use regression::{linear_regression, trend_regression};
pub use transform::{apply_transform, detrend, first_difference};
