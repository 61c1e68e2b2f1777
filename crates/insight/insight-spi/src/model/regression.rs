//! Linear regression result type.

use serde::{Deserialize, Serialize};

/// Fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination
    pub r_squared: f64,
    /// Point the prediction was made at
    pub x_future: f64,
    /// Fitted value at `x_future`
    pub prediction: f64,
    /// Human-readable form of the fitted line
    pub description: String,
}

impl RegressionResult {
    /// Evaluate the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}
