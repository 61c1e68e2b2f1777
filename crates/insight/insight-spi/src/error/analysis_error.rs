//! Analysis error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the statistical core.
///
/// Every failure is reported synchronously; the core never hands back a
/// silent NaN or infinity in place of an error. Variants are `Clone` so a
/// multi-unit scan can keep the reason a single lag, window or group was
/// omitted.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum AnalysisError {
    /// Fewer observations than the estimator needs.
    #[error("Insufficient data: required {required}, got {got}")]
    InsufficientData { required: usize, got: usize },

    /// Zero variance, singular regression system or exact fit.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Invalid parameter value.
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A series provider failed to supply a series.
    #[error("Series unavailable [{id}]: {reason}")]
    SeriesUnavailable { id: String, reason: String },
}

impl AnalysisError {
    /// Creates an `AnalysisError::InsufficientData`.
    pub fn insufficient(required: usize, got: usize) -> Self {
        Self::InsufficientData { required, got }
    }

    /// Creates an `AnalysisError::DegenerateInput`.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateInput(msg.into())
    }

    /// Creates an `AnalysisError::InvalidParameter`.
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `AnalysisError::SeriesUnavailable`.
    pub fn unavailable(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SeriesUnavailable {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
