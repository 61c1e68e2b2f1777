//! Error types for factor analysis.
//!
//! This module contains the error enum and the Result alias.

mod analysis_error;

pub use analysis_error::{AnalysisError, Result};
