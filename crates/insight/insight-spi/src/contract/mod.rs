//! Contract definitions for factor analysis.
//!
//! Callers implement these traits to feed series into the analyzers.

mod series_provider;

pub use series_provider::SeriesProvider;
