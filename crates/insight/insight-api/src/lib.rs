//! Factor Insight API
//!
//! Configuration types and builders for factor analysis.

mod config;

pub use config::{
    AnalysisConfig, AnomalyConfig, AnomalyConfigBuilder, BaselineMode, CorrelationConfig,
    GrangerConfig, LagScanConfig, SeriesTransform, WindowConfig,
};

// Re-export SPI types
pub use insight_spi::{AggregationMethod, AnalysisError, Granularity, Result};
