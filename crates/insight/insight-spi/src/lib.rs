//! Factor Insight Service Provider Interface
//!
//! Defines the data model, error type and provider contract shared by the
//! factor analysis crates.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::SeriesProvider;
pub use error::{AnalysisError, Result};
pub use model::{
    AggregatedSeries, AggregationMethod, AnomalyKind, AnomalyRecord, AnomalySeverity,
    AnomalySweepResult, CausalDirection, CorrelationResult, CorrelationStrength, DataPoint,
    DateAlignedSeries, FactorScan, FactorSweepResult, GrangerResult, GrangerStatistic,
    Granularity, LagScanResult, Period, RegressionResult, UnitFailure, WindowResult,
    WindowScanResult,
};
