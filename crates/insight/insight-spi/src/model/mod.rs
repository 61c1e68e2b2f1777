//! Data models for factor analysis.
//!
//! All values are immutable, request-scoped results: built from inputs,
//! returned, and discarded by the caller.

mod aggregated;
mod anomaly;
mod calendar;
mod correlation;
mod granger;
mod regression;
mod series;
mod sweep;

pub use aggregated::{AggregatedSeries, Period};
pub use anomaly::{AnomalyKind, AnomalyRecord, AnomalySeverity};
pub use calendar::{AggregationMethod, Granularity};
pub use correlation::{
    CorrelationResult, CorrelationStrength, LagScanResult, UnitFailure, WindowResult,
    WindowScanResult,
};
pub use granger::{CausalDirection, GrangerResult, GrangerStatistic};
pub use regression::RegressionResult;
pub use series::{DataPoint, DateAlignedSeries};
pub use sweep::{AnomalySweepResult, FactorScan, FactorSweepResult};
