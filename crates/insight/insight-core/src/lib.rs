//! Factor Insight Core Implementations
//!
//! Statistical analysis of dated business series against external factors:
//!
//! - [`stats`]: descriptive statistics, t and F tails, FDR, OLS, transforms
//! - [`series`]: lag-shifted alignment and calendar aggregation
//! - [`CorrelationAnalyzer`] / [`LagScanner`] / [`WindowedLagScanner`]:
//!   lagged correlation with multiple-comparison control
//! - [`GrangerCausalityTester`]: bidirectional Granger F-test
//! - [`AnomalyDetector`]: z-score flagging per period
//! - [`FactorSweep`] / [`AnomalySweep`]: parallel runs over a provider
//!
//! ## Lag convention
//!
//! A positive lag pairs the factor on date `d` with the target `lag`
//! periods later: the factor leads.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use insight_core::prelude::*;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let temp = DateAlignedSeries::daily("temp", start, &[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0]).unwrap();
//! let sales = DateAlignedSeries::daily("sales", start, &[30.0, 12.0, 41.0, 9.0, 52.0, 95.0, 20.0]).unwrap();
//!
//! let scan = LagScanner::new(LagScanConfig::new(1)).scan(&temp, &sales).unwrap();
//! assert_eq!(scan.best().unwrap().lag, 0);
//! ```

pub mod anomaly;
pub mod correlation;
pub mod granger;
pub mod lag_scan;
pub mod series;
pub mod stats;
pub mod sweep;
pub mod windowed;

// Re-export from SPI
pub use insight_spi::{AnalysisError, Result, SeriesProvider};

// Re-export implementations for convenience
pub use anomaly::{AnomalyDetector, PeriodScore};
pub use correlation::CorrelationAnalyzer;
pub use granger::GrangerCausalityTester;
pub use lag_scan::LagScanner;
pub use series::{aggregate, align, align_with, AlignedPairs};
pub use sweep::{AnomalySweep, FactorSweep, InMemorySeriesProvider};
pub use windowed::{window_bounds, WindowedLagScanner};

/// Prelude module for convenient imports
pub mod prelude {
    pub use insight_api::{
        AnalysisConfig, AnomalyConfig, AnomalyConfigBuilder, BaselineMode, CorrelationConfig,
        GrangerConfig, LagScanConfig, SeriesTransform, WindowConfig,
    };
    pub use insight_spi::{
        AggregationMethod, AnalysisError, CausalDirection, DateAlignedSeries, Granularity,
        Result, SeriesProvider,
    };

    pub use crate::anomaly::AnomalyDetector;
    pub use crate::correlation::CorrelationAnalyzer;
    pub use crate::granger::GrangerCausalityTester;
    pub use crate::lag_scan::LagScanner;
    pub use crate::sweep::{AnomalySweep, FactorSweep, InMemorySeriesProvider};
    pub use crate::windowed::WindowedLagScanner;
}
