//! Factor Insight Facade
//!
//! Unified re-exports for factor analysis.
//!
//! This facade provides a single entry point to all factor analysis functionality:
//! - Data model, `AnalysisError` and the `SeriesProvider` contract from SPI
//! - Configuration types and TOML loading from API
//! - Analyzers (`CorrelationAnalyzer`, `LagScanner`, `WindowedLagScanner`,
//!   `GrangerCausalityTester`, `AnomalyDetector`) and sweeps from Core

// Re-export everything from SPI
pub use insight_spi::*;

// Re-export everything from API
pub use insight_api::*;

// Re-export everything from Core
pub use insight_core::*;
