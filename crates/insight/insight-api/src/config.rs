//! Analysis configuration types.

use insight_spi::{AnalysisError, Granularity, Result};
use serde::{Deserialize, Serialize};

/// Smallest sample size any Pearson estimate is computed from.
const MIN_PEARSON_SAMPLES: usize = 3;

// ============================================================================
// Transforms and baselines
// ============================================================================

/// Stationarity-inducing transform applied before lag or causality analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesTransform {
    /// Use the raw values
    #[default]
    None,
    /// Replace each value by its change from the previous observation
    FirstDifference,
    /// Replace each value by its residual from a linear trend over time
    Detrend,
}

/// Which periods an anomaly baseline is estimated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineMode {
    /// Mean and sample standard deviation over every period
    #[default]
    Global,
    /// Each period against the mean and spread of all other periods
    LeaveOneOut,
}

// ============================================================================
// Correlation
// ============================================================================

/// Single-lag correlation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Minimum aligned pairs (default: 3, never lower).
    pub min_samples: usize,
    /// Significance level for p-values (default: 0.05).
    pub significance: f64,
    /// |r| at or above which a correlation is strong (default: 0.5).
    pub strong_threshold: f64,
    /// |r| at or above which a correlation is moderate (default: 0.3).
    pub moderate_threshold: f64,
    /// Period unit lags are measured in (default: daily).
    pub granularity: Granularity,
    /// Transform applied to both series first (default: none).
    pub transform: SeriesTransform,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            min_samples: MIN_PEARSON_SAMPLES,
            significance: 0.05,
            strong_threshold: 0.5,
            moderate_threshold: 0.3,
            granularity: Granularity::Daily,
            transform: SeriesTransform::None,
        }
    }
}

impl CorrelationConfig {
    pub fn new(min_samples: usize, significance: f64) -> Self {
        Self {
            min_samples,
            significance,
            ..Self::default()
        }
    }

    /// Measure lags in `granularity` periods.
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Apply `transform` to both series before correlating.
    pub fn with_transform(mut self, transform: SeriesTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the strong and moderate |r| bands.
    pub fn with_bands(mut self, strong: f64, moderate: f64) -> Self {
        self.strong_threshold = strong;
        self.moderate_threshold = moderate;
        self
    }

    /// Sample minimum actually enforced.
    pub fn effective_min_samples(&self) -> usize {
        self.min_samples.max(MIN_PEARSON_SAMPLES)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_samples < MIN_PEARSON_SAMPLES {
            return Err(AnalysisError::invalid(
                "min_samples",
                format!("must be at least {}", MIN_PEARSON_SAMPLES),
            ));
        }
        validate_probability("significance", self.significance)?;
        if !(0.0..=1.0).contains(&self.moderate_threshold)
            || !(0.0..=1.0).contains(&self.strong_threshold)
        {
            return Err(AnalysisError::invalid(
                "strong_threshold",
                "strength bands must lie in [0, 1]",
            ));
        }
        if self.moderate_threshold > self.strong_threshold {
            return Err(AnalysisError::invalid(
                "moderate_threshold",
                "must not exceed strong_threshold",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Lag scanning
// ============================================================================

/// Lag range scan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LagScanConfig {
    /// Lags from `-max_lag` to `+max_lag` are scanned (default: 7).
    pub max_lag: u32,
    /// Per-lag correlation settings.
    pub correlation: CorrelationConfig,
}

impl Default for LagScanConfig {
    fn default() -> Self {
        Self {
            max_lag: 7,
            correlation: CorrelationConfig::default(),
        }
    }
}

impl LagScanConfig {
    pub fn new(max_lag: u32) -> Self {
        Self {
            max_lag,
            ..Self::default()
        }
    }

    pub fn with_correlation(mut self, correlation: CorrelationConfig) -> Self {
        self.correlation = correlation;
        self
    }

    /// Every lag in the scanned family, most negative first.
    pub fn lags(&self) -> Vec<i32> {
        let max = i32::try_from(self.max_lag).unwrap_or(i32::MAX);
        (-max..=max).collect()
    }

    pub fn validate(&self) -> Result<()> {
        if i32::try_from(self.max_lag).is_err() {
            return Err(AnalysisError::invalid("max_lag", "out of range"));
        }
        self.correlation.validate()
    }
}

/// Sliding window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Calendar days covered by each window (default: 90).
    pub window_days: u32,
    /// Calendar days between consecutive window starts (default: 30).
    pub step_days: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_days: 90,
            step_days: 30,
        }
    }
}

impl WindowConfig {
    pub fn new(window_days: u32, step_days: u32) -> Self {
        Self {
            window_days,
            step_days,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_days == 0 {
            return Err(AnalysisError::invalid("window_days", "must be positive"));
        }
        if self.step_days == 0 {
            return Err(AnalysisError::invalid("step_days", "must be positive"));
        }
        Ok(())
    }
}

// ============================================================================
// Granger causality
// ============================================================================

/// Granger causality test configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrangerConfig {
    /// Lag order p (default: 2).
    pub lag_order: usize,
    /// Significance level for each direction (default: 0.05).
    pub significance: f64,
    /// Transform applied to both series first (default: none).
    pub transform: SeriesTransform,
}

impl Default for GrangerConfig {
    fn default() -> Self {
        Self {
            lag_order: 2,
            significance: 0.05,
            transform: SeriesTransform::None,
        }
    }
}

impl GrangerConfig {
    pub fn new(lag_order: usize) -> Self {
        Self {
            lag_order,
            ..Self::default()
        }
    }

    pub fn with_significance(mut self, significance: f64) -> Self {
        self.significance = significance;
        self
    }

    pub fn with_transform(mut self, transform: SeriesTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Observations needed for lag order `p`.
    ///
    /// At least `2p + 5`, and enough that the unrestricted model keeps a
    /// positive residual degree of freedom.
    pub fn required_samples(&self) -> usize {
        let p = self.lag_order;
        (2 * p + 5).max(3 * p + 2)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lag_order == 0 {
            return Err(AnalysisError::invalid("lag_order", "must be at least 1"));
        }
        validate_probability("significance", self.significance)
    }
}

// ============================================================================
// Anomaly detection
// ============================================================================

/// Anomaly detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Period the raw series is summed into (default: daily).
    pub granularity: Granularity,
    /// |z| at or above which a period is flagged (default: 3.0).
    pub threshold: f64,
    /// Fewest aggregated periods a baseline is built from (default: 3).
    pub min_periods: usize,
    /// Baseline estimation mode (default: global).
    pub baseline: BaselineMode,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Daily,
            threshold: 3.0,
            min_periods: 3,
            baseline: BaselineMode::Global,
        }
    }
}

impl AnomalyConfig {
    pub fn new(granularity: Granularity, threshold: f64) -> Self {
        Self {
            granularity,
            threshold,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(AnalysisError::invalid("threshold", "must be positive and finite"));
        }
        if self.min_periods < 3 {
            return Err(AnalysisError::invalid("min_periods", "must be at least 3"));
        }
        Ok(())
    }
}

/// Builder for AnomalyConfig.
#[derive(Debug, Default)]
pub struct AnomalyConfigBuilder {
    granularity: Option<Granularity>,
    threshold: Option<f64>,
    min_periods: Option<usize>,
    baseline: Option<BaselineMode>,
}

impl AnomalyConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the aggregation granularity.
    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }

    /// Set the z-score threshold.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the minimum number of periods.
    pub fn min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = Some(min_periods);
        self
    }

    /// Set the baseline mode.
    pub fn baseline(mut self, baseline: BaselineMode) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<AnomalyConfig> {
        let defaults = AnomalyConfig::default();
        let config = AnomalyConfig {
            granularity: self.granularity.unwrap_or(defaults.granularity),
            threshold: self.threshold.unwrap_or(defaults.threshold),
            min_periods: self.min_periods.unwrap_or(defaults.min_periods),
            baseline: self.baseline.unwrap_or(defaults.baseline),
        };
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Umbrella configuration
// ============================================================================

/// Every analysis section in one document.
///
/// Missing sections and keys fall back to their defaults:
///
/// ```toml
/// [lag_scan]
/// max_lag = 14
///
/// [lag_scan.correlation]
/// granularity = "weekly"
///
/// [anomaly]
/// threshold = 2.5
/// baseline = "leave_one_out"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub lag_scan: LagScanConfig,
    pub window: WindowConfig,
    pub granger: GrangerConfig,
    pub anomaly: AnomalyConfig,
}

impl AnalysisConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(source)
            .map_err(|e| AnalysisError::invalid("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| AnalysisError::invalid("config", e.to_string()))
    }

    /// Correlation settings shared by single-lag and scanned analyses.
    pub fn correlation(&self) -> &CorrelationConfig {
        &self.lag_scan.correlation
    }

    pub fn validate(&self) -> Result<()> {
        self.lag_scan.validate()?;
        self.window.validate()?;
        self.granger.validate()?;
        self.anomaly.validate()
    }
}

fn validate_probability(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(AnalysisError::invalid(name, "must lie strictly between 0 and 1"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_config_defaults() {
        let config = CorrelationConfig::default();
        assert_eq!(config.min_samples, 3);
        assert_eq!(config.significance, 0.05);
        assert_eq!(config.strong_threshold, 0.5);
        assert_eq!(config.moderate_threshold, 0.3);
        assert_eq!(config.granularity, Granularity::Daily);
        assert_eq!(config.transform, SeriesTransform::None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_correlation_config_rejects_low_min_samples() {
        let config = CorrelationConfig::new(2, 0.05);
        assert!(config.validate().is_err());
        assert_eq!(config.effective_min_samples(), 3);
    }

    #[test]
    fn test_correlation_config_rejects_inverted_bands() {
        let config = CorrelationConfig::default().with_bands(0.3, 0.5);
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_correlation_config_rejects_bad_significance() {
        assert!(CorrelationConfig::new(3, 0.0).validate().is_err());
        assert!(CorrelationConfig::new(3, 1.0).validate().is_err());
        assert!(CorrelationConfig::new(3, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_lag_scan_lags() {
        assert_eq!(LagScanConfig::new(2).lags(), vec![-2, -1, 0, 1, 2]);
        assert_eq!(LagScanConfig::new(0).lags(), vec![0]);
    }

    #[test]
    fn test_window_config_rejects_zero() {
        assert!(WindowConfig::new(0, 7).validate().is_err());
        assert!(WindowConfig::new(30, 0).validate().is_err());
        assert!(WindowConfig::new(30, 7).validate().is_ok());
    }

    #[test]
    fn test_granger_required_samples() {
        assert_eq!(GrangerConfig::new(1).required_samples(), 7);
        assert_eq!(GrangerConfig::new(2).required_samples(), 9);
        assert_eq!(GrangerConfig::new(3).required_samples(), 11);
        assert_eq!(GrangerConfig::new(4).required_samples(), 14);
    }

    #[test]
    fn test_granger_config_rejects_zero_order() {
        let err = GrangerConfig::new(0).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid parameter: lag_order - must be at least 1"
        );
    }

    #[test]
    fn test_anomaly_builder_defaults() {
        let config = AnomalyConfigBuilder::new().build().unwrap();
        assert_eq!(config, AnomalyConfig::default());
        assert_eq!(config.baseline, BaselineMode::Global);
    }

    #[test]
    fn test_anomaly_builder_custom() {
        let config = AnomalyConfigBuilder::new()
            .granularity(Granularity::Weekly)
            .threshold(2.5)
            .min_periods(8)
            .baseline(BaselineMode::LeaveOneOut)
            .build()
            .unwrap();

        assert_eq!(config.granularity, Granularity::Weekly);
        assert_eq!(config.threshold, 2.5);
        assert_eq!(config.min_periods, 8);
        assert_eq!(config.baseline, BaselineMode::LeaveOneOut);
    }

    #[test]
    fn test_anomaly_builder_rejects_bad_threshold() {
        assert!(AnomalyConfigBuilder::new().threshold(-1.0).build().is_err());
        assert!(AnomalyConfigBuilder::new().min_periods(2).build().is_err());
    }

    #[test]
    fn test_analysis_config_partial_toml() {
        let source = r#"
            [lag_scan]
            max_lag = 14

            [lag_scan.correlation]
            granularity = "weekly"
            transform = "first_difference"

            [anomaly]
            threshold = 2.5
            baseline = "leave_one_out"
        "#;

        let config = AnalysisConfig::from_toml_str(source).unwrap();
        assert_eq!(config.lag_scan.max_lag, 14);
        assert_eq!(config.correlation().granularity, Granularity::Weekly);
        assert_eq!(config.correlation().transform, SeriesTransform::FirstDifference);
        assert_eq!(config.correlation().significance, 0.05);
        assert_eq!(config.anomaly.threshold, 2.5);
        assert_eq!(config.anomaly.baseline, BaselineMode::LeaveOneOut);
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.granger, GrangerConfig::default());
    }

    #[test]
    fn test_analysis_config_empty_toml_is_default() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_analysis_config_rejects_invalid_values() {
        let err = AnalysisConfig::from_toml_str("[window]\nstep_days = 0\n").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidParameter { ref name, .. } if name == "step_days"));
    }

    #[test]
    fn test_analysis_config_rejects_malformed_toml() {
        let err = AnalysisConfig::from_toml_str("[granger\nlag_order = ").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidParameter { ref name, .. } if name == "config"));
    }

    #[test]
    fn test_analysis_config_toml_roundtrip() {
        let mut config = AnalysisConfig::default();
        config.granger = GrangerConfig::new(4).with_transform(SeriesTransform::Detrend);
        let text = config.to_toml_string().unwrap();
        let back = AnalysisConfig::from_toml_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
