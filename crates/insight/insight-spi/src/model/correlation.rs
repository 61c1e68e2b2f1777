//! Correlation and lag scan result types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Qualitative strength band of |r|.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
}

impl std::fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Weak => "weak",
        };
        write!(f, "{}", s)
    }
}

/// Pearson correlation between a factor and a target at one lag.
///
/// A positive `lag` pairs the factor at date `d` with the target `lag`
/// periods later, i.e. the factor leads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Factor label
    pub factor: String,
    /// Signed lag in periods
    pub lag: i32,
    /// Pearson coefficient in [-1, 1]
    pub r: f64,
    /// Two-sided p-value in [0, 1]
    pub p_value: f64,
    /// Benjamini-Hochberg adjusted p-value, set by lag scans
    pub fdr_p_value: Option<f64>,
    /// Number of aligned pairs
    pub n: usize,
    /// Strength band of |r|
    pub strength: CorrelationStrength,
    /// Whether the governing p-value is below the significance level
    pub significant: bool,
    /// Qualitative interpretation
    pub interpretation: String,
}

impl CorrelationResult {
    /// The p-value significance decisions are based on: adjusted when
    /// available, raw otherwise.
    pub fn effective_p_value(&self) -> f64 {
        self.fdr_p_value.unwrap_or(self.p_value)
    }
}

/// A unit (lag, window, factor, group) omitted from a multi-unit result,
/// with the reason it failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitFailure<U> {
    pub unit: U,
    pub reason: AnalysisError,
}

impl<U> UnitFailure<U> {
    pub fn new(unit: U, reason: AnalysisError) -> Self {
        Self { unit, reason }
    }
}

/// Outcome of scanning a range of lags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagScanResult {
    /// Results ranked by |r| descending, ties by smaller |lag|
    pub ranked: Vec<CorrelationResult>,
    /// Lags that could not be evaluated
    pub skipped: Vec<UnitFailure<i32>>,
}

impl LagScanResult {
    /// Top-ranked lag, if any lag survived.
    pub fn best(&self) -> Option<&CorrelationResult> {
        self.ranked.first()
    }

    /// Result for a specific lag, if it was evaluated.
    pub fn at_lag(&self, lag: i32) -> Option<&CorrelationResult> {
        self.ranked.iter().find(|r| r.lag == lag)
    }

    /// Number of lags evaluated (the FDR family size).
    pub fn lags_tested(&self) -> usize {
        self.ranked.len()
    }
}

/// Best lag found inside one time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowResult {
    /// First day of the window
    pub start: NaiveDate,
    /// Last day of the window
    pub end: NaiveDate,
    /// Top-ranked lag of the window's own scan; its FDR p-value is local
    /// to that window's lag family
    pub best: CorrelationResult,
    /// Size of the window's lag family
    pub lags_tested: usize,
}

/// Outcome of a windowed lag scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowScanResult {
    /// Windows in chronological order
    pub windows: Vec<WindowResult>,
    /// Windows omitted, keyed by `(start, end)`
    pub skipped: Vec<UnitFailure<(NaiveDate, NaiveDate)>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(lag: i32, r: f64) -> CorrelationResult {
        CorrelationResult {
            factor: "temp".to_string(),
            lag,
            r,
            p_value: 0.01,
            fdr_p_value: None,
            n: 30,
            strength: CorrelationStrength::Strong,
            significant: true,
            interpretation: String::new(),
        }
    }

    #[test]
    fn test_effective_p_value_prefers_adjusted() {
        let mut r = result(0, 0.8);
        assert_eq!(r.effective_p_value(), 0.01);
        r.fdr_p_value = Some(0.03);
        assert_eq!(r.effective_p_value(), 0.03);
    }

    #[test]
    fn test_lag_scan_best_and_lookup() {
        let scan = LagScanResult {
            ranked: vec![result(2, 0.9), result(0, 0.4)],
            skipped: vec![UnitFailure::new(5, AnalysisError::insufficient(3, 1))],
        };
        assert_eq!(scan.best().map(|r| r.lag), Some(2));
        assert_eq!(scan.at_lag(0).map(|r| r.r), Some(0.4));
        assert!(scan.at_lag(7).is_none());
        assert_eq!(scan.lags_tested(), 2);
    }

    #[test]
    fn test_empty_scan_has_no_best() {
        let scan = LagScanResult {
            ranked: Vec::new(),
            skipped: Vec::new(),
        };
        assert!(scan.best().is_none());
    }

    #[test]
    fn test_unit_failure_serde_roundtrip() {
        let failure = UnitFailure::new(3, AnalysisError::insufficient(3, 2));
        let json = serde_json::to_string(&failure).unwrap();
        assert!(json.contains("InsufficientData"));
        let back: UnitFailure<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, failure);
    }

    #[test]
    fn test_strength_display() {
        assert_eq!(CorrelationStrength::Moderate.to_string(), "moderate");
    }
}
