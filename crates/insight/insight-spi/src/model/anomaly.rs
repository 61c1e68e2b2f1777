//! Anomaly record types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Anomaly severity levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AnomalySeverity {
    /// Severity band for an absolute z-score.
    pub fn from_z(z: f64) -> Self {
        let z = z.abs();
        if z >= 3.0 {
            AnomalySeverity::Critical
        } else if z >= 2.5 {
            AnomalySeverity::High
        } else if z >= 2.0 {
            AnomalySeverity::Medium
        } else {
            AnomalySeverity::Low
        }
    }
}

impl std::fmt::Display for AnomalySeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AnomalySeverity::Low => "low",
            AnomalySeverity::Medium => "medium",
            AnomalySeverity::High => "high",
            AnomalySeverity::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// Direction of the deviation from baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Spike,
    Drop,
}

/// One flagged period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    /// Caller-supplied grouping key (e.g. product id), not interpreted
    pub group: Option<String>,
    /// Period label
    pub period: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Observed aggregated value
    pub actual: f64,
    /// Baseline mean the period was compared against
    pub expected: f64,
    pub z_score: f64,
    pub severity: AnomalySeverity,
    pub kind: AnomalyKind,
}
