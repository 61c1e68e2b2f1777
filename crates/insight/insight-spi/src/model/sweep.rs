//! Multi-unit sweep result types.

use serde::{Deserialize, Serialize};

use super::{AnomalyRecord, LagScanResult, UnitFailure};

/// Lag scan of one factor against the sweep's target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScan {
    pub factor_id: String,
    pub scan: LagScanResult,
}

/// Lag scans of many factors against one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSweepResult {
    pub target_id: String,
    /// Completed scans in the order the factors were requested
    pub scans: Vec<FactorScan>,
    /// Factors that could not be fetched or had no evaluable lag
    pub failures: Vec<UnitFailure<String>>,
}

impl FactorSweepResult {
    /// Factor scans ordered by their best |r|, strongest first.
    pub fn strongest(&self) -> Vec<&FactorScan> {
        let mut scans: Vec<&FactorScan> = self
            .scans
            .iter()
            .filter(|s| s.scan.best().is_some())
            .collect();
        scans.sort_by(|a, b| {
            let ra = a.scan.best().map(|r| r.r.abs()).unwrap_or(0.0);
            let rb = b.scan.best().map(|r| r.r.abs()).unwrap_or(0.0);
            rb.total_cmp(&ra)
        });
        scans
    }
}

/// Anomalies across many groups (e.g. products).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalySweepResult {
    /// Records of every group, grouped in request order
    pub records: Vec<AnomalyRecord>,
    /// Groups that could not be fetched or scored
    pub failures: Vec<UnitFailure<String>>,
}

impl AnomalySweepResult {
    /// Records belonging to one group.
    pub fn for_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a AnomalyRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.group.as_deref() == Some(group))
    }
}
