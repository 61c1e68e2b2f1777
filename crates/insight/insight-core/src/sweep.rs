//! Multi-unit sweeps over a series provider.
//!
//! Each factor or group is fetched and analyzed independently; a unit that
//! fails is recorded with its reason and the sweep carries on.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use insight_api::{AnomalyConfig, LagScanConfig};
use insight_spi::{
    AnalysisError, AnomalySweepResult, DateAlignedSeries, FactorScan, FactorSweepResult,
    LagScanResult, Result, SeriesProvider, UnitFailure,
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::anomaly::AnomalyDetector;
use crate::lag_scan::LagScanner;

// ============================================================================
// In-memory provider
// ============================================================================

/// Series provider backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySeriesProvider {
    series: BTreeMap<String, DateAlignedSeries>,
}

impl InMemorySeriesProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `series` under `id`, replacing any previous entry.
    pub fn insert(&mut self, id: impl Into<String>, series: DateAlignedSeries) {
        self.series.insert(id.into(), series);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_series(mut self, id: impl Into<String>, series: DateAlignedSeries) -> Self {
        self.insert(id, series);
        self
    }

    /// Stored identifiers in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        self.series.keys().map(String::as_str).collect()
    }
}

impl SeriesProvider for InMemorySeriesProvider {
    fn fetch(&self, id: &str, start: NaiveDate, end: NaiveDate) -> Result<DateAlignedSeries> {
        validate_range(start, end)?;
        self.series
            .get(id)
            .map(|series| series.restrict(start, end))
            .ok_or_else(|| AnalysisError::unavailable(id, "no series stored under this id"))
    }
}

fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(AnalysisError::invalid(
            "date_range",
            format!("start {} is after end {}", start, end),
        ));
    }
    Ok(())
}

// ============================================================================
// Factor sweep
// ============================================================================

/// Lag scans of many candidate factors against one target.
#[derive(Debug, Clone, Default)]
pub struct FactorSweep {
    config: LagScanConfig,
}

impl FactorSweep {
    pub fn new(config: LagScanConfig) -> Self {
        Self { config }
    }

    /// Fetch the target and every factor over `[start, end]` and scan each
    /// factor in parallel.
    ///
    /// Failing to fetch the target fails the sweep. A factor that cannot be
    /// fetched, or whose scan keeps no lag, becomes a per-factor failure.
    pub fn run<P, S>(
        &self,
        provider: &P,
        target_id: &str,
        factor_ids: &[S],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FactorSweepResult>
    where
        P: SeriesProvider + ?Sized,
        S: AsRef<str> + Sync,
    {
        self.config.validate()?;
        validate_range(start, end)?;
        let target = provider.fetch(target_id, start, end)?;
        let scanner = LagScanner::new(self.config.clone());

        let outcomes: Vec<(String, Result<LagScanResult>)> = factor_ids
            .par_iter()
            .map(|id| {
                let id = id.as_ref();
                let outcome = provider
                    .fetch(id, start, end)
                    .and_then(|factor| scanner.scan(&factor, &target))
                    .and_then(|scan| match scan.best() {
                        Some(_) => Ok(scan),
                        None => Err(first_reason(&scan)),
                    });
                (id.to_string(), outcome)
            })
            .collect();

        let mut scans = Vec::new();
        let mut failures = Vec::new();
        for (factor_id, outcome) in outcomes {
            match outcome {
                Ok(scan) => scans.push(FactorScan { factor_id, scan }),
                Err(reason) => {
                    debug!(factor = %factor_id, %reason, "factor skipped");
                    failures.push(UnitFailure::new(factor_id, reason));
                }
            }
        }

        info!(
            target = target_id,
            scanned = scans.len(),
            failed = failures.len(),
            "factor sweep complete"
        );
        Ok(FactorSweepResult {
            target_id: target_id.to_string(),
            scans,
            failures,
        })
    }
}

/// Reason a scan with no surviving lag reports, taken from its most
/// immediate lag.
fn first_reason(scan: &LagScanResult) -> AnalysisError {
    scan.skipped
        .iter()
        .min_by_key(|s| (s.unit.unsigned_abs(), -s.unit))
        .map(|s| s.reason.clone())
        .unwrap_or_else(|| AnalysisError::insufficient(3, 0))
}

// ============================================================================
// Anomaly sweep
// ============================================================================

/// Anomaly detection across many groups, e.g. one series per product.
#[derive(Debug, Clone, Default)]
pub struct AnomalySweep {
    config: AnomalyConfig,
}

impl AnomalySweep {
    pub fn new(config: AnomalyConfig) -> Self {
        Self { config }
    }

    /// Fetch and score every group over `[start, end]` in parallel.
    ///
    /// Each group id doubles as the record's group key. Records are merged
    /// in request order; failing groups are reported separately.
    pub fn run<P, S>(
        &self,
        provider: &P,
        group_ids: &[S],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AnomalySweepResult>
    where
        P: SeriesProvider + ?Sized,
        S: AsRef<str> + Sync,
    {
        self.config.validate()?;
        validate_range(start, end)?;
        let detector = AnomalyDetector::new(self.config.clone());

        let outcomes: Vec<(String, Result<Vec<_>>)> = group_ids
            .par_iter()
            .map(|id| {
                let id = id.as_ref();
                let outcome = provider
                    .fetch(id, start, end)
                    .and_then(|series| detector.detect(&series, Some(id)));
                (id.to_string(), outcome)
            })
            .collect();

        let mut records = Vec::new();
        let mut failures = Vec::new();
        for (group, outcome) in outcomes {
            match outcome {
                Ok(found) => records.extend(found),
                Err(reason) => {
                    debug!(%group, %reason, "group skipped");
                    failures.push(UnitFailure::new(group, reason));
                }
            }
        }

        info!(
            groups = group_ids.len(),
            anomalies = records.len(),
            failed = failures.len(),
            "anomaly sweep complete"
        );
        Ok(AnomalySweepResult { records, failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn provider() -> InMemorySeriesProvider {
        let leader: Vec<f64> = (0..30).map(|i| ((i * 7 + i * i) % 17) as f64).collect();
        let target = DateAlignedSeries::daily("sales", date(2), &leader[..29]).unwrap();
        InMemorySeriesProvider::new()
            .with_series("sales", target)
            .with_series("promo", DateAlignedSeries::daily("promo", date(1), &leader).unwrap())
            .with_series("flat", DateAlignedSeries::daily("flat", date(1), &[3.0; 30]).unwrap())
    }

    #[test]
    fn test_in_memory_fetch_restricts() {
        let provider = provider();
        let series = provider.fetch("promo", date(5), date(9)).unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(series.first_date(), Some(date(5)));
        assert_eq!(provider.ids(), vec!["flat", "promo", "sales"]);
    }

    #[test]
    fn test_in_memory_fetch_errors() {
        let provider = provider();
        assert!(matches!(
            provider.fetch("weather", date(1), date(5)),
            Err(AnalysisError::SeriesUnavailable { .. })
        ));
        assert!(matches!(
            provider.fetch("promo", date(5), date(1)),
            Err(AnalysisError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_factor_sweep_isolates_failures() {
        let result = FactorSweep::new(LagScanConfig::new(2))
            .run(&provider(), "sales", &["promo", "flat", "weather"], date(1), date(30))
            .unwrap();

        assert_eq!(result.target_id, "sales");
        assert_eq!(result.scans.len(), 1);
        assert_eq!(result.scans[0].factor_id, "promo");
        assert_eq!(result.scans[0].scan.best().map(|b| b.lag), Some(1));

        let failed: Vec<&str> = result.failures.iter().map(|f| f.unit.as_str()).collect();
        assert_eq!(failed, vec!["flat", "weather"]);
        assert!(matches!(result.failures[0].reason, AnalysisError::DegenerateInput(_)));
        assert!(matches!(
            result.failures[1].reason,
            AnalysisError::SeriesUnavailable { .. }
        ));
    }

    #[test]
    fn test_factor_sweep_missing_target_fails() {
        let err = FactorSweep::default()
            .run(&provider(), "returns", &["promo"], date(1), date(30))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::SeriesUnavailable { .. }));
    }

    #[test]
    fn test_anomaly_sweep_groups_records() {
        let mut spiky = vec![100.0; 20];
        spiky[12] = 900.0;
        let provider = provider()
            .with_series("sku-1", DateAlignedSeries::daily("sku-1", date(1), &spiky).unwrap())
            .with_series("sku-2", DateAlignedSeries::daily("sku-2", date(1), &[1.0, 2.0]).unwrap());

        let result = AnomalySweep::default()
            .run(&provider, &["sku-1", "flat", "sku-2", "sku-9"], date(1), date(30))
            .unwrap();

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.for_group("sku-1").count(), 1);
        assert_eq!(result.records[0].start, date(13));
        let failed: Vec<&str> = result.failures.iter().map(|f| f.unit.as_str()).collect();
        assert_eq!(failed, vec!["sku-2", "sku-9"]);
    }
}
