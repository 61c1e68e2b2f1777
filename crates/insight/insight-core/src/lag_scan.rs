//! Lag range scanning with per-scan FDR correction.

use std::cmp::Ordering;

use insight_api::LagScanConfig;
use insight_spi::{CorrelationResult, DateAlignedSeries, LagScanResult, Result, UnitFailure};
use rayon::prelude::*;
use tracing::debug;

use crate::correlation::CorrelationAnalyzer;
use crate::stats::{apply_transform, benjamini_hochberg};

/// |r| values closer than this rank as ties.
const RANK_RESOLUTION: f64 = 1e12;

/// Scans every lag in `[-max_lag, +max_lag]` and ranks the results.
///
/// Each lag is an independent unit: one that cannot be evaluated is
/// recorded in `skipped` and the rest of the scan completes. The
/// Benjamini-Hochberg correction runs over exactly the surviving lags, and
/// significance is judged on the adjusted p-value.
#[derive(Debug, Clone, Default)]
pub struct LagScanner {
    config: LagScanConfig,
}

impl LagScanner {
    pub fn new(config: LagScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LagScanConfig {
        &self.config
    }

    /// Scan `factor` against `target`.
    pub fn scan(&self, factor: &DateAlignedSeries, target: &DateAlignedSeries) -> Result<LagScanResult> {
        self.config.validate()?;
        let transform = self.config.correlation.transform;
        let factor = apply_transform(factor, transform)?;
        let target = apply_transform(target, transform)?;
        self.scan_prepared(&factor, &target)
    }

    /// Scan series that were already validated and transformed.
    pub(crate) fn scan_prepared(
        &self,
        factor: &DateAlignedSeries,
        target: &DateAlignedSeries,
    ) -> Result<LagScanResult> {
        let analyzer = CorrelationAnalyzer::new(self.config.correlation.clone());

        let outcomes: Vec<(i32, Result<CorrelationResult>)> = self
            .config
            .lags()
            .into_par_iter()
            .map(|lag| (lag, analyzer.analyze_prepared(factor, target, lag)))
            .collect();

        let mut ranked = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for (lag, outcome) in outcomes {
            match outcome {
                Ok(result) => ranked.push(result),
                Err(reason) => {
                    debug!(factor = factor.name(), lag, %reason, "lag skipped");
                    skipped.push(UnitFailure::new(lag, reason));
                }
            }
        }

        let raw: Vec<f64> = ranked.iter().map(|r| r.p_value).collect();
        let adjusted = benjamini_hochberg(&raw)?;
        for (result, adj) in ranked.iter_mut().zip(adjusted) {
            analyzer.apply_adjusted(result, adj);
        }

        ranked.sort_by(rank_order);

        if let Some(best) = ranked.first() {
            debug!(
                factor = factor.name(),
                target = target.name(),
                best_lag = best.lag,
                r = best.r,
                tested = ranked.len(),
                skipped = skipped.len(),
                "lag scan complete"
            );
        }

        Ok(LagScanResult { ranked, skipped })
    }
}

/// |r| descending, then smaller |lag|, then positive lag before negative.
fn rank_order(a: &CorrelationResult, b: &CorrelationResult) -> Ordering {
    rank_key(b.r)
        .cmp(&rank_key(a.r))
        .then(a.lag.unsigned_abs().cmp(&b.lag.unsigned_abs()))
        .then(b.lag.cmp(&a.lag))
}

fn rank_key(r: f64) -> i64 {
    (r.abs() * RANK_RESOLUTION).round() as i64
}
