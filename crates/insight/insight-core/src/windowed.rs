//! Lag scanning inside sliding calendar windows.

use chrono::{Days, NaiveDate};
use insight_api::{LagScanConfig, WindowConfig};
use insight_spi::{
    AnalysisError, DateAlignedSeries, Result, UnitFailure, WindowResult, WindowScanResult,
};
use rayon::prelude::*;
use tracing::debug;

use crate::lag_scan::LagScanner;
use crate::stats::apply_transform;

/// Re-runs a [`LagScanner`] inside successive calendar windows.
///
/// Windows cover the union of both series' date ranges. The first starts
/// on the earliest date, each spans `window_days` days (closed range) and
/// the next starts `step_days` later. Generation stops after the first
/// window that reaches the last date, so the final window may be partial.
/// A window whose scan has no surviving lag is recorded in `skipped`.
#[derive(Debug, Clone, Default)]
pub struct WindowedLagScanner {
    scan: LagScanConfig,
    window: WindowConfig,
}

impl WindowedLagScanner {
    pub fn new(scan: LagScanConfig, window: WindowConfig) -> Self {
        Self { scan, window }
    }

    pub fn window_config(&self) -> &WindowConfig {
        &self.window
    }

    /// Scan `factor` against `target` window by window.
    pub fn scan(
        &self,
        factor: &DateAlignedSeries,
        target: &DateAlignedSeries,
    ) -> Result<WindowScanResult> {
        self.scan.validate()?;
        self.window.validate()?;

        let transform = self.scan.correlation.transform;
        let factor = apply_transform(factor, transform)?;
        let target = apply_transform(target, transform)?;

        let (span_start, span_end) = union_span(&factor, &target).ok_or_else(|| {
            AnalysisError::insufficient(self.scan.correlation.effective_min_samples(), 0)
        })?;
        let bounds = window_bounds(
            span_start,
            span_end,
            self.window.window_days,
            self.window.step_days,
        );

        let scanner = LagScanner::new(self.scan.clone());
        let outcomes: Vec<((NaiveDate, NaiveDate), Result<WindowResult>)> = bounds
            .into_par_iter()
            .map(|(start, end)| {
                let factor = factor.restrict(start, end);
                let target = target.restrict(start, end);
                ((start, end), scan_window(&scanner, &factor, &target, start, end))
            })
            .collect();

        let mut windows = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for (unit, outcome) in outcomes {
            match outcome {
                Ok(window) => windows.push(window),
                Err(reason) => {
                    debug!(start = %unit.0, end = %unit.1, %reason, "window skipped");
                    skipped.push(UnitFailure::new(unit, reason));
                }
            }
        }

        debug!(
            factor = factor.name(),
            windows = windows.len(),
            skipped = skipped.len(),
            "windowed scan complete"
        );
        Ok(WindowScanResult { windows, skipped })
    }
}

fn scan_window(
    scanner: &LagScanner,
    factor: &DateAlignedSeries,
    target: &DateAlignedSeries,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<WindowResult> {
    let mut scan = scanner.scan_prepared(factor, target)?;
    let lags_tested = scan.lags_tested();
    if scan.ranked.is_empty() {
        // Report why the most immediate lag failed
        let reason = scan
            .skipped
            .into_iter()
            .min_by_key(|s| (s.unit.unsigned_abs(), -s.unit))
            .map(|s| s.reason)
            .unwrap_or_else(|| AnalysisError::insufficient(3, 0));
        return Err(reason);
    }
    let best = scan.ranked.swap_remove(0);
    Ok(WindowResult {
        start,
        end,
        best,
        lags_tested,
    })
}

/// Earliest and latest date across both series.
fn union_span(a: &DateAlignedSeries, b: &DateAlignedSeries) -> Option<(NaiveDate, NaiveDate)> {
    let start = [a.first_date(), b.first_date()].into_iter().flatten().min()?;
    let end = [a.last_date(), b.last_date()].into_iter().flatten().max()?;
    Some((start, end))
}

/// Closed window ranges covering `[span_start, span_end]`.
///
/// The last window is clipped to `span_end`.
pub fn window_bounds(
    span_start: NaiveDate,
    span_end: NaiveDate,
    window_days: u32,
    step_days: u32,
) -> Vec<(NaiveDate, NaiveDate)> {
    let mut bounds = Vec::new();
    if window_days == 0 || step_days == 0 || span_end < span_start {
        return bounds;
    }

    let mut start = span_start;
    loop {
        let end = start
            .checked_add_days(Days::new(u64::from(window_days) - 1))
            .map_or(span_end, |end| end.min(span_end));
        bounds.push((start, end));
        if end >= span_end {
            break;
        }
        match start.checked_add_days(Days::new(u64::from(step_days))) {
            Some(next) if next <= span_end => start = next,
            _ => break,
        }
    }
    bounds
}
