//! Bidirectional Granger causality F-test.

use insight_api::GrangerConfig;
use insight_spi::{
    AnalysisError, CausalDirection, DateAlignedSeries, GrangerResult, GrangerStatistic, Result,
};
use tracing::debug;

use crate::series::align;
use crate::stats::{apply_transform, f_survival, ols_residual_ss};

/// Residual sum of squares below this share of the target's total sum of
/// squares counts as an exact fit.
const EXACT_FIT_RATIO: f64 = 1e-12;

/// Tests whether the past of one series improves the prediction of another.
///
/// Both series are paired on their common dates; the order of those dates
/// is the time index. For order `p`, the restricted model regresses
/// `B_t` on `{1, B_{t-1..t-p}}` and the unrestricted model adds
/// `A_{t-1..t-p}`. With `m = n - p` usable rows,
/// `F = ((RSS_r - RSS_u) / p) / (RSS_u / (m - 2p - 1))`.
#[derive(Debug, Clone, Default)]
pub struct GrangerCausalityTester {
    config: GrangerConfig,
}

impl GrangerCausalityTester {
    pub fn new(config: GrangerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GrangerConfig {
        &self.config
    }

    /// Test A -> B and B -> A.
    pub fn test(&self, a: &DateAlignedSeries, b: &DateAlignedSeries) -> Result<GrangerResult> {
        self.config.validate()?;
        let a = apply_transform(a, self.config.transform)?;
        let b = apply_transform(b, self.config.transform)?;

        let pairs = align(&a, &b, 0);
        let required = self.config.required_samples();
        if pairs.n < required {
            return Err(AnalysisError::insufficient(required, pairs.n));
        }

        let p = self.config.lag_order;
        let a_to_b = directional_test(&pairs.x, &pairs.y, p)?;
        let b_to_a = directional_test(&pairs.y, &pairs.x, p)?;
        let direction =
            CausalDirection::classify(a_to_b.p_value, b_to_a.p_value, self.config.significance);

        debug!(
            a = a.name(),
            b = b.name(),
            lag_order = p,
            n = pairs.n,
            p_a_to_b = a_to_b.p_value,
            p_b_to_a = b_to_a.p_value,
            %direction,
            "granger test complete"
        );

        Ok(GrangerResult {
            series_a: a.name().to_string(),
            series_b: b.name().to_string(),
            lag_order: p,
            n: pairs.n,
            a_to_b,
            b_to_a,
            direction,
        })
    }
}

/// F-test of whether lags of `cause` help predict `effect`.
fn directional_test(cause: &[f64], effect: &[f64], p: usize) -> Result<GrangerStatistic> {
    let n = effect.len();
    let m = n.saturating_sub(p);
    if m < 2 * p + 2 {
        return Err(AnalysisError::insufficient(3 * p + 2, n));
    }

    let mut restricted = Vec::with_capacity(m);
    let mut unrestricted = Vec::with_capacity(m);
    let mut target = Vec::with_capacity(m);
    for t in p..n {
        let mut row = Vec::with_capacity(2 * p + 1);
        row.push(1.0);
        row.extend((1..=p).map(|k| effect[t - k]));
        restricted.push(row.clone());
        row.extend((1..=p).map(|k| cause[t - k]));
        unrestricted.push(row);
        target.push(effect[t]);
    }

    let rss_r = ols_residual_ss(&restricted, &target)?;
    let rss_u = ols_residual_ss(&unrestricted, &target)?;

    let target_mean = target.iter().sum::<f64>() / m as f64;
    let tss: f64 = target.iter().map(|y| (y - target_mean).powi(2)).sum();
    if rss_u <= EXACT_FIT_RATIO * tss {
        return Err(AnalysisError::degenerate(
            "unrestricted model fits exactly; F statistic is unbounded",
        ));
    }

    let df1 = p;
    let df2 = m - 2 * p - 1;
    let numerator = ((rss_r - rss_u) / df1 as f64).max(0.0);
    let f_statistic = numerator / (rss_u / df2 as f64);
    let p_value = f_survival(f_statistic, df1 as f64, df2 as f64)?;

    Ok(GrangerStatistic {
        f_statistic,
        p_value,
        df1,
        df2,
    })
}
