//! Single-lag correlation analysis.

use insight_api::CorrelationConfig;
use insight_spi::{AnalysisError, CorrelationResult, CorrelationStrength, DateAlignedSeries, Result};
use tracing::debug;

use crate::series::align_with;
use crate::stats::{apply_transform, correlation_p_value, pearson};

/// Pearson correlation between a factor and a target at one lag.
///
/// Lags follow [`align_with`]: a positive lag pairs the factor with the
/// target observed `lag` periods later.
#[derive(Debug, Clone, Default)]
pub struct CorrelationAnalyzer {
    config: CorrelationConfig,
}

impl CorrelationAnalyzer {
    pub fn new(config: CorrelationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    /// Correlate `factor` with `target` at `lag`.
    pub fn analyze(
        &self,
        factor: &DateAlignedSeries,
        target: &DateAlignedSeries,
        lag: i32,
    ) -> Result<CorrelationResult> {
        self.config.validate()?;
        let factor = apply_transform(factor, self.config.transform)?;
        let target = apply_transform(target, self.config.transform)?;
        self.analyze_prepared(&factor, &target, lag)
    }

    /// Correlate series that were already validated and transformed.
    pub(crate) fn analyze_prepared(
        &self,
        factor: &DateAlignedSeries,
        target: &DateAlignedSeries,
        lag: i32,
    ) -> Result<CorrelationResult> {
        let pairs = align_with(factor, target, lag, self.config.granularity);
        let required = self.config.effective_min_samples();
        if pairs.n < required {
            return Err(AnalysisError::insufficient(required, pairs.n));
        }

        let r = pearson(&pairs.x, &pairs.y)?;
        let p_value = correlation_p_value(r, pairs.n)?;
        debug!(factor = factor.name(), lag, r, p_value, n = pairs.n, "correlation computed");

        Ok(CorrelationResult {
            factor: factor.name().to_string(),
            lag,
            r,
            p_value,
            fdr_p_value: None,
            n: pairs.n,
            strength: self.strength(r),
            significant: p_value < self.config.significance,
            interpretation: self.interpret(r, p_value),
        })
    }

    /// Strength band of |r|.
    pub fn strength(&self, r: f64) -> CorrelationStrength {
        let magnitude = r.abs();
        if magnitude >= self.config.strong_threshold {
            CorrelationStrength::Strong
        } else if magnitude >= self.config.moderate_threshold {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Weak
        }
    }

    /// Qualitative reading of `r` judged at p-value `p`.
    ///
    /// e.g. `strong positive correlation, statistically significant (p = 0.0012)`
    pub fn interpret(&self, r: f64, p: f64) -> String {
        let sign = if r < 0.0 { "negative" } else { "positive" };
        let verdict = if p < self.config.significance {
            "statistically significant"
        } else {
            "not statistically significant"
        };
        format!("{} {} correlation, {} ({})", self.strength(r), sign, verdict, format_p(p))
    }

    /// Re-judge a result against an adjusted p-value.
    pub(crate) fn apply_adjusted(&self, result: &mut CorrelationResult, adjusted: f64) {
        result.fdr_p_value = Some(adjusted);
        result.significant = adjusted < self.config.significance;
        result.interpretation = self.interpret(result.r, adjusted);
    }
}

fn format_p(p: f64) -> String {
    if p < 1e-4 {
        "p < 0.0001".to_string()
    } else {
        format!("p = {:.4}", p)
    }
}
