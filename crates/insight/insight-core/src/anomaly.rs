//! Granularity-aware z-score anomaly detection.

use insight_api::{AnomalyConfig, BaselineMode};
use insight_spi::{
    AggregatedSeries, AggregationMethod, AnalysisError, AnomalyKind, AnomalyRecord,
    AnomalySeverity, DateAlignedSeries, Result,
};
use tracing::debug;

use crate::series::aggregate;
use crate::stats::{is_constant, mean, std_dev};

/// Baseline a single period was scored against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodScore {
    /// Baseline mean
    pub expected: f64,
    /// Baseline sample standard deviation
    pub std_dev: f64,
    pub z_score: f64,
}

/// Flags periods whose summed value lies far from the baseline of its
/// peers.
///
/// The raw series is summed into periods of the configured granularity.
/// A period is flagged when `|z| >= threshold`. A baseline with no spread
/// scores nothing, so a constant series never yields anomalies.
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
}

impl AnomalyDetector {
    pub fn new(config: AnomalyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    /// Detect anomalous periods of `series`.
    ///
    /// `group` is copied into every record unchanged.
    pub fn detect(
        &self,
        series: &DateAlignedSeries,
        group: Option<&str>,
    ) -> Result<Vec<AnomalyRecord>> {
        self.config.validate()?;
        let aggregated = aggregate(series, self.config.granularity, AggregationMethod::Sum);
        self.detect_aggregated(&aggregated, group)
    }

    /// Detect anomalies in an already aggregated series.
    pub fn detect_aggregated(
        &self,
        aggregated: &AggregatedSeries,
        group: Option<&str>,
    ) -> Result<Vec<AnomalyRecord>> {
        let scores = self.score(aggregated)?;

        let records: Vec<AnomalyRecord> = aggregated
            .periods
            .iter()
            .zip(scores)
            .filter_map(|(period, score)| {
                let score = score?;
                if score.z_score.abs() < self.config.threshold {
                    return None;
                }
                Some(AnomalyRecord {
                    group: group.map(str::to_string),
                    period: period.label.clone(),
                    start: period.start,
                    end: period.end,
                    actual: period.value,
                    expected: score.expected,
                    z_score: score.z_score,
                    severity: AnomalySeverity::from_z(score.z_score),
                    kind: if period.value > score.expected {
                        AnomalyKind::Spike
                    } else {
                        AnomalyKind::Drop
                    },
                })
            })
            .collect();

        debug!(
            series = %aggregated.name,
            group,
            periods = aggregated.len(),
            anomalies = records.len(),
            "anomaly detection complete"
        );
        Ok(records)
    }

    /// Baseline score of every period, `None` where the baseline has no
    /// spread.
    pub fn score(&self, aggregated: &AggregatedSeries) -> Result<Vec<Option<PeriodScore>>> {
        if aggregated.len() < self.config.min_periods {
            return Err(AnalysisError::insufficient(
                self.config.min_periods,
                aggregated.len(),
            ));
        }
        let values = aggregated.values();

        match self.config.baseline {
            BaselineMode::Global => {
                if is_constant(&values) {
                    return Ok(vec![None; values.len()]);
                }
                let expected = mean(&values)?;
                let sd = std_dev(&values)?;
                Ok(values
                    .iter()
                    .map(|&v| Some(score_against(v, expected, sd)))
                    .collect())
            }
            BaselineMode::LeaveOneOut => values
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let peers: Vec<f64> = values
                        .iter()
                        .enumerate()
                        .filter(|&(j, _)| j != i)
                        .map(|(_, &p)| p)
                        .collect();
                    if is_constant(&peers) {
                        return Ok(None);
                    }
                    Ok(Some(score_against(v, mean(&peers)?, std_dev(&peers)?)))
                })
                .collect(),
        }
    }
}

fn score_against(value: f64, expected: f64, std_dev: f64) -> PeriodScore {
    PeriodScore {
        expected,
        std_dev,
        z_score: (value - expected) / std_dev,
    }
}
