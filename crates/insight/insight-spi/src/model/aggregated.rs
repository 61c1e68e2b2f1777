//! Aggregated (bucketed) series types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AggregationMethod, DataPoint, DateAlignedSeries, Granularity};
use crate::error::Result;

/// One aggregated period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Period label (`2024-03-05`, `2024-W10` or `2024-03`)
    pub label: String,
    /// First calendar day of the period
    pub start: NaiveDate,
    /// Last calendar day of the period
    pub end: NaiveDate,
    /// Aggregated value
    pub value: f64,
    /// Number of source observations in the period
    pub count: usize,
}

/// A series grouped into chronological, non-overlapping periods.
///
/// Periods without source observations are omitted rather than emitted
/// as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    pub name: String,
    pub granularity: Granularity,
    pub method: AggregationMethod,
    pub periods: Vec<Period>,
}

impl AggregatedSeries {
    /// Number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// True when no period has data.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Aggregated values in period order.
    pub fn values(&self) -> Vec<f64> {
        self.periods.iter().map(|p| p.value).collect()
    }

    /// Re-key the periods by their start date.
    ///
    /// Lag analysis on the result should shift by the same granularity.
    pub fn to_series(&self) -> Result<DateAlignedSeries> {
        let points = self
            .periods
            .iter()
            .map(|p| DataPoint::new(p.start, p.value))
            .collect();
        DateAlignedSeries::new(self.name.clone(), points)
    }
}
