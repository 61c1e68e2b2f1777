//! Date-keyed series types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// A single dated observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Observed value
    pub value: f64,
}

impl DataPoint {
    /// Create a new data point.
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Ordered sequence of dated observations.
///
/// Dates are strictly increasing with no duplicates and every value is
/// finite. Missing dates are simply absent; nothing is ever gap-filled.
/// Every transform produces a new series, the original is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesRecord", into = "SeriesRecord")]
pub struct DateAlignedSeries {
    name: String,
    points: Vec<DataPoint>,
}

/// Unvalidated wire shape of a series.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SeriesRecord {
    name: String,
    points: Vec<DataPoint>,
}

impl TryFrom<SeriesRecord> for DateAlignedSeries {
    type Error = AnalysisError;

    fn try_from(record: SeriesRecord) -> Result<Self> {
        DateAlignedSeries::new(record.name, record.points)
    }
}

impl From<DateAlignedSeries> for SeriesRecord {
    fn from(series: DateAlignedSeries) -> Self {
        Self {
            name: series.name,
            points: series.points,
        }
    }
}

impl DateAlignedSeries {
    /// Create a series, validating ordering and finiteness.
    pub fn new(name: impl Into<String>, points: Vec<DataPoint>) -> Result<Self> {
        let name = name.into();

        if let Some(bad) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(AnalysisError::invalid(
                "points",
                format!("non-finite value on {} in series '{}'", bad.date, name),
            ));
        }

        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(AnalysisError::invalid(
                "points",
                format!(
                    "dates must be strictly increasing in series '{}' ({} then {})",
                    name, pair[0].date, pair[1].date
                ),
            ));
        }

        Ok(Self { name, points })
    }

    /// Create a series from `(date, value)` pairs in chronological order.
    pub fn from_pairs<I>(name: impl Into<String>, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let points = pairs
            .into_iter()
            .map(|(date, value)| DataPoint::new(date, value))
            .collect();
        Self::new(name, points)
    }

    /// Create a series of consecutive daily values starting at `start`.
    pub fn daily(name: impl Into<String>, start: NaiveDate, values: &[f64]) -> Result<Self> {
        let points = start
            .iter_days()
            .zip(values.iter())
            .map(|(date, &value)| DataPoint::new(date, value))
            .collect();
        Self::new(name, points)
    }

    /// Series name (factor or target label).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Observations in chronological order.
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Observation dates.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Observation values.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// First observed date.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    /// Last observed date.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Value observed on `date`, if any.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by(|p| p.date.cmp(&date))
            .ok()
            .map(|idx| self.points[idx].value)
    }

    /// Calendar days between the first and last observation, inclusive.
    pub fn span_days(&self) -> i64 {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => last.signed_duration_since(first).num_days() + 1,
            _ => 0,
        }
    }

    /// Observations inside the closed range `[start, end]` as a new series.
    pub fn restrict(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let lo = self.points.partition_point(|p| p.date < start);
        let hi = self.points.partition_point(|p| p.date <= end);
        let points = if lo < hi {
            self.points[lo..hi].to_vec()
        } else {
            Vec::new()
        };
        Self {
            name: self.name.clone(),
            points,
        }
    }

    /// Same observations under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: self.points.clone(),
        }
    }

    /// New series with the same dates and the given values.
    ///
    /// Used by transforms that keep the calendar but replace the values.
    pub fn with_values(&self, dates: &[NaiveDate], values: &[f64]) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(AnalysisError::invalid(
                "values",
                format!("{} dates but {} values", dates.len(), values.len()),
            ));
        }
        let points = dates
            .iter()
            .zip(values.iter())
            .map(|(&date, &value)| DataPoint::new(date, value))
            .collect();
        Self::new(self.name.clone(), points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_new_accepts_increasing_dates() {
        let series =
            DateAlignedSeries::from_pairs("sales", vec![(day(1), 1.0), (day(3), 2.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.name(), "sales");
        assert_eq!(series.values(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_new_rejects_duplicate_dates() {
        let result = DateAlignedSeries::from_pairs("sales", vec![(day(1), 1.0), (day(1), 2.0)]);
        assert!(matches!(result, Err(AnalysisError::InvalidParameter { .. })));
    }

    #[test]
    fn test_new_rejects_unsorted_dates() {
        let result = DateAlignedSeries::from_pairs("sales", vec![(day(4), 1.0), (day(2), 2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_non_finite_values() {
        let result = DateAlignedSeries::from_pairs("sales", vec![(day(1), f64::NAN)]);
        assert!(result.is_err());
        let result = DateAlignedSeries::from_pairs("sales", vec![(day(1), f64::INFINITY)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_daily_constructor() {
        let series = DateAlignedSeries::daily("x", day(30), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(series.first_date(), Some(day(30)));
        assert_eq!(
            series.last_date(),
            Some(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap())
        );
        assert_eq!(series.span_days(), 3);
    }

    #[test]
    fn test_value_on_missing_date() {
        let series =
            DateAlignedSeries::from_pairs("x", vec![(day(1), 5.0), (day(5), 7.0)]).unwrap();
        assert_eq!(series.value_on(day(5)), Some(7.0));
        assert_eq!(series.value_on(day(3)), None);
    }

    #[test]
    fn test_restrict_is_closed_range_and_non_mutating() {
        let series = DateAlignedSeries::daily("x", day(1), &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let sub = series.restrict(day(2), day(4));
        assert_eq!(sub.values(), vec![2.0, 3.0, 4.0]);
        assert_eq!(series.len(), 5);
    }

    #[test]
    fn test_restrict_empty_when_inverted() {
        let series = DateAlignedSeries::daily("x", day(1), &[1.0, 2.0, 3.0]).unwrap();
        assert!(series.restrict(day(3), day(1)).is_empty());
    }

    #[test]
    fn test_empty_series_span() {
        let series = DateAlignedSeries::new("empty", Vec::new()).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.span_days(), 0);
        assert_eq!(series.first_date(), None);
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let series = DateAlignedSeries::daily("x", day(1), &[1.0, 2.0]).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        let back: DateAlignedSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back, series);

        let bad = r#"{"name":"x","points":[{"date":"2024-03-02","value":1.0},{"date":"2024-03-01","value":2.0}]}"#;
        assert!(serde_json::from_str::<DateAlignedSeries>(bad).is_err());
    }
}
