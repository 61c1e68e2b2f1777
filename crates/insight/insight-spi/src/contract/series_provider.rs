//! Series provider trait definition.

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::DateAlignedSeries;

/// Source of named, dated series.
///
/// Implementations return the observations of `id` inside the closed range
/// `[start, end]` exactly as stored: missing dates stay missing. Failures are
/// reported as `AnalysisError::SeriesUnavailable`.
pub trait SeriesProvider: Send + Sync {
    /// Fetch the series `id` restricted to `[start, end]`.
    fn fetch(&self, id: &str, start: NaiveDate, end: NaiveDate) -> Result<DateAlignedSeries>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    struct MockProvider;

    impl SeriesProvider for MockProvider {
        fn fetch(&self, id: &str, start: NaiveDate, end: NaiveDate) -> Result<DateAlignedSeries> {
            if id != "sales" {
                return Err(AnalysisError::unavailable(id, "unknown series"));
            }
            let full = DateAlignedSeries::daily(
                "sales",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                &[1.0, 2.0, 3.0, 4.0],
            )?;
            Ok(full.restrict(start, end))
        }
    }

    #[test]
    fn test_provider_is_object_safe() {
        let provider: Box<dyn SeriesProvider> = Box::new(MockProvider);
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let series = provider.fetch("sales", start, end).unwrap();
        assert_eq!(series.values(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_provider_unknown_id() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = MockProvider.fetch("weather", day, day).unwrap_err();
        assert!(matches!(err, AnalysisError::SeriesUnavailable { .. }));
    }
}
