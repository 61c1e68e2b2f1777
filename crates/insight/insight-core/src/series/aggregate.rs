//! Calendar bucketing of a series.

use chrono::NaiveDate;
use insight_spi::{AggregatedSeries, AggregationMethod, DateAlignedSeries, Granularity, Period};

/// Group `series` into daily, ISO-week or calendar-month periods.
///
/// Periods are chronological and non-overlapping. A period with no source
/// observation is omitted rather than emitted as zero.
pub fn aggregate(
    series: &DateAlignedSeries,
    granularity: Granularity,
    method: AggregationMethod,
) -> AggregatedSeries {
    let mut periods: Vec<Period> = Vec::new();
    let mut current: Option<Bucket> = None;

    for point in series.points() {
        let (start, end) = granularity.bounds(point.date);
        match current.as_mut() {
            Some(bucket) if bucket.start == start => bucket.push(point.value),
            _ => {
                if let Some(done) = current.take() {
                    periods.push(done.finish(granularity, method));
                }
                current = Some(Bucket::new(start, end, point.value));
            }
        }
    }
    if let Some(done) = current {
        periods.push(done.finish(granularity, method));
    }

    AggregatedSeries {
        name: series.name().to_string(),
        granularity,
        method,
        periods,
    }
}

/// Running accumulator for one period.
struct Bucket {
    start: NaiveDate,
    end: NaiveDate,
    sum: f64,
    last: f64,
    count: usize,
}

impl Bucket {
    fn new(start: NaiveDate, end: NaiveDate, value: f64) -> Self {
        Self {
            start,
            end,
            sum: value,
            last: value,
            count: 1,
        }
    }

    fn push(&mut self, value: f64) {
        self.sum += value;
        self.last = value;
        self.count += 1;
    }

    fn finish(self, granularity: Granularity, method: AggregationMethod) -> Period {
        let value = match method {
            AggregationMethod::Sum => self.sum,
            AggregationMethod::Mean => self.sum / self.count as f64,
            AggregationMethod::Last => self.last,
        };
        Period {
            label: granularity.label(self.start),
            start: self.start,
            end: self.end,
            value,
            count: self.count,
        }
    }
}
