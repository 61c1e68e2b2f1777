//! Calendar granularity and aggregation methods.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Time granularity for bucketing and lag shifting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One period per calendar day
    #[default]
    Daily,
    /// ISO weeks, Monday through Sunday
    Weekly,
    /// Calendar months
    Monthly,
}

impl Granularity {
    /// Move `date` by a signed number of whole periods.
    ///
    /// Monthly shifts clamp to the last day of shorter months.
    pub fn shift(&self, date: NaiveDate, periods: i32) -> Option<NaiveDate> {
        let magnitude = periods.unsigned_abs();
        match self {
            Granularity::Daily => shift_days(date, periods >= 0, u64::from(magnitude)),
            Granularity::Weekly => shift_days(date, periods >= 0, u64::from(magnitude) * 7),
            Granularity::Monthly => {
                if periods >= 0 {
                    date.checked_add_months(Months::new(magnitude))
                } else {
                    date.checked_sub_months(Months::new(magnitude))
                }
            }
        }
    }

    /// First and last calendar day of the period containing `date`.
    pub fn bounds(&self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Granularity::Daily => (date, date),
            Granularity::Weekly => {
                let week = date.iso_week();
                let start = NaiveDate::from_isoywd_opt(week.year(), week.week(), Weekday::Mon)
                    .unwrap_or(date);
                let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
                (start, end)
            }
            Granularity::Monthly => {
                let start = date.with_day(1).unwrap_or(date);
                let end = start
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(start);
                (start, end)
            }
        }
    }

    /// Human-readable label of the period containing `date`.
    ///
    /// Daily periods render as `2024-03-05`, weekly as the ISO week
    /// `2024-W10` and monthly as `2024-03`.
    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Daily => date.to_string(),
            Granularity::Weekly => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Granularity::Monthly => format!("{}-{:02}", date.year(), date.month()),
        }
    }
}

fn shift_days(date: NaiveDate, forward: bool, days: u64) -> Option<NaiveDate> {
    if forward {
        date.checked_add_days(Days::new(days))
    } else {
        date.checked_sub_days(Days::new(days))
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Granularity::Daily => "Daily",
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
        };
        write!(f, "{}", s)
    }
}

/// How observations inside one period are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMethod {
    /// Sum of all values (additive quantities such as sales)
    #[default]
    Sum,
    /// Arithmetic mean of the values
    Mean,
    /// Last value observed in the period
    Last,
}
