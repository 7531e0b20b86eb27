//! Date ranges and calendar-month bucketing.

use chrono::{Datelike, Months, NaiveDate};
use fingraph_common::{FinGraphError, Result};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

/// Label format for month buckets, e.g. `Nov 2023`.
pub const MONTH_LABEL_FORMAT: &str = "%b %Y";

/// Inclusive date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting a start after the end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(FinGraphError::invalid_range(start, end));
        }
        Ok(Self { start, end })
    }

    /// The range from day 1 of the month `months` before `today`, up to `today`.
    pub fn default_for(today: NaiveDate, months: u32) -> Self {
        let start = first_of_month(today)
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    /// First day of the range.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterate the calendar months this range touches.
    pub fn months(&self) -> MonthIter {
        MonthIter::new(self)
    }
}

/// One calendar month of a range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthBucket {
    /// Day 1 of the month.
    pub first_day: NaiveDate,
    /// Last calendar day of the month.
    pub last_day: NaiveDate,
    /// Display label, e.g. `Feb 2024`.
    pub label: String,
}

impl MonthBucket {
    /// The bucket for the month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let first_day = first_of_month(date);
        Self {
            first_day,
            last_day: last_of_month(first_day),
            label: first_day.format(MONTH_LABEL_FORMAT).to_string(),
        }
    }
}

/// Finite iterator over the month buckets of a [`DateRange`].
///
/// Cloning yields an independent iterator from the same position.
#[derive(Debug, Clone)]
pub struct MonthIter {
    next_first: Option<NaiveDate>,
    end: NaiveDate,
}

impl MonthIter {
    fn new(range: &DateRange) -> Self {
        Self {
            next_first: Some(first_of_month(range.start)),
            end: range.end,
        }
    }
}

impl Iterator for MonthIter {
    type Item = MonthBucket;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.next_first.filter(|first| *first <= self.end)?;
        self.next_first = first.checked_add_months(Months::new(1));
        Some(MonthBucket::containing(first))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next_first {
            Some(first) if first <= self.end => {
                let months = (i64::from(self.end.year()) - i64::from(first.year())) * 12
                    + i64::from(self.end.month0())
                    - i64::from(first.month0())
                    + 1;
                usize::try_from(months).unwrap_or(0)
            }
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthIter {}

impl FusedIterator for MonthIter {}

/// Month buckets between two dates, in chronological order.
///
/// Partial months at both ends are included.
pub fn month_buckets(start: NaiveDate, end: NaiveDate) -> Result<Vec<MonthBucket>> {
    Ok(DateRange::new(start, end)?.months().collect())
}

/// A scalar attached to a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Position of the bucket in its sequence.
    pub bucket_index: usize,
    /// Value for that bucket.
    pub value: f64,
}

/// Attach bucket indices to an aligned series.
pub fn series_points(values: &[f64]) -> Vec<SeriesPoint> {
    values
        .iter()
        .enumerate()
        .map(|(bucket_index, &value)| SeriesPoint {
            bucket_index,
            value,
        })
        .collect()
}

/// Running total, `out[i] = out[i - 1] + values[i]`.
pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |total, value| {
            *total += value;
            Some(*total)
        })
        .collect()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(first_day: NaiveDate) -> NaiveDate {
    first_day
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
