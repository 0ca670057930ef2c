use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, Result};

/// half-open date range [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = CalcError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(CalcError::domain(format!(
                "range end {} precedes start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// actual calendar days covered
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// whether a split starts with pro-rata days bridging to a period boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadingDays {
    /// whole years and months are counted from the start date
    Off,
    /// pro-rata days up to the first day of the next calendar month
    ToMonthStart,
    /// pro-rata days up to the next occurrence of this day of month
    ToDayOfMonth(u32),
}

/// what to do when a lookup falls outside the known anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutOfRangePolicy {
    /// fail with an out-of-range error
    Error,
    /// use the nearest anchor
    Clamp,
}
