//! calendar arithmetic on plain dates
//!
//! everything here works on `chrono::NaiveDate`: no time zones, no locale,
//! no clock. month arithmetic clamps to the shorter month instead of
//! spilling into the next one.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, Result};

/// check if year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// true on the last calendar day of the month
pub fn is_month_end(date: NaiveDate) -> bool {
    date.day() == days_in_month(date.year(), date.month())
}

/// calendar days from `from` to `to`; `to` may not precede `from`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> Result<i64> {
    if to < from {
        return Err(CalcError::domain(format!(
            "end date {} precedes start date {}",
            to, from
        )));
    }
    Ok((to - from).num_days())
}

/// add (or subtract) months, clamping the day to the target month's length
pub fn add_months(date: NaiveDate, months: i32) -> Result<NaiveDate> {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.ok_or_else(|| {
        CalcError::domain(format!("{} shifted by {} months is out of range", date, months))
    })
}

pub fn add_years(date: NaiveDate, years: i32) -> Result<NaiveDate> {
    let months = years
        .checked_mul(12)
        .ok_or_else(|| CalcError::domain(format!("{} years is out of range", years)))?;
    add_months(date, months)
}

/// the date with the given day of month in the month of `date`, clamped to month end
pub fn with_day_clamped(date: NaiveDate, day: u32) -> Result<NaiveDate> {
    let last = days_in_month(date.year(), date.month());
    NaiveDate::from_ymd_opt(date.year(), date.month(), day.clamp(1, last))
        .ok_or_else(|| CalcError::domain(format!("no day {} in month of {}", day, date)))
}

/// relative distance between two dates in whole years, months and days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elapsed {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl Elapsed {
    pub fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }

    /// whole months, counting a partial month as a full one
    pub fn months_rounded_up(&self) -> u32 {
        if self.days > 0 {
            self.total_months() + 1
        } else {
            self.total_months()
        }
    }
}

/// split the distance `from`..`to` into whole years, whole months and left-over days
pub fn elapsed(from: NaiveDate, to: NaiveDate) -> Result<Elapsed> {
    days_between(from, to)?;

    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    let mut anchor = add_months(from, months)?;
    while anchor > to {
        months -= 1;
        anchor = add_months(from, months)?;
    }
    let months = months.max(0) as u32;

    Ok(Elapsed {
        years: months / 12,
        months: months % 12,
        days: (to - anchor).num_days() as u32,
    })
}

/// months between two dates, rounded up to whole months
pub fn months_between(from: NaiveDate, to: NaiveDate) -> Result<u32> {
    Ok(elapsed(from, to)?.months_rounded_up())
}

/// calculate 30/360 days between dates
pub fn days_30_360(start: NaiveDate, end: NaiveDate) -> i64 {
    let y1 = start.year() as i64;
    let y2 = end.year() as i64;
    let m1 = start.month() as i64;
    let m2 = end.month() as i64;
    let d1 = start.day().min(30) as i64;
    let d2 = if d1 == 30 { end.day().min(30) as i64 } else { end.day() as i64 };

    let days = 360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1);
    days.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_leap_year() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(date(2023, 1, 1), date(2023, 2, 1)).unwrap(), 31);
        assert_eq!(days_between(date(2024, 2, 28), date(2024, 3, 1)).unwrap(), 2);
        assert_eq!(days_between(date(2024, 3, 1), date(2024, 3, 1)).unwrap(), 0);
        assert!(days_between(date(2024, 3, 2), date(2024, 3, 1)).is_err());
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(add_months(date(2023, 1, 31), 1).unwrap(), date(2023, 2, 28));
        assert_eq!(add_months(date(2024, 1, 31), 1).unwrap(), date(2024, 2, 29));
        assert_eq!(add_months(date(2023, 1, 31), 2).unwrap(), date(2023, 3, 31));
        assert_eq!(add_months(date(2023, 3, 31), -1).unwrap(), date(2023, 2, 28));
        assert_eq!(add_years(date(2024, 2, 29), 1).unwrap(), date(2025, 2, 28));
        assert_eq!(add_months(date(2022, 12, 8), 1).unwrap(), date(2023, 1, 8));
    }

    #[test]
    fn test_month_end() {
        assert!(is_month_end(date(2023, 2, 28)));
        assert!(!is_month_end(date(2024, 2, 28)));
        assert!(is_month_end(date(2024, 12, 31)));
        assert_eq!(with_day_clamped(date(2023, 2, 10), 31).unwrap(), date(2023, 2, 28));
    }

    #[test]
    fn test_elapsed() {
        let e = elapsed(date(2022, 12, 4), date(2023, 1, 1)).unwrap();
        assert_eq!(e, Elapsed { years: 0, months: 0, days: 28 });
        assert_eq!(e.months_rounded_up(), 1);

        let e = elapsed(date(2023, 2, 20), date(2023, 4, 1)).unwrap();
        assert_eq!(e, Elapsed { years: 0, months: 1, days: 12 });
        assert_eq!(e.months_rounded_up(), 2);

        let e = elapsed(date(2023, 1, 1), date(2025, 1, 1)).unwrap();
        assert_eq!(e, Elapsed { years: 2, months: 0, days: 0 });
        assert_eq!(months_between(date(2023, 1, 1), date(2025, 1, 1)).unwrap(), 24);
    }

    #[test]
    fn test_30_360_convention() {
        assert_eq!(days_30_360(date(2024, 1, 1), date(2024, 2, 1)), 30);
        assert_eq!(days_30_360(date(2024, 1, 31), date(2024, 2, 29)), 29);
        assert_eq!(days_30_360(date(2024, 2, 28), date(2024, 3, 31)), 33);
    }
}
