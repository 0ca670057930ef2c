use serde::{Deserialize, Serialize};

use crate::dates::days_30_360;
use crate::decimal::{Amount, Rate, RoundingPolicy};
use crate::errors::Result;
use crate::interest::compound::Compounding;
use crate::interest::splitter::{PeriodSegment, PeriodSplitter, SegmentKind};
use crate::interest::{month_interest, pro_rata_interest, year_interest};
use crate::types::{DateRange, LeadingDays};

/// day count convention for interest calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// the whole range is one run of actual days / 365
    ActualDays,
    /// whole years and months, then actual days / 365 for the remainder
    ActualPeriods,
    /// whole years and months, then 30 days per month / 360 days per year
    EqualMonths,
}

impl DayCountConvention {
    /// get year basis for the convention
    pub fn year_basis(&self) -> u32 {
        match self {
            DayCountConvention::ActualDays | DayCountConvention::ActualPeriods => 365,
            DayCountConvention::EqualMonths => 360,
        }
    }

    /// calculate days in a range based on convention
    pub fn day_count(&self, range: DateRange) -> i64 {
        match self {
            DayCountConvention::ActualDays | DayCountConvention::ActualPeriods => range.days(),
            DayCountConvention::EqualMonths => days_30_360(range.start(), range.end()),
        }
    }

    /// interest on a fixed balance for one segment produced by the splitter
    ///
    /// whole years use the annual rate directly. whole months use the equivalent
    /// monthly rate when interest compounds monthly and fall back to pro-rata days
    /// otherwise, so that a run without monthly compounding never drifts from
    /// simple interest.
    pub fn segment_interest(
        &self,
        segment: &PeriodSegment,
        balance: Amount,
        rate: Rate,
        compounding: Compounding,
        rounding: RoundingPolicy,
    ) -> Result<Amount> {
        match segment.kind {
            SegmentKind::Year => year_interest(balance, rate, rounding),
            SegmentKind::Month if compounding == Compounding::Monthly => {
                month_interest(balance, rate, rounding)
            }
            SegmentKind::Month => {
                let days = match self {
                    DayCountConvention::EqualMonths => 30,
                    _ => segment.range.days(),
                };
                pro_rata_interest(balance, rate, days, self.year_basis(), rounding)
            }
            SegmentKind::Days(days) => {
                pro_rata_interest(balance, rate, days, self.year_basis(), rounding)
            }
        }
    }

    /// interest on a fixed amount over a whole range, as the sum of its segments
    pub fn interest(
        &self,
        range: DateRange,
        amount: Amount,
        rate: Rate,
        compounding: Compounding,
        leading: LeadingDays,
        rounding: RoundingPolicy,
    ) -> Result<Amount> {
        let segments = PeriodSplitter::new(*self, leading).split(range)?;
        let mut total = Amount::ZERO;
        for segment in &segments {
            total += self.segment_interest(segment, amount, rate, compounding, rounding)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange::new(start, end).unwrap()
    }

    #[test]
    fn test_day_count_conventions() {
        let january = range(date(2024, 1, 1), date(2024, 2, 1));

        assert_eq!(DayCountConvention::ActualDays.day_count(january), 31);
        assert_eq!(DayCountConvention::ActualPeriods.day_count(january), 31);
        assert_eq!(DayCountConvention::EqualMonths.day_count(january), 30);

        assert_eq!(DayCountConvention::ActualDays.year_basis(), 365);
        assert_eq!(DayCountConvention::EqualMonths.year_basis(), 360);
    }

    #[test]
    fn test_actual_days_is_simple_interest() {
        // 10000 * 0.05 * 366 / 365 = 501.37
        let interest = DayCountConvention::ActualDays
            .interest(
                range(date(2024, 1, 1), date(2025, 1, 1)),
                Amount::from_minor(10_000),
                Rate::from_percentage(5),
                Compounding::None,
                LeadingDays::Off,
                RoundingPolicy::HalfEven,
            )
            .unwrap();
        assert_eq!(interest, Amount::from_minor(501));
    }

    #[test]
    fn test_actual_periods_counts_a_leap_year_as_one_year() {
        let interest = DayCountConvention::ActualPeriods
            .interest(
                range(date(2024, 1, 1), date(2025, 1, 1)),
                Amount::from_minor(10_000),
                Rate::from_percentage(5),
                Compounding::None,
                LeadingDays::Off,
                RoundingPolicy::HalfEven,
            )
            .unwrap();
        assert_eq!(interest, Amount::from_minor(500));
    }

    #[test]
    fn test_monthly_compounding_values_a_month_at_the_equivalent_rate() {
        let segment = PeriodSegment {
            range: range(date(2022, 12, 8), date(2023, 1, 8)),
            kind: SegmentKind::Month,
            convention: DayCountConvention::ActualPeriods,
        };
        let compounded = DayCountConvention::ActualPeriods
            .segment_interest(
                &segment,
                Amount::from_minor(130_000),
                Rate::from_percentage(5),
                Compounding::Monthly,
                RoundingPolicy::HalfEven,
            )
            .unwrap();
        assert_eq!(compounded, Amount::from_minor(530));

        // 130000 * 0.05 * 31 / 365 = 552.05
        let simple = DayCountConvention::ActualPeriods
            .segment_interest(
                &segment,
                Amount::from_minor(130_000),
                Rate::from_percentage(5),
                Compounding::None,
                RoundingPolicy::HalfEven,
            )
            .unwrap();
        assert_eq!(simple, Amount::from_minor(552));
    }

    #[test]
    fn test_equal_months_month_is_thirty_days() {
        let segment = PeriodSegment {
            range: range(date(2023, 1, 1), date(2023, 2, 1)),
            kind: SegmentKind::Month,
            convention: DayCountConvention::EqualMonths,
        };
        // 36000 * 0.1 * 30 / 360 = 300
        let interest = DayCountConvention::EqualMonths
            .segment_interest(
                &segment,
                Amount::from_minor(36_000),
                Rate::from_percentage(10),
                Compounding::Yearly,
                RoundingPolicy::HalfEven,
            )
            .unwrap();
        assert_eq!(interest, Amount::from_minor(300));
    }

    #[test]
    fn test_empty_range_has_no_interest() {
        let interest = DayCountConvention::EqualMonths
            .interest(
                range(date(2023, 1, 1), date(2023, 1, 1)),
                Amount::from_minor(36_000),
                Rate::from_percentage(10),
                Compounding::Monthly,
                LeadingDays::ToMonthStart,
                RoundingPolicy::HalfEven,
            )
            .unwrap();
        assert_eq!(interest, Amount::ZERO);
    }
}
