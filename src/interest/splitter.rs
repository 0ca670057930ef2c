use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::dates::{add_months, with_day_clamped};
use crate::errors::{CalcError, Result};
use crate::interest::day_count::DayCountConvention;
use crate::types::{DateRange, LeadingDays};

/// what a segment represents for interest purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// a whole anniversary year
    Year,
    /// a whole anniversary month
    Month,
    /// a number of days under the convention's day count
    Days(i64),
}

/// contiguous piece of a split range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSegment {
    pub range: DateRange,
    pub kind: SegmentKind,
    pub convention: DayCountConvention,
}

/// splits a date range into leading days, whole years, whole months and trailing days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSplitter {
    pub convention: DayCountConvention,
    pub leading: LeadingDays,
}

impl PeriodSplitter {
    pub fn new(convention: DayCountConvention, leading: LeadingDays) -> Self {
        Self { convention, leading }
    }

    /// segments are contiguous, ordered and cover the range exactly
    pub fn split(&self, range: DateRange) -> Result<Vec<PeriodSegment>> {
        let anchor = self.cycle_anchor(range.start())?;
        self.split_anchored(range, anchor)
    }

    /// date whole years and months are counted from for a range starting at `start`:
    /// the leading boundary when there is one, otherwise `start` itself
    pub fn cycle_anchor(&self, start: NaiveDate) -> Result<NaiveDate> {
        Ok(self.leading_boundary(start)?.unwrap_or(start))
    }

    /// split on the month and year anniversaries of `anchor`
    ///
    /// The range may start anywhere relative to the anchor. Days up to the next
    /// monthly anniversary come first, whole years are only taken when they start
    /// on a yearly anniversary, and every boundary is `anchor + k months` so
    /// month-end clamping never drifts.
    pub fn split_anchored(&self, range: DateRange, anchor: NaiveDate) -> Result<Vec<PeriodSegment>> {
        let mut segments = Vec::new();
        if range.is_empty() {
            return Ok(segments);
        }

        if self.convention == DayCountConvention::ActualDays {
            segments.push(self.days_segment(range));
            return Ok(segments);
        }

        let end = range.end();
        let mut cursor = range.start();
        let mut offset = first_anniversary(anchor, cursor)?;

        let boundary = add_months(anchor, offset)?;
        if boundary > cursor {
            let stop = boundary.min(end);
            segments.push(self.days_segment(DateRange::new(cursor, stop)?));
            cursor = stop;
            if cursor == end {
                return Ok(segments);
            }
        }

        loop {
            if offset % 12 == 0 {
                let next = add_months(anchor, offset + 12)?;
                if next <= end {
                    segments.push(self.segment(DateRange::new(cursor, next)?, SegmentKind::Year));
                    cursor = next;
                    offset += 12;
                    continue;
                }
            }
            let next = add_months(anchor, offset + 1)?;
            if next > end {
                break;
            }
            segments.push(self.segment(DateRange::new(cursor, next)?, SegmentKind::Month));
            cursor = next;
            offset += 1;
        }
        if cursor < end {
            segments.push(self.trailing_segment(DateRange::new(cursor, end)?));
        }

        trace!(
            start = %range.start(),
            end = %end,
            %anchor,
            segments = segments.len(),
            "split range"
        );

        Ok(segments)
    }

    /// first boundary after `start` the leading days bridge to, if any
    fn leading_boundary(&self, start: NaiveDate) -> Result<Option<NaiveDate>> {
        match self.leading {
            LeadingDays::Off => Ok(None),
            LeadingDays::ToMonthStart => {
                if start.day() == 1 {
                    Ok(None)
                } else {
                    Ok(Some(add_months(with_day_clamped(start, 1)?, 1)?))
                }
            }
            LeadingDays::ToDayOfMonth(day) => {
                if !(1..=31).contains(&day) {
                    return Err(CalcError::domain(format!("day of month {} is not 1..=31", day)));
                }
                let candidate = with_day_clamped(start, day)?;
                if candidate == start {
                    Ok(None)
                } else if candidate > start {
                    Ok(Some(candidate))
                } else {
                    let next_month = add_months(with_day_clamped(start, 1)?, 1)?;
                    Ok(Some(with_day_clamped(next_month, day)?))
                }
            }
        }
    }

    fn segment(&self, range: DateRange, kind: SegmentKind) -> PeriodSegment {
        PeriodSegment {
            range,
            kind,
            convention: self.convention,
        }
    }

    fn days_segment(&self, range: DateRange) -> PeriodSegment {
        self.segment(range, SegmentKind::Days(self.convention.day_count(range)))
    }

    /// a short remainder under equal months still counts as a month when it spans one
    fn trailing_segment(&self, range: DateRange) -> PeriodSegment {
        if self.convention == DayCountConvention::EqualMonths {
            let days = self.convention.day_count(range);
            let february_month = range.start().month() == 2 && range.days() >= 28;
            if days >= 30 || february_month {
                return self.segment(range, SegmentKind::Month);
            }
        }
        self.days_segment(range)
    }
}

/// smallest month offset from `anchor` that lands on or after `date`
fn first_anniversary(anchor: NaiveDate, date: NaiveDate) -> Result<i32> {
    if date <= anchor {
        return Ok(0);
    }
    let mut offset =
        ((date.year() - anchor.year()) * 12 + date.month() as i32 - anchor.month() as i32).max(0);
    while add_months(anchor, offset)? < date {
        offset += 1;
    }
    while offset > 0 && add_months(anchor, offset - 1)? >= date {
        offset -= 1;
    }
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange::new(start, end).unwrap()
    }

    fn kinds(segments: &[PeriodSegment]) -> Vec<SegmentKind> {
        segments.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_whole_months_then_days() {
        let splitter = PeriodSplitter::new(DayCountConvention::ActualPeriods, LeadingDays::Off);
        let segments = splitter.split(range(date(2022, 12, 8), date(2023, 1, 12))).unwrap();

        assert_eq!(kinds(&segments), vec![SegmentKind::Month, SegmentKind::Days(4)]);
        assert_eq!(segments[0].range.end(), date(2023, 1, 8));
        assert_eq!(segments[1].range.start(), date(2023, 1, 8));
    }

    #[test]
    fn test_years_before_months() {
        let splitter = PeriodSplitter::new(DayCountConvention::ActualPeriods, LeadingDays::Off);
        let segments = splitter.split(range(date(2020, 3, 15), date(2022, 6, 20))).unwrap();

        assert_eq!(
            kinds(&segments),
            vec![
                SegmentKind::Year,
                SegmentKind::Year,
                SegmentKind::Month,
                SegmentKind::Month,
                SegmentKind::Month,
                SegmentKind::Days(5),
            ]
        );
    }

    #[test]
    fn test_leading_days_to_month_start() {
        let splitter = PeriodSplitter::new(DayCountConvention::ActualPeriods, LeadingDays::ToMonthStart);
        let segments = splitter.split(range(date(2023, 1, 20), date(2023, 3, 5))).unwrap();

        assert_eq!(
            kinds(&segments),
            vec![SegmentKind::Days(12), SegmentKind::Month, SegmentKind::Days(4)]
        );
        assert_eq!(segments[0].range.end(), date(2023, 2, 1));
    }

    #[test]
    fn test_leading_days_to_day_of_month() {
        let splitter = PeriodSplitter::new(DayCountConvention::ActualPeriods, LeadingDays::ToDayOfMonth(8));
        let segments = splitter.split(range(date(2023, 1, 12), date(2023, 3, 8))).unwrap();

        assert_eq!(
            kinds(&segments),
            vec![SegmentKind::Days(27), SegmentKind::Month]
        );
        assert_eq!(segments[0].range.end(), date(2023, 2, 8));

        // already on the anchor: no leading segment
        let segments = splitter.split(range(date(2023, 1, 8), date(2023, 2, 8))).unwrap();
        assert_eq!(kinds(&segments), vec![SegmentKind::Month]);
    }

    #[test]
    fn test_leading_days_cover_short_range() {
        let splitter = PeriodSplitter::new(DayCountConvention::ActualPeriods, LeadingDays::ToMonthStart);
        let segments = splitter.split(range(date(2023, 1, 20), date(2023, 1, 25))).unwrap();
        assert_eq!(kinds(&segments), vec![SegmentKind::Days(5)]);
    }

    #[test]
    fn test_month_end_anchor_does_not_drift() {
        let splitter = PeriodSplitter::new(DayCountConvention::ActualPeriods, LeadingDays::Off);
        let segments = splitter.split(range(date(2023, 1, 31), date(2023, 4, 1))).unwrap();

        let ends: Vec<NaiveDate> = segments.iter().map(|s| s.range.end()).collect();
        assert_eq!(ends, vec![date(2023, 2, 28), date(2023, 3, 31), date(2023, 4, 1)]);
        assert_eq!(segments[2].kind, SegmentKind::Days(1));
    }

    #[test]
    fn test_equal_months_promotes_full_trailing_month() {
        let splitter = PeriodSplitter::new(DayCountConvention::EqualMonths, LeadingDays::ToMonthStart);

        // february: 28 actual days, 30/360 count of 30
        let segments = splitter.split(range(date(2023, 2, 1), date(2023, 3, 1))).unwrap();
        assert_eq!(kinds(&segments), vec![SegmentKind::Month]);

        // 2023-02-28..2023-03-30 is short of the next anniversary but counts 32 days
        let splitter = PeriodSplitter::new(DayCountConvention::EqualMonths, LeadingDays::Off);
        let segments = splitter.split(range(date(2023, 1, 31), date(2023, 3, 30))).unwrap();
        assert_eq!(kinds(&segments), vec![SegmentKind::Month, SegmentKind::Month]);

        let segments = splitter.split(range(date(2023, 1, 5), date(2023, 1, 20))).unwrap();
        assert_eq!(kinds(&segments), vec![SegmentKind::Days(15)]);
    }

    #[test]
    fn test_actual_days_is_one_segment() {
        let splitter = PeriodSplitter::new(DayCountConvention::ActualDays, LeadingDays::ToMonthStart);
        let segments = splitter.split(range(date(2022, 12, 8), date(2024, 2, 8))).unwrap();
        assert_eq!(kinds(&segments), vec![SegmentKind::Days(427)]);
    }

    #[test]
    fn test_anchored_split_keeps_the_yearly_cycle() {
        let splitter = PeriodSplitter::new(DayCountConvention::ActualPeriods, LeadingDays::Off);
        let segments = splitter
            .split_anchored(range(date(2022, 3, 15), date(2024, 1, 1)), date(2022, 1, 1))
            .unwrap();

        let mut expected = vec![SegmentKind::Days(17)];
        expected.extend(std::iter::repeat(SegmentKind::Month).take(9));
        expected.push(SegmentKind::Year);
        assert_eq!(kinds(&segments), expected);
        assert_eq!(segments[0].range.end(), date(2022, 4, 1));
        assert_eq!(segments[10].range.start(), date(2023, 1, 1));
    }

    #[test]
    fn test_anchored_split_counts_from_the_month_end_anchor() {
        let splitter = PeriodSplitter::new(DayCountConvention::ActualPeriods, LeadingDays::Off);
        let segments = splitter
            .split_anchored(range(date(2023, 2, 10), date(2023, 5, 31)), date(2023, 1, 31))
            .unwrap();

        let ends: Vec<NaiveDate> = segments.iter().map(|s| s.range.end()).collect();
        assert_eq!(
            ends,
            vec![date(2023, 2, 28), date(2023, 3, 31), date(2023, 4, 30), date(2023, 5, 31)]
        );
        assert_eq!(segments[0].kind, SegmentKind::Days(18));
    }

    #[test]
    fn test_cycle_anchor() {
        let start = date(2023, 1, 20);
        let off = PeriodSplitter::new(DayCountConvention::ActualPeriods, LeadingDays::Off);
        assert_eq!(off.cycle_anchor(start).unwrap(), start);

        let month_start = PeriodSplitter::new(DayCountConvention::ActualPeriods, LeadingDays::ToMonthStart);
        assert_eq!(month_start.cycle_anchor(start).unwrap(), date(2023, 2, 1));
        assert_eq!(month_start.cycle_anchor(date(2023, 3, 1)).unwrap(), date(2023, 3, 1));

        let day = PeriodSplitter::new(DayCountConvention::ActualPeriods, LeadingDays::ToDayOfMonth(8));
        assert_eq!(day.cycle_anchor(start).unwrap(), date(2023, 2, 8));
    }

    #[test]
    fn test_invalid_anchor_day() {
        let splitter = PeriodSplitter::new(DayCountConvention::ActualPeriods, LeadingDays::ToDayOfMonth(32));
        assert!(splitter.split(range(date(2023, 1, 5), date(2023, 2, 5))).is_err());
    }

    fn convention() -> impl Strategy<Value = DayCountConvention> {
        prop_oneof![
            Just(DayCountConvention::ActualDays),
            Just(DayCountConvention::ActualPeriods),
            Just(DayCountConvention::EqualMonths),
        ]
    }

    fn leading() -> impl Strategy<Value = LeadingDays> {
        prop_oneof![
            Just(LeadingDays::Off),
            Just(LeadingDays::ToMonthStart),
            (1u32..=31).prop_map(LeadingDays::ToDayOfMonth),
        ]
    }

    proptest! {
        #[test]
        fn prop_segments_partition_the_range(
            start_offset in 0i64..3_000,
            length in 0i64..2_000,
            convention in convention(),
            leading in leading(),
        ) {
            let start = date(2018, 1, 1) + chrono::Duration::days(start_offset);
            let end = start + chrono::Duration::days(length);
            let segments = PeriodSplitter::new(convention, leading)
                .split(DateRange::new(start, end).unwrap())
                .unwrap();

            let mut cursor = start;
            for segment in &segments {
                prop_assert_eq!(segment.range.start(), cursor);
                prop_assert!(segment.range.end() > segment.range.start());
                cursor = segment.range.end();
            }
            prop_assert_eq!(cursor, end);
            prop_assert_eq!(segments.is_empty(), length == 0);
        }

        #[test]
        fn prop_anchored_segments_partition_the_range(
            anchor_offset in 0i64..1_500,
            start_offset in 0i64..1_500,
            length in 0i64..1_200,
            convention in convention(),
        ) {
            let anchor = date(2018, 1, 1) + chrono::Duration::days(anchor_offset);
            let start = anchor + chrono::Duration::days(start_offset);
            let end = start + chrono::Duration::days(length);
            let segments = PeriodSplitter::new(convention, LeadingDays::Off)
                .split_anchored(DateRange::new(start, end).unwrap(), anchor)
                .unwrap();

            let mut cursor = start;
            for segment in &segments {
                prop_assert_eq!(segment.range.start(), cursor);
                prop_assert!(segment.range.end() > segment.range.start());
                if segment.kind == SegmentKind::Year {
                    prop_assert_eq!(segment.range.start().month(), anchor.month());
                }
                cursor = segment.range.end();
            }
            prop_assert_eq!(cursor, end);
        }
    }
}
