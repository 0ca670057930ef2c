use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::decimal::{Amount, Rate, RoundingPolicy};
use crate::errors::Result;
use crate::interest::day_count::DayCountConvention;
use crate::interest::splitter::{PeriodSegment, PeriodSplitter, SegmentKind};
use crate::types::{DateRange, LeadingDays};

/// how often accrued interest is added to the interest-bearing balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compounding {
    /// interest accrues but never bears interest itself
    None,
    /// capitalized after every segment
    Monthly,
    /// capitalized at each yearly anniversary and at the end of a run
    Yearly,
}

impl Compounding {
    /// whether pending interest joins the balance after this segment;
    /// `next` is the kind of the following segment, if any
    pub fn capitalizes(&self, kind: SegmentKind, next: Option<SegmentKind>) -> bool {
        match self {
            Compounding::None => false,
            Compounding::Monthly => true,
            // a whole year only ever starts on an anniversary
            Compounding::Yearly => kind == SegmentKind::Year || next.map_or(true, |n| n == SegmentKind::Year),
        }
    }
}

/// interest posted for one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentAccrual {
    pub segment: PeriodSegment,
    pub rate: Rate,
    pub interest: Amount,
    /// interest-bearing balance after this segment
    pub balance_after: Amount,
}

/// result of walking a list of segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundingRun {
    pub accruals: Vec<SegmentAccrual>,
    pub total_interest: Amount,
    pub final_balance: Amount,
}

/// engine for compound interest over split segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompoundingEngine {
    pub convention: DayCountConvention,
    pub compounding: Compounding,
    pub rounding: RoundingPolicy,
}

impl CompoundingEngine {
    pub fn new(convention: DayCountConvention, compounding: Compounding, rounding: RoundingPolicy) -> Self {
        Self {
            convention,
            compounding,
            rounding,
        }
    }

    /// walk segments at a fixed rate
    pub fn run(&self, segments: &[PeriodSegment], balance: Amount, rate: Rate) -> Result<CompoundingRun> {
        self.run_with(segments, balance, |_| Ok(rate))
    }

    /// walk segments, looking the rate up at the start of each one
    pub fn run_with<F>(&self, segments: &[PeriodSegment], balance: Amount, mut rate_at: F) -> Result<CompoundingRun>
    where
        F: FnMut(NaiveDate) -> Result<Rate>,
    {
        let mut accruals = Vec::with_capacity(segments.len());
        let mut current = balance;
        let mut pending = Amount::ZERO;
        let mut total_interest = Amount::ZERO;

        for (i, segment) in segments.iter().enumerate() {
            let rate = rate_at(segment.range.start())?;
            let interest = segment
                .convention
                .segment_interest(segment, current, rate, self.compounding, self.rounding)?;

            total_interest = total_interest.checked_add(interest)?;
            pending = pending.checked_add(interest)?;
            let next = segments.get(i + 1).map(|s| s.kind);
            if self.compounding.capitalizes(segment.kind, next) {
                current = current.checked_add(pending)?;
                pending = Amount::ZERO;
            }

            trace!(
                start = %segment.range.start(),
                end = %segment.range.end(),
                kind = ?segment.kind,
                %rate,
                %interest,
                balance = %current,
                "segment accrued"
            );

            accruals.push(SegmentAccrual {
                segment: *segment,
                rate,
                interest,
                balance_after: current,
            });
        }

        Ok(CompoundingRun {
            accruals,
            total_interest,
            final_balance: current,
        })
    }

    /// split a range with this engine's convention and walk it at a fixed rate
    pub fn accrue(&self, range: DateRange, balance: Amount, rate: Rate, leading: LeadingDays) -> Result<CompoundingRun> {
        let segments = PeriodSplitter::new(self.convention, leading).split(range)?;
        self.run(&segments, balance, rate)
    }
}
