use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::InterestConfig;
use crate::decimal::{Amount, Rate};
use crate::errors::{CalcError, Result};
use crate::events::{expand_changes, normalize_events, BalanceChange, ChangeEvent};
use crate::interest::splitter::SegmentKind;
use crate::interpolate::Curve;
use crate::types::DateRange;

/// where the scheduler takes its annual rate from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RateSource {
    Flat(Rate),
    /// looked up at the start of every segment
    Curve(Curve),
}

impl RateSource {
    pub fn rate_at(&self, date: NaiveDate) -> Result<Rate> {
        match self {
            RateSource::Flat(rate) => Ok(*rate),
            RateSource::Curve(curve) => curve.rate_at(date),
        }
    }
}

impl From<Rate> for RateSource {
    fn from(rate: Rate) -> Self {
        RateSource::Flat(rate)
    }
}

/// interest posted for one segment of a running calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestLedgerEntry {
    pub period: DateRange,
    pub kind: SegmentKind,
    pub rate: Rate,
    pub interest: Amount,
    /// interest-bearing balance after the segment
    pub balance_after: Amount,
}

/// result of a running interest calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestLedger {
    entries: Vec<InterestLedgerEntry>,
    opening_balance: Amount,
    total_interest: Amount,
    final_balance: Amount,
    final_principal: Amount,
}

impl InterestLedger {
    pub fn entries(&self) -> &[InterestLedgerEntry] {
        &self.entries
    }

    pub fn opening_balance(&self) -> Amount {
        self.opening_balance
    }

    pub fn total_interest(&self) -> Amount {
        self.total_interest
    }

    /// principal plus capitalized interest at the end date
    pub fn final_balance(&self) -> Amount {
        self.final_balance
    }

    pub fn final_principal(&self) -> Amount {
        self.final_principal
    }
}

/// mutable state threaded through one scheduler run
struct RunState {
    principal: Amount,
    capitalized: Amount,
    rate: RateSource,
    date: NaiveDate,
    /// every sub-period counts its months and years from here
    anchor: NaiveDate,
}

impl RunState {
    fn balance(&self) -> Result<Amount> {
        self.principal.checked_add(self.capitalized)
    }

    fn apply(&mut self, event: &ChangeEvent) {
        if let Some(balance) = event.balance {
            debug!(date = %event.date, from = %self.principal, to = %balance, "principal changed");
            self.principal = balance;
        }
        if let Some(rate) = event.rate {
            debug!(date = %event.date, %rate, "rate changed");
            self.rate = RateSource::Flat(rate);
        }
    }
}

/// computes interest on a balance whose principal and rate change over time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningInterestScheduler {
    pub config: InterestConfig,
}

impl RunningInterestScheduler {
    pub fn new(config: InterestConfig) -> Self {
        Self { config }
    }

    /// run from `start` to `end`, applying events in date order
    pub fn run(
        &self,
        start: NaiveDate,
        opening_balance: Amount,
        rate: impl Into<RateSource>,
        events: &[ChangeEvent],
        end: NaiveDate,
    ) -> Result<InterestLedger> {
        self.config.validate()?;
        if end < start {
            return Err(CalcError::domain(format!("end {} precedes start {}", end, start)));
        }
        let events = normalize_events(events, start, end)?;

        debug!(
            %start,
            %end,
            balance = %opening_balance,
            events = events.len(),
            "running interest"
        );

        let mut state = RunState {
            principal: opening_balance,
            capitalized: Amount::ZERO,
            rate: rate.into(),
            date: start,
            anchor: self.config.splitter().cycle_anchor(start)?,
        };
        let mut entries = Vec::new();

        for event in &events {
            self.close_period(&mut state, event.date, &mut entries)?;
            state.apply(event);
        }
        self.close_period(&mut state, end, &mut entries)?;

        let total_interest = Amount::try_sum(entries.iter().map(|e| e.interest))?;
        let final_balance = state.balance()?;
        debug!(%total_interest, balance = %final_balance, "running interest done");

        Ok(InterestLedger {
            entries,
            opening_balance,
            total_interest,
            final_balance,
            final_principal: state.principal,
        })
    }

    /// run with changes expressed as functions of the running principal
    pub fn run_with_changes(
        &self,
        start: NaiveDate,
        principal: Amount,
        rate: impl Into<RateSource>,
        changes: &[BalanceChange],
        end: NaiveDate,
    ) -> Result<InterestLedger> {
        let events = expand_changes(principal, changes);
        self.run(start, principal, rate, &events, end)
    }

    /// accrue from the state's date up to `until` and capitalize when compounding
    fn close_period(
        &self,
        state: &mut RunState,
        until: NaiveDate,
        entries: &mut Vec<InterestLedgerEntry>,
    ) -> Result<()> {
        if until == state.date {
            return Ok(());
        }

        // later sub-periods bridge back to the cycle the run started on
        let range = DateRange::new(state.date, until)?;
        let segments = self.config.splitter().split_anchored(range, state.anchor)?;

        let balance = state.balance()?;
        let source = &state.rate;
        let run = self
            .config
            .engine()
            .run_with(&segments, balance, |date| source.rate_at(date))?;

        entries.extend(run.accruals.into_iter().map(|accrual| InterestLedgerEntry {
            period: accrual.segment.range,
            kind: accrual.segment.kind,
            rate: accrual.rate,
            interest: accrual.interest,
            balance_after: accrual.balance_after,
        }));

        state.capitalized = state
            .capitalized
            .checked_add(run.final_balance.checked_sub(balance)?)?;
        state.date = until;

        debug!(
            from = %range.start(),
            to = %until,
            interest = %run.total_interest,
            capitalized = %state.capitalized,
            "sub-period closed"
        );

        Ok(())
    }
}
