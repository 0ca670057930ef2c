use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::{Amount, Rate};
use crate::errors::{CalcError, Result};

/// a change to the running balance and/or the rate, effective from `date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub date: NaiveDate,
    /// new principal from this date on
    pub balance: Option<Amount>,
    /// new flat rate from this date on
    pub rate: Option<Rate>,
}

impl ChangeEvent {
    pub fn balance(date: NaiveDate, balance: Amount) -> Self {
        Self {
            date,
            balance: Some(balance),
            rate: None,
        }
    }

    pub fn rate(date: NaiveDate, rate: Rate) -> Self {
        Self {
            date,
            balance: None,
            rate: Some(rate),
        }
    }

    pub fn balance_and_rate(date: NaiveDate, balance: Amount, rate: Rate) -> Self {
        Self {
            date,
            balance: Some(balance),
            rate: Some(rate),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.balance.is_none() && self.rate.is_none()
    }
}

type ApplyFn = Box<dyn Fn(Amount) -> Amount + Send + Sync>;

/// a change expressed as a function of the running principal
pub struct BalanceChange {
    pub date: NaiveDate,
    apply: ApplyFn,
}

impl BalanceChange {
    /// add to the principal
    pub fn deposit(date: NaiveDate, amount: Amount) -> Self {
        Self::custom(date, move |principal| principal + amount)
    }

    /// take from the principal
    pub fn withdrawal(date: NaiveDate, amount: Amount) -> Self {
        Self::custom(date, move |principal| principal - amount)
    }

    /// replace the principal outright
    pub fn set_to(date: NaiveDate, amount: Amount) -> Self {
        Self::custom(date, move |_| amount)
    }

    pub fn custom<F>(date: NaiveDate, apply: F) -> Self
    where
        F: Fn(Amount) -> Amount + Send + Sync + 'static,
    {
        Self {
            date,
            apply: Box::new(apply),
        }
    }

    pub fn apply(&self, principal: Amount) -> Amount {
        (self.apply)(principal)
    }
}

impl fmt::Debug for BalanceChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BalanceChange")
            .field("date", &self.date)
            .finish_non_exhaustive()
    }
}

/// fold balance changes over the running principal into plain change events
pub fn expand_changes(opening: Amount, changes: &[BalanceChange]) -> Vec<ChangeEvent> {
    let mut principal = opening;
    changes
        .iter()
        .map(|change| {
            principal = change.apply(principal);
            ChangeEvent::balance(change.date, principal)
        })
        .collect()
}

/// check events against the run window and keep only the last event per date
pub(crate) fn normalize_events(
    events: &[ChangeEvent],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ChangeEvent>> {
    let mut normalized: Vec<ChangeEvent> = Vec::with_capacity(events.len());

    for event in events {
        if event.is_empty() {
            return Err(CalcError::domain(format!(
                "event on {} changes neither balance nor rate",
                event.date
            )));
        }
        if event.date < start || event.date > end {
            return Err(CalcError::domain(format!(
                "event on {} lies outside {}..{}",
                event.date, start, end
            )));
        }
        match normalized.last_mut() {
            Some(last) if event.date < last.date => {
                return Err(CalcError::domain(format!(
                    "event on {} follows a later event on {}",
                    event.date, last.date
                )));
            }
            Some(last) if event.date == last.date => *last = *event,
            _ => normalized.push(*event),
        }
    }

    Ok(normalized)
}
