use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::elapsed;
use crate::decimal::{Amount, RoundingPolicy};
use crate::depreciation::linear::walk;
use crate::depreciation::{DepreciationSchedule, DepreciationTerms};
use crate::errors::{CalcError, Result};

/// new replacement cost estimate, effective at a reporting date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revaluation {
    pub date: NaiveDate,
    pub replacement_cost: Amount,
}

/// straight-line depreciation on the current replacement cost
///
/// past under- or over-depreciation caused by a revaluation is caught up in
/// one correction to the reserve; earlier entries are left as they were.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplacementCostDepreciation {
    pub rounding: RoundingPolicy,
}

impl ReplacementCostDepreciation {
    pub fn new(rounding: RoundingPolicy) -> Self {
        Self { rounding }
    }

    pub fn schedule(&self, terms: DepreciationTerms, revaluations: &[Revaluation]) -> Result<DepreciationSchedule> {
        terms.validate()?;
        validate_revaluations(&terms, revaluations)?;

        let mut pending = revaluations.iter().peekable();
        let run_until = revaluations.last().map(|r| r.date);

        walk(terms, self.rounding, run_until, |writer, date| {
            let revaluation = match pending.next_if(|r| r.date == date) {
                Some(revaluation) => revaluation,
                None => return Ok(()),
            };

            let new_exact = terms.exact_yearly(revaluation.replacement_cost);
            // the catch-up never covers more than the useful life
            let months = elapsed(terms.purchase_date, date)?
                .total_months()
                .min(terms.years * 12);
            let elapsed_years = Decimal::from(months) / Decimal::from(12);
            let catch_up = writer
                .rounding
                .round((new_exact - writer.yearly.as_decimal()) * elapsed_years)?;

            debug!(
                %date,
                from = %writer.gross,
                to = %revaluation.replacement_cost,
                %catch_up,
                "asset revalued"
            );

            writer.gross = revaluation.replacement_cost;
            let new_yearly = writer.yearly_for(new_exact)?;
            writer.correct(date, catch_up, new_yearly);
            Ok(())
        })
    }
}

/// revaluations must fall on distinct reporting dates after the purchase
fn validate_revaluations(terms: &DepreciationTerms, revaluations: &[Revaluation]) -> Result<()> {
    let mut previous: Option<NaiveDate> = None;
    for revaluation in revaluations {
        if revaluation.date <= terms.purchase_date {
            return Err(CalcError::domain(format!(
                "revaluation on {} is not after purchase on {}",
                revaluation.date, terms.purchase_date
            )));
        }
        if previous.map_or(false, |p| revaluation.date <= p) {
            return Err(CalcError::domain(format!(
                "revaluation on {} is out of order",
                revaluation.date
            )));
        }
        if revaluation.replacement_cost < terms.residual_value {
            return Err(CalcError::domain(format!(
                "replacement cost {} is below residual value {}",
                revaluation.replacement_cost, terms.residual_value
            )));
        }
        if !is_reporting_date(terms, revaluation.date)? {
            return Err(CalcError::domain(format!(
                "revaluation on {} is not a reporting date",
                revaluation.date
            )));
        }
        previous = Some(revaluation.date);
    }
    Ok(())
}

fn is_reporting_date(terms: &DepreciationTerms, date: NaiveDate) -> Result<bool> {
    if date < terms.first_reporting_date {
        return Ok(false);
    }
    let years = elapsed(terms.first_reporting_date, date)?.years;
    Ok(terms.reporting_date(years)? == date)
}
