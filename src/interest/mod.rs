pub mod compound;
pub mod day_count;
pub mod running;
pub mod splitter;

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::decimal::{Amount, Rate, RoundingPolicy};
use crate::errors::{CalcError, Result};

pub use compound::{Compounding, CompoundingEngine, CompoundingRun, SegmentAccrual};
pub use day_count::DayCountConvention;
pub use running::{InterestLedger, InterestLedgerEntry, RateSource, RunningInterestScheduler};
pub use splitter::{PeriodSegment, PeriodSplitter, SegmentKind};

/// interest for one whole period at a rate already expressed per period
pub fn period_interest(amount: Amount, rate: Rate, rounding: RoundingPolicy) -> Result<Amount> {
    let interest = amount
        .as_decimal()
        .checked_mul(rate.as_decimal())
        .ok_or_else(|| CalcError::domain(format!("interest on {} overflows", amount)))?;
    rounding.round(interest)
}

/// a year worth of interest: `round(amount * rate)`
pub fn year_interest(amount: Amount, rate: Rate, rounding: RoundingPolicy) -> Result<Amount> {
    period_interest(amount, rate, rounding)
}

/// a month worth of interest at the monthly rate equivalent to the annual rate:
/// `round(amount * ((1 + rate)^(1/12) - 1))`
pub fn month_interest(amount: Amount, rate: Rate, rounding: RoundingPolicy) -> Result<Amount> {
    let monthly_rate = monthly_equivalent(rate)?;
    let interest = amount
        .as_decimal()
        .checked_mul(monthly_rate)
        .ok_or_else(|| CalcError::domain(format!("interest on {} overflows", amount)))?;
    rounding.round(interest)
}

/// `(1 + rate)^(1/12) - 1`
pub fn monthly_equivalent(rate: Rate) -> Result<Decimal> {
    let base = Decimal::ONE + rate.as_decimal();
    if base.is_sign_negative() {
        return Err(CalcError::domain(format!("rate {} is below -100%", rate)));
    }
    if rate.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if base.is_zero() {
        return Ok(-Decimal::ONE);
    }
    let factor = base
        .checked_powd(Decimal::ONE / dec!(12))
        .ok_or_else(|| CalcError::domain(format!("cannot take the 12th root of {}", base)))?;
    Ok(factor - Decimal::ONE)
}

/// simple interest for a number of days: `round(amount * rate * days / basis)`
pub fn pro_rata_interest(
    amount: Amount,
    rate: Rate,
    days: i64,
    year_basis: u32,
    rounding: RoundingPolicy,
) -> Result<Amount> {
    if days == 0 {
        return Ok(Amount::ZERO);
    }
    let interest = amount
        .as_decimal()
        .checked_mul(rate.as_decimal())
        .and_then(|v| v.checked_mul(Decimal::from(days)))
        .ok_or_else(|| CalcError::domain(format!("interest on {} over {} days overflows", amount, days)))?;
    rounding.round(interest / Decimal::from(year_basis))
}
