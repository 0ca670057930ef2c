use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::{Amount, Rate, RoundingPolicy};
use crate::errors::{CalcError, Result};
use crate::interest::period_interest;

/// one period of an annuity schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnuityRow {
    pub period: u32,
    pub payment: Amount,
    pub interest: Amount,
    pub principal: Amount,
    /// principal left after this payment
    pub remaining: Amount,
}

/// annuity schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnuitySchedule {
    principal: Amount,
    periodic_rate: Rate,
    regular_payment: Amount,
    rows: Vec<AnnuityRow>,
}

impl AnnuitySchedule {
    pub fn principal(&self) -> Amount {
        self.principal
    }

    pub fn periodic_rate(&self) -> Rate {
        self.periodic_rate
    }

    pub fn periods(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn rows(&self) -> &[AnnuityRow] {
        &self.rows
    }

    /// get payment for specific period
    pub fn row(&self, period: u32) -> Option<&AnnuityRow> {
        period
            .checked_sub(1)
            .and_then(|index| self.rows.get(index as usize))
    }

    pub fn regular_payment(&self) -> Amount {
        self.regular_payment
    }

    /// the closing payment, which settles whatever rounding left over
    pub fn final_payment(&self) -> Amount {
        self.rows.last().map(|row| row.payment).unwrap_or(Amount::ZERO)
    }

    pub fn total_interest(&self) -> Amount {
        self.rows.iter().map(|row| row.interest).sum()
    }

    pub fn total_paid(&self) -> Amount {
        self.rows.iter().map(|row| row.payment).sum()
    }
}

/// equal-payment (annuity) loan calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnuityGenerator {
    pub rounding: RoundingPolicy,
}

impl AnnuityGenerator {
    pub fn new(rounding: RoundingPolicy) -> Self {
        Self { rounding }
    }

    /// level payment for `periods` periods at a periodic rate:
    /// `P * r / (1 - (1 + r)^-n)`, or `P / n` without interest
    pub fn monthly_payment(&self, principal: Amount, rate: Rate, periods: u32) -> Result<Amount> {
        validate(principal, rate, periods)?;

        if rate.is_zero() {
            return self.rounding.round(principal.as_decimal() / Decimal::from(periods));
        }

        // P * r * (1 + r)^n / ((1 + r)^n - 1)
        let r = rate.as_decimal();
        let compound = compound_factor(r, periods)?;
        let numerator = principal
            .as_decimal()
            .checked_mul(r)
            .and_then(|v| v.checked_mul(compound))
            .ok_or_else(|| CalcError::domain(format!("payment on {} overflows", principal)))?;
        let denominator = compound - Decimal::ONE;
        if denominator.is_zero() {
            return Err(CalcError::domain(format!("rate {} is too small to amortize over {} periods", rate, periods)));
        }

        self.rounding.round(numerator / denominator)
    }

    /// full schedule; the last row absorbs the rounding difference
    pub fn build_schedule(&self, principal: Amount, rate: Rate, periods: u32) -> Result<AnnuitySchedule> {
        let payment = self.monthly_payment(principal, rate, periods)?;

        let mut rows = Vec::with_capacity(periods as usize);
        let mut remaining = principal;

        for period in 1..=periods {
            let interest = period_interest(remaining, rate, self.rounding)?;
            let principal_portion = if period == periods {
                remaining
            } else {
                (payment - interest).min(remaining)
            };
            remaining -= principal_portion;

            rows.push(AnnuityRow {
                period,
                payment: interest + principal_portion,
                interest,
                principal: principal_portion,
                remaining,
            });
        }

        debug!(
            %principal,
            %rate,
            periods,
            %payment,
            "annuity schedule built"
        );

        Ok(AnnuitySchedule {
            principal,
            periodic_rate: rate,
            regular_payment: payment,
            rows,
        })
    }
}

fn validate(principal: Amount, rate: Rate, periods: u32) -> Result<()> {
    if periods < 1 {
        return Err(CalcError::domain("an annuity needs at least one period"));
    }
    if rate.is_negative() {
        return Err(CalcError::domain(format!("periodic rate {} is negative", rate)));
    }
    if !principal.is_positive() {
        return Err(CalcError::domain(format!("principal {} is not positive", principal)));
    }
    Ok(())
}

/// (1 + r)^n by repeated multiplication
fn compound_factor(rate: Decimal, periods: u32) -> Result<Decimal> {
    let base = Decimal::ONE + rate;
    let mut compound = Decimal::ONE;
    for _ in 0..periods {
        compound = compound
            .checked_mul(base)
            .ok_or_else(|| CalcError::domain(format!("(1 + {})^{} overflows", rate, periods)))?;
    }
    Ok(compound)
}
