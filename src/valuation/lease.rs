use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::{add_years, elapsed};
use crate::decimal::{Amount, Rate, RoundingPolicy};
use crate::errors::{CalcError, Result};
use crate::interpolate::DiscountFactors;

/// how often a fee is due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeFrequency {
    Yearly,
    Monthly,
}

impl FeeFrequency {
    pub fn payments_per_year(&self) -> u32 {
        match self {
            FeeFrequency::Yearly => 1,
            FeeFrequency::Monthly => 12,
        }
    }
}

/// recurring fee of a fixed amount, due until an end date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Amount,
    pub frequency: FeeFrequency,
    pub end_date: NaiveDate,
}

impl Fee {
    pub fn yearly(amount: Amount, end_date: NaiveDate) -> Self {
        Self {
            amount,
            frequency: FeeFrequency::Yearly,
            end_date,
        }
    }

    pub fn monthly(amount: Amount, end_date: NaiveDate) -> Self {
        Self {
            amount,
            frequency: FeeFrequency::Monthly,
            end_date,
        }
    }
}

/// current cost of a lease: the remaining fees, discounted at the borrowing rate
///
/// The value the leased good keeps at the end of the term is not part of the
/// liability and is reported separately by [`LeaseCostValue::discounted_end_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseCostValue {
    pub fee: Fee,
    pub borrowing_rate: Rate,
    pub remaining_value: Amount,
    pub at_date: NaiveDate,
    pub rounding: RoundingPolicy,
}

impl LeaseCostValue {
    pub fn new(fee: Fee, borrowing_rate: Rate, remaining_value: Amount, at_date: NaiveDate) -> Self {
        Self {
            fee,
            borrowing_rate,
            remaining_value,
            at_date,
            rounding: RoundingPolicy::HalfEven,
        }
    }

    pub fn with_rounding(mut self, rounding: RoundingPolicy) -> Self {
        self.rounding = rounding;
        self
    }

    /// keep factor for one year of discounting: `1 - rate`
    fn keep(&self) -> Result<Decimal> {
        let keep = Decimal::ONE - self.borrowing_rate.as_decimal();
        if keep.is_sign_negative() {
            return Err(CalcError::domain(format!(
                "borrowing rate {} is above 100%",
                self.borrowing_rate
            )));
        }
        Ok(keep)
    }

    /// fees still to pay from `at_date` to the end of the lease
    ///
    /// Without a borrowing rate this is the plain sum of the outstanding
    /// payments, a started period counting as a whole one. With a rate every
    /// year of fees is discounted by `(1 - rate)` per year, the broken part of
    /// a year pro rata.
    pub fn estimated_value(&self) -> Result<Amount> {
        let span = elapsed(self.at_date, self.fee.end_date)?;
        let partial = u32::from(span.days > 0);

        if self.borrowing_rate.is_zero() {
            let payments = match self.fee.frequency {
                FeeFrequency::Yearly => span.years + 1,
                FeeFrequency::Monthly => span.total_months() + partial,
            };
            return self.times(self.fee.amount, payments);
        }

        let keep = self.keep()?;
        let yearly = self.times(self.fee.amount, self.fee.frequency.payments_per_year())?;
        let yearly = yearly.as_decimal();
        let months = Decimal::from(span.months) / Decimal::from(12);

        let mut discounted = yearly * keep * months;
        let mut factor = Decimal::ONE;
        for _ in 0..span.years {
            factor = factor
                .checked_mul(keep)
                .ok_or_else(|| CalcError::domain("lease discount factor overflows"))?;
            discounted += if span.months == 0 {
                yearly * factor
            } else {
                yearly * (factor * keep * (Decimal::ONE - months) + factor * months)
            };
        }

        debug!(
            at = %self.at_date,
            end = %self.fee.end_date,
            years = span.years,
            months = span.months,
            %discounted,
            "lease fees discounted"
        );

        self.rounding.round(discounted)
    }

    /// present value of what the good is worth at the end of the lease
    pub fn discounted_end_value(&self) -> Result<Amount> {
        let factors = self.end_value_discount_factors()?;
        let discounted = factors.discount(self.remaining_value, self.fee.end_date, self.rounding)?;
        self.remaining_value.checked_sub(discounted)
    }

    /// yearly factors from `at_date` past the end of the lease,
    /// starting at 1 and multiplied by `1 - rate` each year, kept to two decimals
    pub fn end_value_discount_factors(&self) -> Result<DiscountFactors> {
        let keep = self.keep()?;
        let mut anchors = vec![(self.at_date, Decimal::ONE)];
        let mut date = self.at_date;
        let mut factor = Decimal::ONE;
        let mut years = 0;
        while date <= self.fee.end_date {
            years += 1;
            date = add_years(self.at_date, years)?;
            factor = (factor * keep).round_dp(2);
            anchors.push((date, factor));
        }
        DiscountFactors::new(anchors)
    }

    fn times(&self, amount: Amount, count: u32) -> Result<Amount> {
        amount
            .minor()
            .checked_mul(i64::from(count))
            .map(Amount::from_minor)
            .ok_or_else(|| CalcError::domain(format!("{} times {} overflows", amount, count)))
    }
}
