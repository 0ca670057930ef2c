use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::{Amount, Rate, RoundingPolicy};
use crate::errors::Result;
use crate::interest::{Compounding, DayCountConvention};
use crate::interpolate::DiscountFactors;
use crate::types::{DateRange, LeadingDays};

/// one period in the life of a loan or deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentPeriod {
    /// booked history: the principal during the period and the interest posted for it
    Posted {
        range: DateRange,
        principal: Amount,
        interest: Amount,
    },
    /// projection: interest is still to be calculated on the opening balance
    Projected {
        range: DateRange,
        start_balance: Amount,
        rate: Rate,
    },
}

impl InstrumentPeriod {
    pub fn range(&self) -> DateRange {
        match self {
            InstrumentPeriod::Posted { range, .. } | InstrumentPeriod::Projected { range, .. } => *range,
        }
    }
}

/// liability value of a loan over booked and projected periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanValue {
    periods: Vec<InstrumentPeriod>,
    discount: DiscountFactors,
    day_count: DayCountConvention,
    rounding: RoundingPolicy,
}

/// a deposit is valued like a loan, seen from the holder's side
pub type DepositValue = LoanValue;

impl LoanValue {
    pub fn new(periods: Vec<InstrumentPeriod>, discount: DiscountFactors, rounding: RoundingPolicy) -> Self {
        Self {
            periods,
            discount,
            day_count: DayCountConvention::ActualDays,
            rounding,
        }
    }

    /// day count for projected interest, actual days over 365 unless set
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    pub fn periods(&self) -> &[InstrumentPeriod] {
        &self.periods
    }

    fn posted(&self) -> impl Iterator<Item = (DateRange, Amount, Amount)> + '_ {
        self.periods.iter().filter_map(|period| match *period {
            InstrumentPeriod::Posted {
                range,
                principal,
                interest,
            } => Some((range, principal, interest)),
            InstrumentPeriod::Projected { .. } => None,
        })
    }

    /// total interest booked in the history periods
    pub fn posted_interest(&self) -> Result<Amount> {
        Amount::try_sum(self.posted().map(|(_, _, interest)| interest))
    }

    /// principal repaid over the history periods
    ///
    /// Each drop in principal between consecutive periods counts as a repayment
    /// at the start of the later period and is discounted there.
    pub fn repayment(&self) -> Result<Amount> {
        let posted: Vec<(DateRange, Amount, Amount)> = self.posted().collect();
        let (first, last) = match (posted.first(), posted.last()) {
            (Some(first), Some(last)) => (first.1, last.1),
            _ => return Ok(Amount::ZERO),
        };
        if self.discount.is_empty() {
            return first.checked_sub(last);
        }

        let mut total = Amount::ZERO;
        for pair in posted.windows(2) {
            let (range, principal, _) = pair[1];
            let repaid = pair[0].1.checked_sub(principal)?;
            total = total.checked_add(self.discount.discount(repaid, range.start(), self.rounding)?)?;
        }
        Ok(total)
    }

    /// interest expected over the projected periods, discounted at each period start
    pub fn future_interest(&self) -> Result<Amount> {
        let mut total = Amount::ZERO;
        for period in &self.periods {
            let InstrumentPeriod::Projected {
                range,
                start_balance,
                rate,
            } = *period
            else {
                continue;
            };
            let interest = self.day_count.interest(
                range,
                start_balance,
                rate,
                Compounding::None,
                LeadingDays::Off,
                self.rounding,
            )?;
            let interest = self.discount.discount(interest, range.start(), self.rounding)?;
            debug!(start = %range.start(), end = %range.end(), %interest, "projected interest");
            total = total.checked_add(interest)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(m: u32) -> DateRange {
        DateRange::new(date(2023, m, 1), date(2023, m + 1, 1)).unwrap()
    }

    fn posted(m: u32, principal: i64, interest: i64) -> InstrumentPeriod {
        InstrumentPeriod::Posted {
            range: month(m),
            principal: Amount::from_minor(principal),
            interest: Amount::from_minor(interest),
        }
    }

    fn periods() -> Vec<InstrumentPeriod> {
        vec![
            posted(1, 100_000, 400),
            posted(2, 95_000, 380),
            posted(3, 90_000, 360),
            InstrumentPeriod::Projected {
                range: month(4),
                start_balance: Amount::from_minor(90_000),
                rate: Rate::from_percentage(5),
            },
        ]
    }

    #[test]
    fn test_undiscounted_loan() {
        let loan = LoanValue::new(periods(), DiscountFactors::none(), RoundingPolicy::HalfEven);

        assert_eq!(loan.posted_interest().unwrap(), Amount::from_minor(1_140));
        assert_eq!(loan.repayment().unwrap(), Amount::from_minor(10_000));
        // 90000 * 5% * 30 / 365 = 369.86
        assert_eq!(loan.future_interest().unwrap(), Amount::from_minor(370));
    }

    #[test]
    fn test_discounted_loan() {
        let discount = DiscountFactors::new(vec![(date(2023, 2, 15), dec!(0.1))]).unwrap();
        let loan = LoanValue::new(periods(), discount, RoundingPolicy::HalfEven);

        // the february repayment falls before the first factor
        assert_eq!(loan.repayment().unwrap(), Amount::from_minor(9_500));
        assert_eq!(loan.future_interest().unwrap(), Amount::from_minor(333));
        assert_eq!(loan.posted_interest().unwrap(), Amount::from_minor(1_140));
    }

    #[test]
    fn test_projection_only() {
        let deposit: DepositValue = LoanValue::new(
            periods().split_off(3),
            DiscountFactors::none(),
            RoundingPolicy::HalfEven,
        );
        assert_eq!(deposit.posted_interest().unwrap(), Amount::ZERO);
        assert_eq!(deposit.repayment().unwrap(), Amount::ZERO);
        assert_eq!(deposit.periods()[0].range(), month(4));

        // 30/360 counts the same 30 days against a 360 day year
        let deposit = deposit.with_day_count(DayCountConvention::EqualMonths);
        assert_eq!(deposit.future_interest().unwrap(), Amount::from_minor(375));
    }

    #[test]
    fn test_single_posted_period_repays_nothing() {
        let loan = LoanValue::new(vec![posted(1, 100_000, 400)], DiscountFactors::none(), RoundingPolicy::HalfEven);
        assert_eq!(loan.repayment().unwrap(), Amount::ZERO);
        assert_eq!(loan.posted_interest().unwrap(), Amount::from_minor(400));
    }
}
