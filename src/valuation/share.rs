
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::elapsed;
use crate::decimal::{Amount, RoundingPolicy};
use crate::errors::{CalcError, Result};
use crate::interpolate::{Curve, DiscountFactors};
use crate::types::OutOfRangePolicy;

/// observed price and dividend per share on a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareObservation {
    pub date: NaiveDate,
    pub price: Amount,
    pub dividend: Amount,
}

/// ordered history of share observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawShareHistory")]
pub struct ShareHistory {
    observations: Vec<ShareObservation>,
    rounding: RoundingPolicy,
}

#[derive(Deserialize)]
struct RawShareHistory {
    observations: Vec<ShareObservation>,
    rounding: RoundingPolicy,
}

impl TryFrom<RawShareHistory> for ShareHistory {
    type Error = CalcError;

    fn try_from(raw: RawShareHistory) -> Result<Self> {
        ShareHistory::new(raw.observations, raw.rounding)
    }
}

impl ShareHistory {
    pub const MINIMUM_OBSERVATIONS: usize = 2;

    pub fn new(observations: Vec<ShareObservation>, rounding: RoundingPolicy) -> Result<Self> {
        Self::with_minimum(observations, Self::MINIMUM_OBSERVATIONS, rounding)
    }

    pub fn with_minimum(
        observations: Vec<ShareObservation>,
        minimum: usize,
        rounding: RoundingPolicy,
    ) -> Result<Self> {
        if minimum < Self::MINIMUM_OBSERVATIONS {
            return Err(CalcError::domain(format!(
                "a history needs at least {} observations, not {}",
                Self::MINIMUM_OBSERVATIONS,
                minimum
            )));
        }
        if observations.len() < minimum {
            return Err(CalcError::InsufficientHistory {
                required: minimum,
                provided: observations.len(),
            });
        }
        if let Some(pair) = observations.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(CalcError::domain(format!(
                "observations must be in ascending date order: {} is followed by {}",
                pair[0].date, pair[1].date
            )));
        }
        Ok(Self { observations, rounding })
    }

    pub fn observations(&self) -> &[ShareObservation] {
        &self.observations
    }

    fn first(&self) -> &ShareObservation {
        &self.observations[0]
    }

    fn last(&self) -> &ShareObservation {
        &self.observations[self.observations.len() - 1]
    }

    /// mean price change between consecutive observations
    pub fn growth_per_period(&self) -> Result<Amount> {
        let periods = Decimal::from(self.observations.len() - 1);
        let change = self.last().price.checked_sub(self.first().price)?;
        self.rounding.round(change.as_decimal() / periods)
    }

    pub fn mean_dividend(&self) -> Result<Amount> {
        let total = Amount::try_sum(self.observations.iter().map(|o| o.dividend))?;
        self.rounding
            .round(total.as_decimal() / Decimal::from(self.observations.len()))
    }

    /// price on a date inside the history, interpolated between observations
    pub fn value_at(&self, date: NaiveDate) -> Result<Amount> {
        let prices: Vec<(NaiveDate, Amount)> =
            self.observations.iter().map(|o| (o.date, o.price)).collect();
        Curve::from_amounts(&prices, OutOfRangePolicy::Error)?.amount_at(date, self.rounding)
    }

    /// projected value on a date after the history: last price plus growth
    /// and dividends for the elapsed time, each discounted at that date
    pub fn estimated_value(&self, date: NaiveDate, discount: &DiscountFactors) -> Result<Amount> {
        let last = self.last();
        if date <= last.date {
            return Err(CalcError::domain(format!(
                "estimate date {} is not after the last observation on {}",
                date, last.date
            )));
        }

        let span = elapsed(last.date, date)?;
        let growth = self.growth_per_period()?;
        let years = Decimal::from(span.years);

        let mut value_growth = self.rounding.round(growth.as_decimal() * years)?;
        value_growth += self
            .rounding
            .round(growth.as_decimal() * Decimal::from(span.months) / Decimal::from(12))?;
        value_growth += self
            .rounding
            .round(growth.as_decimal() * Decimal::from(span.days) / Decimal::from(365))?;
        let value_growth = discount.discount(value_growth, date, self.rounding)?;

        let dividends = self.rounding.round(self.mean_dividend()?.as_decimal() * years)?;
        let dividends = discount.discount(dividends, date, self.rounding)?;

        debug!(
            %date,
            last_price = %last.price,
            %value_growth,
            %dividends,
            "share value estimated"
        );

        last.price.checked_add(value_growth)?.checked_add(dividends)
    }
}
