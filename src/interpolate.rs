//! linear interpolation between dated anchors
//!
//! the x axis is always an exact calendar day count, so values between two
//! anchors move by the same amount per day regardless of month lengths.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Amount, Rate, RoundingPolicy};
use crate::errors::{CalcError, Result};
use crate::types::OutOfRangePolicy;

/// value at `x` on the straight line through (x0, y0) and (x1, y1)
pub fn interpolate(
    x0: NaiveDate,
    y0: Decimal,
    x1: NaiveDate,
    y1: Decimal,
    x: NaiveDate,
) -> Result<Decimal> {
    let span = (x1 - x0).num_days();
    if span == 0 {
        return Err(CalcError::domain(format!(
            "cannot interpolate over a zero-width domain at {}",
            x0
        )));
    }
    let offset = (x - x0).num_days();
    Ok(Decimal::from(offset) * (y1 - y0) / Decimal::from(span) + y0)
}

/// interpolated amount, rounded once
pub fn interpolate_amount(
    start: (NaiveDate, Amount),
    end: (NaiveDate, Amount),
    at: NaiveDate,
    rounding: RoundingPolicy,
) -> Result<Amount> {
    let value = interpolate(start.0, start.1.as_decimal(), end.0, end.1.as_decimal(), at)?;
    rounding.round(value)
}

/// interpolated amounts for several dates inside [start, end)
pub fn interpolate_dates(
    start: (NaiveDate, Amount),
    end: (NaiveDate, Amount),
    dates: &[NaiveDate],
    rounding: RoundingPolicy,
) -> Result<Vec<(NaiveDate, Amount)>> {
    if start.0 >= end.0 {
        return Err(CalcError::domain(format!(
            "start date {} must be before end date {}",
            start.0, end.0
        )));
    }

    dates
        .iter()
        .map(|&date| {
            if date < start.0 || date >= end.0 {
                return Err(CalcError::OutOfRange {
                    date,
                    first: start.0,
                    last: end.0,
                });
            }
            Ok((date, interpolate_amount(start, end, date, rounding)?))
        })
        .collect()
}

/// piecewise linear curve over two or more dated anchors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCurve")]
pub struct Curve {
    anchors: Vec<(NaiveDate, Decimal)>,
    policy: OutOfRangePolicy,
}

#[derive(Deserialize)]
struct RawCurve {
    anchors: Vec<(NaiveDate, Decimal)>,
    policy: OutOfRangePolicy,
}

impl TryFrom<RawCurve> for Curve {
    type Error = CalcError;

    fn try_from(raw: RawCurve) -> Result<Self> {
        Curve::new(raw.anchors, raw.policy)
    }
}

impl Curve {
    pub fn new(anchors: Vec<(NaiveDate, Decimal)>, policy: OutOfRangePolicy) -> Result<Self> {
        if anchors.len() < 2 {
            return Err(CalcError::domain(format!(
                "a curve needs at least 2 anchors, got {}",
                anchors.len()
            )));
        }
        if let Some(pair) = anchors.windows(2).find(|pair| pair[0].0 >= pair[1].0) {
            return Err(CalcError::domain(format!(
                "curve anchors must be in ascending date order: {} is followed by {}",
                pair[0].0, pair[1].0
            )));
        }
        Ok(Self { anchors, policy })
    }

    /// curve of interest or discount rates
    pub fn from_rates(anchors: &[(NaiveDate, Rate)], policy: OutOfRangePolicy) -> Result<Self> {
        Self::new(
            anchors.iter().map(|(date, rate)| (*date, rate.as_decimal())).collect(),
            policy,
        )
    }

    /// curve of amounts, e.g. asset values
    pub fn from_amounts(anchors: &[(NaiveDate, Amount)], policy: OutOfRangePolicy) -> Result<Self> {
        Self::new(
            anchors.iter().map(|(date, amount)| (*date, amount.as_decimal())).collect(),
            policy,
        )
    }

    pub fn anchors(&self) -> &[(NaiveDate, Decimal)] {
        &self.anchors
    }

    pub fn policy(&self) -> OutOfRangePolicy {
        self.policy
    }

    pub fn value_at(&self, date: NaiveDate) -> Result<Decimal> {
        let (first_date, first_value) = self.anchors[0];
        let (last_date, last_value) = self.anchors[self.anchors.len() - 1];

        if date < first_date || date > last_date {
            return match self.policy {
                OutOfRangePolicy::Error => Err(CalcError::OutOfRange {
                    date,
                    first: first_date,
                    last: last_date,
                }),
                OutOfRangePolicy::Clamp if date < first_date => Ok(first_value),
                OutOfRangePolicy::Clamp => Ok(last_value),
            };
        }

        // number of anchors on or before the date, at least one here
        let idx = self.anchors.partition_point(|(anchor, _)| *anchor <= date);
        let (x0, y0) = self.anchors[idx - 1];
        if x0 == date || idx == self.anchors.len() {
            return Ok(y0);
        }
        let (x1, y1) = self.anchors[idx];
        interpolate(x0, y0, x1, y1, date)
    }

    pub fn rate_at(&self, date: NaiveDate) -> Result<Rate> {
        self.value_at(date).map(Rate::from_decimal)
    }

    pub fn amount_at(&self, date: NaiveDate, rounding: RoundingPolicy) -> Result<Amount> {
        rounding.round(self.value_at(date)?)
    }
}

/// dated fractions by which future amounts are discounted
///
/// between two anchors the factor is interpolated, after the last anchor it
/// stays constant, and before the first anchor nothing is discounted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDiscountFactors")]
pub struct DiscountFactors {
    anchors: Vec<(NaiveDate, Decimal)>,
}

#[derive(Deserialize)]
struct RawDiscountFactors {
    anchors: Vec<(NaiveDate, Decimal)>,
}

impl TryFrom<RawDiscountFactors> for DiscountFactors {
    type Error = CalcError;

    fn try_from(raw: RawDiscountFactors) -> Result<Self> {
        DiscountFactors::new(raw.anchors)
    }
}

impl DiscountFactors {
    pub fn new(anchors: Vec<(NaiveDate, Decimal)>) -> Result<Self> {
        if let Some(pair) = anchors.windows(2).find(|pair| pair[0].0 >= pair[1].0) {
            return Err(CalcError::domain(format!(
                "discount factor dates must be in ascending order: {} is followed by {}",
                pair[0].0, pair[1].0
            )));
        }
        Ok(Self { anchors })
    }

    /// no discounting at all
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn factor_at(&self, date: NaiveDate) -> Result<Decimal> {
        if let Some(pair) = self
            .anchors
            .windows(2)
            .find(|pair| pair[0].0 <= date && date <= pair[1].0)
        {
            return interpolate(pair[0].0, pair[0].1, pair[1].0, pair[1].1, date);
        }
        Ok(self
            .anchors
            .iter()
            .rev()
            .find(|(anchor, _)| *anchor <= date)
            .map(|(_, factor)| *factor)
            .unwrap_or(Decimal::ZERO))
    }

    /// amount minus its discounted share at the given date
    pub fn discount(&self, amount: Amount, date: NaiveDate, rounding: RoundingPolicy) -> Result<Amount> {
        if self.is_empty() {
            return Ok(amount);
        }
        let factor = self.factor_at(date)?;
        let share = amount
            .as_decimal()
            .checked_mul(factor)
            .ok_or_else(|| CalcError::domain(format!("discounting {} overflows", amount)))?;
        amount.checked_sub(rounding.round(share)?)
    }
}
