use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::errors::{CalcError, Result};

/// amount of money as a signed count of minor currency units (cents, pence, yen)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const ONE: Amount = Amount(1);

    /// create from minor units
    pub const fn from_minor(units: i64) -> Self {
        Amount(units)
    }

    /// number of minor units
    pub fn minor(&self) -> i64 {
        self.0
    }

    /// exact decimal view, used for intermediate ratios
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// check if positive
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// check if negative
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// absolute value
    pub fn abs(&self) -> Self {
        Amount(self.0.abs())
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Amount(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Amount(self.0.max(other.0))
    }

    pub fn checked_add(self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or_else(|| CalcError::domain(format!("{} + {} overflows minor units", self, other)))
    }

    pub fn checked_sub(self, other: Self) -> Result<Self> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or_else(|| CalcError::domain(format!("{} - {} overflows minor units", self, other)))
    }

    /// sum that reports overflow instead of wrapping
    pub fn try_sum<I: IntoIterator<Item = Amount>>(amounts: I) -> Result<Self> {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for Amount {
    fn from(units: i64) -> Self {
        Amount(units)
    }
}

impl From<i32> for Amount {
    fn from(units: i32) -> Self {
        Amount(units as i64)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, other: Amount) -> Amount {
        Amount(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Amount) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, other: Amount) -> Amount {
        Amount(self.0 - other.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, other: Amount) {
        self.0 -= other.0;
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, x| acc + *x)
    }
}

/// rate type for interest rates and ratios, stored as a fraction (0.05 for 5%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);
    pub const ONE: Rate = Rate(Decimal::ONE);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::from(100))
    }

    /// create from basis points (e.g., 500 for 5%)
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::from(bps) / Decimal::from(10000))
    }

    /// get as decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

/// how a decimal intermediate result becomes a whole number of minor units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundingPolicy {
    /// round half to even (banker's rounding)
    HalfEven,
    /// round half away from zero
    HalfUp,
}

impl RoundingPolicy {
    fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingPolicy::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingPolicy::HalfUp => RoundingStrategy::MidpointAwayFromZero,
        }
    }

    /// round once to minor units
    pub fn round(&self, value: Decimal) -> Result<Amount> {
        value
            .round_dp_with_strategy(0, self.strategy())
            .to_i64()
            .map(Amount::from_minor)
            .ok_or_else(|| CalcError::domain(format!("{} does not fit in minor units", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_arithmetic() {
        let a = Amount::from_minor(130_000);
        let b = Amount::from_minor(530);

        assert_eq!(a + b, Amount::from_minor(130_530));
        assert_eq!(a - b, Amount::from_minor(129_470));
        assert_eq!(-b, Amount::from_minor(-530));
        assert_eq!((b - a).abs(), Amount::from_minor(129_470));

        let mut c = a;
        c += b;
        c -= Amount::ONE;
        assert_eq!(c.minor(), 130_529);

        let total: Amount = [a, b, Amount::from(72)].iter().sum();
        assert_eq!(total, Amount::from_minor(130_602));
        assert_eq!(total.to_string(), "130602");
    }

    #[test]
    fn test_amount_display_honours_width() {
        assert_eq!(format!("{:>6}", Amount::from_minor(72)), "    72");
        assert_eq!(format!("{:<5}|", Amount::from_minor(-3)), "-3   |");
        assert_eq!(format!("{:08}", Amount::from_minor(130_530)), "00130530");
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let max = Amount::from_minor(i64::MAX);
        assert!(matches!(max.checked_add(Amount::ONE), Err(CalcError::Domain { .. })));
        assert!(matches!(
            Amount::from_minor(i64::MIN).checked_sub(Amount::ONE),
            Err(CalcError::Domain { .. })
        ));
        assert_eq!(
            Amount::from_minor(530).checked_sub(Amount::from_minor(72)).unwrap(),
            Amount::from_minor(458)
        );

        assert_eq!(
            Amount::try_sum([Amount::from_minor(530), Amount::from_minor(72)]).unwrap(),
            Amount::from_minor(602)
        );
        assert!(Amount::try_sum([max, max]).is_err());
    }

    #[test]
    fn test_rate_constructors() {
        assert_eq!(Rate::from_percentage(5).as_decimal(), dec!(0.05));
        assert_eq!(Rate::from_bps(250).as_decimal(), dec!(0.025));
        assert_eq!(Rate::from_decimal(dec!(0.05)).to_string(), "5%");
        assert!(Rate::from_decimal(dec!(-0.01)).is_negative());
        assert!(!Rate::ZERO.is_negative());
    }

    #[test]
    fn test_rounding_policies_differ_on_midpoints() {
        assert_eq!(RoundingPolicy::HalfEven.round(dec!(2.5)).unwrap(), Amount::from_minor(2));
        assert_eq!(RoundingPolicy::HalfUp.round(dec!(2.5)).unwrap(), Amount::from_minor(3));
        assert_eq!(RoundingPolicy::HalfEven.round(dec!(3.5)).unwrap(), Amount::from_minor(4));
        assert_eq!(RoundingPolicy::HalfEven.round(dec!(-2.5)).unwrap(), Amount::from_minor(-2));
        assert_eq!(RoundingPolicy::HalfUp.round(dec!(-2.5)).unwrap(), Amount::from_minor(-3));
        assert_eq!(RoundingPolicy::HalfEven.round(dec!(71.5232)).unwrap(), Amount::from_minor(72));
    }

    #[test]
    fn test_rounding_overflow_is_domain_error() {
        let huge = Decimal::MAX;
        assert!(matches!(
            RoundingPolicy::HalfEven.round(huge),
            Err(CalcError::Domain { .. })
        ));
    }
}
