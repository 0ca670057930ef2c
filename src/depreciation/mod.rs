//! straight-line depreciation of fixed assets
//!
//! an asset is written down from its purchase price to its residual value
//! over a whole number of years, with one posting per reporting date. the
//! replacement-cost variant lets the caller restate the asset's gross value
//! at reporting dates; the catch-up for past years is posted as a single
//! correction to the aggregate reserve.

pub mod linear;
pub mod replacement;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::add_years;
use crate::decimal::Amount;
use crate::errors::{CalcError, Result};

pub use linear::LinearDepreciation;
pub use replacement::{ReplacementCostDepreciation, Revaluation};

/// what is being depreciated and over which period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationTerms {
    pub purchase_price: Amount,
    pub purchase_date: NaiveDate,
    /// first balance-sheet date, within a year of the purchase
    pub first_reporting_date: NaiveDate,
    pub years: u32,
    pub residual_value: Amount,
}

impl DepreciationTerms {
    pub fn new(
        purchase_price: Amount,
        purchase_date: NaiveDate,
        first_reporting_date: NaiveDate,
        years: u32,
        residual_value: Amount,
    ) -> Result<Self> {
        let terms = Self {
            purchase_price,
            purchase_date,
            first_reporting_date,
            years,
            residual_value,
        };
        terms.validate()?;
        Ok(terms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.years < 1 {
            return Err(CalcError::domain("depreciation needs at least one year"));
        }
        if self.residual_value.is_negative() {
            return Err(CalcError::domain(format!(
                "residual value {} is negative",
                self.residual_value
            )));
        }
        if self.residual_value > self.purchase_price {
            return Err(CalcError::domain(format!(
                "residual value {} exceeds purchase price {}",
                self.residual_value, self.purchase_price
            )));
        }
        let year_after = add_years(self.purchase_date, 1)?;
        if self.first_reporting_date < self.purchase_date || self.first_reporting_date >= year_after {
            return Err(CalcError::domain(format!(
                "first reporting date {} is not within a year of purchase on {}",
                self.first_reporting_date, self.purchase_date
            )));
        }
        Ok(())
    }

    /// the k-th reporting date after the first one
    pub fn reporting_date(&self, k: u32) -> Result<NaiveDate> {
        let years = i32::try_from(k)
            .map_err(|_| CalcError::domain(format!("{} years is out of range", k)))?;
        add_years(self.first_reporting_date, years)
    }

    /// unrounded yearly depreciation for a given gross value
    pub fn exact_yearly(&self, gross_value: Amount) -> Decimal {
        (gross_value - self.residual_value).as_decimal() / Decimal::from(self.years)
    }
}

/// book values at one reporting date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationScheduleEntry {
    pub date: NaiveDate,
    /// purchase price, or the latest replacement cost
    pub gross_value: Amount,
    pub book_value: Amount,
    /// ordinary depreciation posted at this date
    pub depreciation: Amount,
    /// accumulated depreciation, corrections included
    pub reserve: Amount,
}

/// pooled catch-up posted to the reserve after a revaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationCorrection {
    pub date: NaiveDate,
    pub amount: Amount,
    pub previous_yearly: Amount,
    pub new_yearly: Amount,
}

/// depreciation schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    entries: Vec<DepreciationScheduleEntry>,
    corrections: Vec<DepreciationCorrection>,
}

impl DepreciationSchedule {
    pub fn entries(&self) -> &[DepreciationScheduleEntry] {
        &self.entries
    }

    pub fn corrections(&self) -> &[DepreciationCorrection] {
        &self.corrections
    }

    /// book value on a date: zero before purchase, pinned at the residual after the end
    pub fn value_at(&self, date: NaiveDate) -> Amount {
        self.entry_at(date).map(|e| e.book_value).unwrap_or(Amount::ZERO)
    }

    /// accumulated depreciation on a date
    pub fn reserve_at(&self, date: NaiveDate) -> Amount {
        self.entry_at(date).map(|e| e.reserve).unwrap_or(Amount::ZERO)
    }

    pub fn total_depreciation(&self) -> Amount {
        self.entries.iter().map(|e| e.depreciation).sum()
    }

    fn entry_at(&self, date: NaiveDate) -> Option<&DepreciationScheduleEntry> {
        let idx = self.entries.partition_point(|e| e.date <= date);
        idx.checked_sub(1).and_then(|i| self.entries.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_terms_validation() {
        let ok = DepreciationTerms::new(
            Amount::from_minor(120_000),
            date(2022, 12, 17),
            date(2023, 1, 1),
            6,
            Amount::from_minor(4_500),
        );
        assert!(ok.is_ok());

        let no_years = DepreciationTerms::new(Amount::from_minor(1_000), date(2023, 1, 1), date(2023, 1, 1), 0, Amount::ZERO);
        assert!(matches!(no_years, Err(CalcError::Domain { .. })));

        let residual_too_high =
            DepreciationTerms::new(Amount::from_minor(1_000), date(2023, 1, 1), date(2023, 1, 1), 3, Amount::from_minor(1_001));
        assert!(residual_too_high.is_err());

        let negative_residual =
            DepreciationTerms::new(Amount::from_minor(1_000), date(2023, 1, 1), date(2023, 1, 1), 3, Amount::from_minor(-1));
        assert!(negative_residual.is_err());

        let report_too_late =
            DepreciationTerms::new(Amount::from_minor(1_000), date(2023, 1, 1), date(2024, 1, 1), 3, Amount::ZERO);
        assert!(report_too_late.is_err());

        let report_before_purchase =
            DepreciationTerms::new(Amount::from_minor(1_000), date(2023, 1, 2), date(2023, 1, 1), 3, Amount::ZERO);
        assert!(report_before_purchase.is_err());
    }

    #[test]
    fn test_reporting_dates_keep_anniversary() {
        let terms = DepreciationTerms::new(
            Amount::from_minor(1_000),
            date(2024, 2, 1),
            date(2024, 2, 29),
            3,
            Amount::ZERO,
        )
        .unwrap();
        assert_eq!(terms.reporting_date(1).unwrap(), date(2025, 2, 28));
        assert_eq!(terms.reporting_date(4).unwrap(), date(2028, 2, 29));
    }
}
