use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::dates::months_between;
use crate::decimal::{Amount, RoundingPolicy};
use crate::depreciation::{
    DepreciationCorrection, DepreciationSchedule, DepreciationScheduleEntry, DepreciationTerms,
};
use crate::errors::Result;

/// running totals while a schedule is written out
pub(crate) struct ScheduleWriter {
    pub terms: DepreciationTerms,
    pub rounding: RoundingPolicy,
    pub gross: Amount,
    pub reserve: Amount,
    pub yearly: Amount,
    entries: Vec<DepreciationScheduleEntry>,
    corrections: Vec<DepreciationCorrection>,
}

impl ScheduleWriter {
    fn new(terms: DepreciationTerms, rounding: RoundingPolicy) -> Result<Self> {
        let mut writer = Self {
            terms,
            rounding,
            gross: terms.purchase_price,
            reserve: Amount::ZERO,
            yearly: Amount::ZERO,
            entries: Vec::new(),
            corrections: Vec::new(),
        };
        writer.yearly = writer.yearly_for(terms.exact_yearly(terms.purchase_price))?;
        writer.record(terms.purchase_date, Amount::ZERO);
        Ok(writer)
    }

    pub fn book(&self) -> Amount {
        self.gross - self.reserve
    }

    /// rounded yearly amount, at least one unit while anything is left to depreciate
    pub fn yearly_for(&self, exact: Decimal) -> Result<Amount> {
        let yearly = self.rounding.round(exact)?;
        if exact > Decimal::ZERO {
            Ok(yearly.max(Amount::ONE))
        } else {
            Ok(yearly.max(Amount::ZERO))
        }
    }

    /// add to the reserve without taking the book value below the residual
    fn depreciate(&mut self, amount: Amount) -> Amount {
        let room = (self.book() - self.terms.residual_value).max(Amount::ZERO);
        let posted = amount.max(Amount::ZERO).min(room);
        self.reserve += posted;
        posted
    }

    fn record(&mut self, date: NaiveDate, depreciation: Amount) {
        self.entries.push(DepreciationScheduleEntry {
            date,
            gross_value: self.gross,
            book_value: self.book(),
            depreciation,
            reserve: self.reserve,
        });
    }

    /// post a pooled reserve correction, clamped so the book value stays within [residual, gross]
    pub fn correct(&mut self, date: NaiveDate, amount: Amount, new_yearly: Amount) {
        let ceiling = self.gross - self.terms.residual_value - self.reserve;
        let amount = amount.min(ceiling).max(-self.reserve);
        self.reserve += amount;
        self.corrections.push(DepreciationCorrection {
            date,
            amount,
            previous_yearly: self.yearly,
            new_yearly,
        });
        self.yearly = new_yearly;
    }

    fn finish(self) -> DepreciationSchedule {
        DepreciationSchedule {
            entries: self.entries,
            corrections: self.corrections,
        }
    }
}

/// write the ordinary schedule, calling `on_reporting_date` after each posting
///
/// the schedule ends once the residual value is reached, but never before
/// `run_until`.
pub(crate) fn walk<F>(
    terms: DepreciationTerms,
    rounding: RoundingPolicy,
    run_until: Option<NaiveDate>,
    mut on_reporting_date: F,
) -> Result<DepreciationSchedule>
where
    F: FnMut(&mut ScheduleWriter, NaiveDate) -> Result<()>,
{
    terms.validate()?;
    let mut writer = ScheduleWriter::new(terms, rounding)?;

    // broken first year: a share of the yearly amount per started month
    if terms.first_reporting_date > terms.purchase_date {
        let months = months_between(terms.purchase_date, terms.first_reporting_date)?;
        let share = rounding.round(writer.yearly.as_decimal() * Decimal::from(months) / Decimal::from(12))?;
        let posted = writer.depreciate(share);
        on_reporting_date(&mut writer, terms.first_reporting_date)?;
        writer.record(terms.first_reporting_date, posted);
    }

    let mut k = 1;
    loop {
        let date = terms.reporting_date(k)?;
        let pending = run_until.map_or(false, |until| date <= until);
        if writer.book() <= terms.residual_value && !pending {
            break;
        }
        let posted = writer.depreciate(writer.yearly);
        on_reporting_date(&mut writer, date)?;
        writer.record(date, posted);
        k += 1;
    }

    let schedule = writer.finish();
    debug!(
        price = %terms.purchase_price,
        years = terms.years,
        entries = schedule.entries().len(),
        corrections = schedule.corrections().len(),
        "depreciation schedule built"
    );
    Ok(schedule)
}

/// straight-line depreciation at a fixed gross value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearDepreciation {
    pub rounding: RoundingPolicy,
}

impl LinearDepreciation {
    pub fn new(rounding: RoundingPolicy) -> Self {
        Self { rounding }
    }

    pub fn schedule(&self, terms: DepreciationTerms) -> Result<DepreciationSchedule> {
        walk(terms, self.rounding, None, |_, _| Ok(()))
    }

    /// book value on a date
    pub fn value_at(&self, terms: DepreciationTerms, date: NaiveDate) -> Result<Amount> {
        Ok(self.schedule(terms)?.value_at(date))
    }
}
