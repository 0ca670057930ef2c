use serde::{Deserialize, Serialize};

use crate::decimal::RoundingPolicy;
use crate::errors::{CalcError, Result};
use crate::interest::{Compounding, CompoundingEngine, DayCountConvention, PeriodSplitter};
use crate::types::LeadingDays;

/// interest configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestConfig {
    pub day_count: DayCountConvention,
    pub compounding: Compounding,
    pub leading_days: LeadingDays,
    pub rounding: RoundingPolicy,
}

impl InterestConfig {
    pub fn new(
        day_count: DayCountConvention,
        compounding: Compounding,
        leading_days: LeadingDays,
        rounding: RoundingPolicy,
    ) -> Self {
        Self {
            day_count,
            compounding,
            leading_days,
            rounding,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let LeadingDays::ToDayOfMonth(day) = self.leading_days {
            if !(1..=31).contains(&day) {
                return Err(CalcError::domain(format!("day of month {} is not 1..=31", day)));
            }
        }
        Ok(())
    }

    pub fn splitter(&self) -> PeriodSplitter {
        PeriodSplitter::new(self.day_count, self.leading_days)
    }

    pub fn engine(&self) -> CompoundingEngine {
        CompoundingEngine::new(self.day_count, self.compounding, self.rounding)
    }
}
