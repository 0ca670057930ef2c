pub mod config;
pub mod dates;
pub mod decimal;
pub mod depreciation;
pub mod errors;
pub mod events;
pub mod interest;
pub mod interpolate;
pub mod payments;
pub mod types;
pub mod valuation;

// re-export key types
pub use config::InterestConfig;
pub use decimal::{Amount, Rate, RoundingPolicy};
pub use errors::{CalcError, Result};
pub use events::{BalanceChange, ChangeEvent};
pub use interest::{
    Compounding, CompoundingEngine, DayCountConvention, InterestLedger, InterestLedgerEntry,
    PeriodSegment, PeriodSplitter, RateSource, RunningInterestScheduler, SegmentKind,
};
pub use interpolate::{Curve, DiscountFactors};
pub use payments::{AnnuityGenerator, AnnuityRow, AnnuitySchedule};
pub use depreciation::{
    DepreciationCorrection, DepreciationSchedule, DepreciationScheduleEntry, DepreciationTerms,
    LinearDepreciation, ReplacementCostDepreciation, Revaluation,
};
pub use types::{DateRange, LeadingDays, OutOfRangePolicy};
pub use valuation::{
    DepositValue, Fee, FeeFrequency, InstrumentPeriod, LeaseCostValue, LoanValue, ShareHistory,
    ShareObservation,
};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
