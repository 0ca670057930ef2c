//! value of financial instruments at their latest recognition
//!
//! Future amounts are discounted with [`DiscountFactors`](crate::DiscountFactors);
//! amounts already booked are taken as they are.

pub mod instrument;
pub mod lease;
pub mod share;

pub use instrument::{DepositValue, InstrumentPeriod, LoanValue};
pub use lease::{Fee, FeeFrequency, LeaseCostValue};
pub use share::{ShareHistory, ShareObservation};
