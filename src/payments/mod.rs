pub mod amortization;

pub use amortization::{AnnuityGenerator, AnnuityRow, AnnuitySchedule};
