use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    /// invalid mathematical input (negative period count, empty domain, ...)
    #[error("domain error: {message}")]
    Domain {
        message: String,
    },

    #[error("date {date} outside range {first} to {last}")]
    OutOfRange {
        date: NaiveDate,
        first: NaiveDate,
        last: NaiveDate,
    },

    #[error("insufficient history: {provided} observations, at least {required} required")]
    InsufficientHistory {
        required: usize,
        provided: usize,
    },
}

impl CalcError {
    /// shorthand for a domain error
    pub fn domain(message: impl Into<String>) -> Self {
        CalcError::Domain {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
