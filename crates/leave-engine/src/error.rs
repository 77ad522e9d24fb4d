//! Error types for leave-engine operations.
//!
//! Domain decisions (an inverted range, an exhausted allowance) are not errors;
//! they come back as [`crate::validator::Rejection`] values. The types here cover
//! bad input that cannot be evaluated at all and failures of the booking store.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeaveError {
    #[error("Person identifier is empty")]
    EmptyPerson,

    #[error("Year {0} is outside the supported range 1..=9999")]
    YearOutOfRange(i32),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure of the booking store collaborator. Never retried by the engine.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A persisted booking row that could not be turned into a [`crate::Booking`].
///
/// Rows are 1-based, counting the first data row after the header as row 1.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Row {row}: {message}")]
pub struct DataFormatError {
    pub row: usize,
    pub message: String,
}

pub type Result<T> = std::result::Result<T, LeaveError>;
