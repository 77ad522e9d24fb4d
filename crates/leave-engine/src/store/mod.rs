//! # Booking store
//!
//! The store is the system of record for bookings. The engine only ever reads a
//! full snapshot ([`BookingStore::fetch_all`]) and appends single rows
//! ([`BookingStore::append`]); it never edits or deletes.
//!
//! Implementations must serialize concurrent appends. Two callers that both
//! read the same snapshot can each be accepted and together over-allocate a
//! person's allowance; guarding against that (a compare-and-append keyed on
//! person and year, or a single writer per person) belongs to the store.

mod csv_store;
mod memory;

pub use self::csv_store::CsvBookingStore;
pub use self::memory::MemoryBookingStore;

use serde::Serialize;
use tracing::debug;

use crate::booking::{Booking, BookingRow};
use crate::error::{DataFormatError, StoreError};

/// A full snapshot of the store. Rows that failed to parse are skipped and
/// reported in `issues`; they never abort the fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchedBookings {
    pub bookings: Vec<Booking>,
    #[serde(skip)]
    pub issues: Vec<DataFormatError>,
}

impl FetchedBookings {
    /// Parse numbered rows, collecting failures instead of stopping at the first.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (usize, std::result::Result<BookingRow, DataFormatError>)>,
    {
        let mut fetched = Self::default();
        for (row, record) in rows {
            match record.and_then(|r| Booking::try_from_row(&r, row)) {
                Ok(booking) => fetched.bookings.push(booking),
                Err(issue) => {
                    debug!(row = issue.row, "skipping malformed booking row: {}", issue.message);
                    fetched.issues.push(issue);
                }
            }
        }
        fetched
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Storage backend for bookings.
pub trait BookingStore {
    /// Read every persisted booking.
    fn fetch_all(&self) -> Result<FetchedBookings, StoreError>;

    /// Append one booking as a new row.
    fn append(&self, booking: &Booking) -> Result<(), StoreError>;
}

impl<S: BookingStore + ?Sized> BookingStore for &S {
    fn fetch_all(&self) -> Result<FetchedBookings, StoreError> {
        (**self).fetch_all()
    }

    fn append(&self, booking: &Booking) -> Result<(), StoreError> {
        (**self).append(booking)
    }
}

impl<S: BookingStore + ?Sized> BookingStore for Box<S> {
    fn fetch_all(&self) -> Result<FetchedBookings, StoreError> {
        (**self).fetch_all()
    }

    fn append(&self, booking: &Booking) -> Result<(), StoreError> {
        (**self).append(booking)
    }
}
