use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{BookingStore, FetchedBookings};
use crate::booking::{Booking, BookingRow};
use crate::error::StoreError;

/// In-process booking store.
///
/// Holds raw [`BookingRow`]s so malformed history can be seeded, and can be
/// switched offline to exercise store failures.
#[derive(Debug, Default)]
pub struct MemoryBookingStore {
    rows: Mutex<Vec<BookingRow>>,
    offline: AtomicBool,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<BookingRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            offline: AtomicBool::new(false),
        }
    }

    pub fn with_bookings<'a>(bookings: impl IntoIterator<Item = &'a Booking>) -> Self {
        Self::with_rows(bookings.into_iter().map(Booking::to_row).collect())
    }

    /// Push a raw row, bypassing validation.
    pub fn push_row(&self, row: BookingRow) {
        self.lock().push(row);
    }

    /// Make every subsequent fetch and append fail with `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<BookingRow> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Vec<BookingRow>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

impl BookingStore for MemoryBookingStore {
    fn fetch_all(&self) -> Result<FetchedBookings, StoreError> {
        self.ensure_online()?;
        let rows = self.rows();
        Ok(FetchedBookings::from_rows(
            rows.into_iter().enumerate().map(|(i, row)| (i + 1, Ok(row))),
        ))
    }

    fn append(&self, booking: &Booking) -> Result<(), StoreError> {
        self.ensure_online()?;
        self.lock().push(booking.to_row());
        Ok(())
    }
}
