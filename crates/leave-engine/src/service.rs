//! Orchestration of the read → decide → append cycle.
//!
//! [`LeaveService`] is built explicitly from a store handle and a configuration;
//! nothing is looked up from global state. Each call reads a fresh snapshot, so
//! results never go stale relative to the store.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use crate::booking::Booking;
use crate::config::EngineConfig;
use crate::entitlement::{self, EntitlementState};
use crate::error::{DataFormatError, Result};
use crate::holidays::{self, PublicHoliday};
use crate::person::PersonId;
use crate::store::BookingStore;
use crate::validator::{self, BookingRequest, Decision};

/// Entitlement for one person and year, with the holidays it was computed from.
///
/// Skipped store rows are handed back in `issues` for the caller to report.
#[derive(Debug, Clone, Serialize)]
pub struct EntitlementReport {
    pub state: EntitlementState,
    pub holidays: Vec<PublicHoliday>,
    /// Rows skipped while reading the store.
    #[serde(skip)]
    pub issues: Vec<DataFormatError>,
}

/// Result of [`LeaveService::book`]. An accepted decision has been persisted.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub decision: Decision,
    pub issues: Vec<DataFormatError>,
}

/// A person's bookings, sorted by start date.
#[derive(Debug, Clone)]
pub struct PersonBookings {
    pub bookings: Vec<Booking>,
    pub issues: Vec<DataFormatError>,
}

pub struct LeaveService<S> {
    store: S,
    config: EngineConfig,
}

impl<S: BookingStore> LeaveService<S> {
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compute `person`'s remaining allowance for `year`.
    ///
    /// # Errors
    /// `LeaveError::YearOutOfRange` for an unsupported year (checked before the
    /// store is read) and `LeaveError::Store` when the fetch fails.
    pub fn check(&self, person: &PersonId, year: i32) -> Result<EntitlementReport> {
        let holidays = holidays::holidays_for_year(year)?;
        let fetched = self.store.fetch_all()?;

        let holiday_set: BTreeSet<_> = holidays.iter().map(|h| h.date).collect();
        let state = entitlement::remaining(person, year, &fetched.bookings, &holiday_set, &self.config);

        Ok(EntitlementReport {
            state,
            holidays,
            issues: fetched.issues,
        })
    }

    /// Validate `request` and append it to the store when accepted.
    ///
    /// # Errors
    /// Store failures (fetch or append) propagate unchanged as
    /// `LeaveError::Store`. Rejections are returned in the outcome.
    pub fn book(&self, request: &BookingRequest) -> Result<BookingOutcome> {
        let fetched = self.store.fetch_all()?;

        let decision = validator::validate(request, &fetched.bookings, &self.config)?;
        match &decision {
            Decision::Accepted(approval) => {
                self.store.append(&approval.booking)?;
                info!(
                    person = %request.person,
                    start = %request.start_date,
                    end = %request.end_date,
                    new_days = approval.new_days,
                    remaining = approval.remaining_after,
                    "booked leave"
                );
            }
            Decision::Rejected(rejection) => {
                info!(person = %request.person, "booking rejected: {}", rejection);
            }
        }

        Ok(BookingOutcome {
            decision,
            issues: fetched.issues,
        })
    }

    /// Every booking held by `person`, across all years.
    pub fn bookings_for(&self, person: &PersonId) -> Result<PersonBookings> {
        let fetched = self.store.fetch_all()?;

        let mut bookings: Vec<Booking> = fetched
            .bookings
            .into_iter()
            .filter(|b| b.person() == person)
            .collect();
        bookings.sort_by_key(|b| (b.start_date(), b.end_date()));

        Ok(PersonBookings {
            bookings,
            issues: fetched.issues,
        })
    }
}
