//! Booking validation: decides whether a requested range fits the allowance.
//!
//! Validation is pure: it reads a booking snapshot and returns a [`Decision`].
//! Persisting an accepted booking is the caller's job (see
//! [`crate::service::LeaveService::book`]).
//!
//! Checks run in order and the first failure decides the outcome:
//!
//! 1. The range must not be inverted, otherwise [`Rejection::InvalidRange`]
//!    (no entitlement is computed).
//! 2. The range is split by calendar year, starting with the year of
//!    `start_date`, and entitlement for each year is computed from the snapshot.
//! 3. Only *new* days are charged: dates the person already holds are free, and
//!    public holidays are free when the policy does not charge them. Each day is
//!    charged to its own year.
//! 4. The request is accepted iff every year it touches has
//!    `remaining_days >= new_days`, otherwise
//!    [`Rejection::InsufficientEntitlement`] for the first year that falls short.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::booking::Booking;
use crate::config::EngineConfig;
use crate::entitlement;
use crate::error::Result;
use crate::holidays;
use crate::person::PersonId;

/// A request to book `[start_date, end_date]` inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub person: PersonId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl BookingRequest {
    pub fn new(person: PersonId, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            person,
            start_date,
            end_date,
        }
    }
}

/// Outcome of validating a [`BookingRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accepted(Approval),
    Rejected(Rejection),
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted(_))
    }
}

/// An accepted request, carrying the booking the caller should append.
///
/// `remaining_before` and `remaining_after` are the balance of the start year;
/// `charges` has one entry per calendar year the range touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Approval {
    pub booking: Booking,
    /// Length of the requested range in days.
    pub requested_days: i64,
    /// Days of the range that are actually charged, across all years.
    pub new_days: i64,
    pub remaining_before: i64,
    pub remaining_after: i64,
    pub charges: Vec<YearCharge>,
}

/// The part of a request charged against one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCharge {
    pub year: i32,
    pub new_days: i64,
    pub remaining_before: i64,
    pub remaining_after: i64,
}

/// Why a request was turned down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Rejection {
    InvalidRange {
        start: NaiveDate,
        end: NaiveDate,
    },
    InsufficientEntitlement {
        year: i32,
        requested_new_days: i64,
        remaining_days: i64,
        shortfall: i64,
    },
}

impl Rejection {
    /// Short machine-stable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::InvalidRange { .. } => "invalid range",
            Rejection::InsufficientEntitlement { .. } => "insufficient remaining holidays",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::InvalidRange { start, end } => {
                write!(f, "{}: end date {} precedes start date {}", self.reason(), end, start)
            }
            Rejection::InsufficientEntitlement {
                year,
                requested_new_days,
                remaining_days,
                shortfall,
            } => write!(
                f,
                "{}: {} new day(s) requested in {}, {} remaining, short by {}",
                self.reason(),
                requested_new_days,
                year,
                remaining_days,
                shortfall
            ),
        }
    }
}

/// Validate `request` against the booking snapshot `bookings`.
///
/// # Errors
/// Returns `LeaveError::YearOutOfRange` if a year the range touches has no
/// holiday calendar. Every domain outcome, including rejections, is `Ok`.
pub fn validate(
    request: &BookingRequest,
    bookings: &[Booking],
    config: &EngineConfig,
) -> Result<Decision> {
    let Some(booking) = Booking::new(request.person.clone(), request.start_date, request.end_date)
    else {
        debug!(person = %request.person, start = %request.start_date, end = %request.end_date, "rejected inverted range");
        return Ok(Decision::Rejected(Rejection::InvalidRange {
            start: request.start_date,
            end: request.end_date,
        }));
    };

    let requested_days = booking.day_count();
    let holidays_free = config.holiday_policy.holidays_are_free();

    let mut charges = Vec::new();
    for year in request.start_date.year()..=request.end_date.year() {
        let holiday_set = holidays::holiday_dates(year)?;
        let state = entitlement::remaining(&request.person, year, bookings, &holiday_set, config);
        let new_days = booking
            .days_in_year(year)
            .filter(|d| !state.consumed_days.contains(d))
            .filter(|d| !(holidays_free && holiday_set.contains(d)))
            .count() as i64;

        if state.remaining_days < new_days {
            debug!(
                person = %request.person,
                year,
                new_days,
                remaining = state.remaining_days,
                "rejected booking request"
            );
            return Ok(Decision::Rejected(Rejection::InsufficientEntitlement {
                year,
                requested_new_days: new_days,
                remaining_days: state.remaining_days,
                shortfall: new_days - state.remaining_days,
            }));
        }

        charges.push(YearCharge {
            year,
            new_days,
            remaining_before: state.remaining_days,
            remaining_after: state.remaining_days - new_days,
        });
    }

    let new_days: i64 = charges.iter().map(|c| c.new_days).sum();
    let (remaining_before, remaining_after) = charges
        .first()
        .map(|c| (c.remaining_before, c.remaining_after))
        .unwrap_or_default();

    debug!(
        person = %request.person,
        requested_days,
        new_days,
        remaining = remaining_after,
        years = charges.len(),
        "accepted booking request"
    );

    Ok(Decision::Accepted(Approval {
        booking,
        requested_days,
        new_days,
        remaining_before,
        remaining_after,
        charges,
    }))
}
