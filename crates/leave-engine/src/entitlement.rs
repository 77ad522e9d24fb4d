//! Entitlement accounting: how much of a year's allowance a person has used.
//!
//! Consumption is a *set* of dates, not a sum of booking lengths: overlapping or
//! repeated bookings for the same person never charge a date twice. The state is
//! recomputed from the booking snapshot on every call and never cached.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::booking::Booking;
use crate::config::{EngineConfig, HolidayPolicy};
use crate::person::PersonId;

/// A person's position against their allowance for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitlementState {
    pub person: PersonId,
    pub year: i32,
    /// Every booked date of the person falling inside `year`.
    pub consumed_days: BTreeSet<NaiveDate>,
    /// Allowance left after charging consumed days under the configured policy.
    /// Negative when the history already over-allocates.
    pub remaining_days: i64,
    /// Public holidays of `year` the person has not booked.
    pub remaining_holiday_count: usize,
}

impl EntitlementState {
    pub fn days_taken(&self) -> usize {
        self.consumed_days.len()
    }

    /// True once the person has booked more than the allowance. A balance of
    /// exactly zero is not overdrawn.
    pub fn is_overdrawn(&self) -> bool {
        self.remaining_days < 0
    }
}

/// Union of the inclusive date ranges of `person`'s bookings, clipped to `year`.
pub fn consumed_days_for(person: &PersonId, year: i32, bookings: &[Booking]) -> BTreeSet<NaiveDate> {
    bookings
        .iter()
        .filter(|b| b.person() == person && b.overlaps_year(year))
        .flat_map(|b| b.days_in_year(year))
        .collect()
}

/// Compute remaining allowance for `person` in `year`.
///
/// `holidays` must be the public holiday dates of `year`. A person with no
/// bookings gets the full allowance (minus the reserved holidays under
/// [`HolidayPolicy::Reserved`]).
pub fn remaining(
    person: &PersonId,
    year: i32,
    bookings: &[Booking],
    holidays: &BTreeSet<NaiveDate>,
    config: &EngineConfig,
) -> EntitlementState {
    let consumed_days = consumed_days_for(person, year, bookings);
    let charged = charged_day_count(&consumed_days, holidays, config.holiday_policy);
    let remaining_days = i64::from(config.annual_entitlement) - charged as i64;
    let remaining_holiday_count = holidays.difference(&consumed_days).count();

    debug!(
        person = %person,
        year,
        consumed = consumed_days.len(),
        charged,
        remaining_days,
        remaining_holiday_count,
        "computed entitlement"
    );

    EntitlementState {
        person: person.clone(),
        year,
        consumed_days,
        remaining_days,
        remaining_holiday_count,
    }
}

/// Number of days charged against the allowance for a consumed set.
pub(crate) fn charged_day_count(
    consumed: &BTreeSet<NaiveDate>,
    holidays: &BTreeSet<NaiveDate>,
    policy: HolidayPolicy,
) -> usize {
    match policy {
        HolidayPolicy::CountAgainst => consumed.len(),
        HolidayPolicy::Excluded => consumed.difference(holidays).count(),
        HolidayPolicy::Reserved => consumed.union(holidays).count(),
    }
}
