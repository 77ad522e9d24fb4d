//! # leave-engine
//!
//! Holiday entitlement and booking engine.
//!
//! Tracks each person's leave against a fixed annual allowance and the public
//! holidays of England & Wales, and decides whether a requested date range may
//! be booked. All dates are civil dates; there are no timezones and no half
//! days.
//!
//! ## Modules
//!
//! - [`holidays`] — year → public holidays (Easter computus, Monday rules)
//! - [`entitlement`] — booking history → consumed days and remaining allowance
//! - [`validator`] — booking request → accept / reject decision
//! - [`store`] — booking store trait, CSV and in-memory implementations
//! - [`service`] — read → validate → append orchestration over a store
//! - [`config`] — annual allowance and public holiday policy
//! - [`person`] — normalized person identifiers
//! - [`booking`] — bookings and their `dd/mm/yyyy` row format
//! - [`error`] — Error types

pub mod booking;
pub mod config;
pub mod entitlement;
pub mod error;
pub mod holidays;
pub mod person;
pub mod service;
pub mod store;
pub mod validator;

pub use booking::{Booking, BookingRow};
pub use config::{EngineConfig, HolidayPolicy, DEFAULT_ANNUAL_ENTITLEMENT};
pub use entitlement::{remaining, EntitlementState};
pub use error::{DataFormatError, LeaveError, StoreError};
pub use holidays::{holidays_for_year, PublicHoliday};
pub use person::PersonId;
pub use service::LeaveService;
pub use store::{BookingStore, CsvBookingStore, FetchedBookings, MemoryBookingStore};
pub use validator::{validate, BookingRequest, Decision, Rejection, YearCharge};
