//! Bookings and their persisted row format.
//!
//! A [`Booking`] is an inclusive range of civil dates held by one person. The
//! store keeps bookings as [`BookingRow`]s whose dates are `dd/mm/yyyy` strings;
//! [`Booking::try_from_row`] is the only way a row becomes a typed booking.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DataFormatError;
use crate::person::PersonId;

/// Date format used by the persisted rows.
pub const ROW_DATE_FORMAT: &str = "%d/%m/%Y";

/// A single booked date range. Always satisfies `start_date <= end_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    person: PersonId,
    start_date: NaiveDate,
    end_date: NaiveDate,
    year: i32,
}

/// A booking as stored: one row of the store with string-typed fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "End Date")]
    pub end_date: String,
    #[serde(rename = "Year")]
    pub year: String,
}

impl Booking {
    /// Build a booking for `[start_date, end_date]`, recorded against the year of
    /// `start_date`. Returns `None` when the range is inverted.
    pub fn new(person: PersonId, start_date: NaiveDate, end_date: NaiveDate) -> Option<Self> {
        if end_date < start_date {
            return None;
        }
        Some(Self {
            person,
            start_date,
            end_date,
            year: start_date.year(),
        })
    }

    pub fn person(&self) -> &PersonId {
        &self.person
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// The year recorded with the booking (the start year for bookings made by
    /// this engine; taken verbatim from the row for persisted ones).
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Every civil date in the booking, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d <= end)
    }

    /// Dates of the booking that fall inside the calendar year `year`.
    pub fn days_in_year(&self, year: i32) -> impl Iterator<Item = NaiveDate> {
        self.days().filter(move |d| d.year() == year)
    }

    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn overlaps_year(&self, year: i32) -> bool {
        self.start_date.year() <= year && self.end_date.year() >= year
    }

    /// Parse a persisted row. `row` is the 1-based data row number, used only for
    /// reporting.
    ///
    /// # Errors
    /// Returns a [`DataFormatError`] when the name is empty, a date is not
    /// `dd/mm/yyyy`, the year is not an integer, or the range is inverted.
    pub fn try_from_row(
        record: &BookingRow,
        row: usize,
    ) -> std::result::Result<Self, DataFormatError> {
        let fail = |message: String| DataFormatError { row, message };

        let person = PersonId::new(&record.name).map_err(|e| fail(e.to_string()))?;
        let start_date = parse_civil_date(&record.start_date)
            .ok_or_else(|| fail(format!("start date '{}' is not dd/mm/yyyy", record.start_date)))?;
        let end_date = parse_civil_date(&record.end_date)
            .ok_or_else(|| fail(format!("end date '{}' is not dd/mm/yyyy", record.end_date)))?;
        let year: i32 = record
            .year
            .trim()
            .parse()
            .map_err(|_| fail(format!("year '{}' is not an integer", record.year)))?;

        if end_date < start_date {
            return Err(fail(format!(
                "end date {} precedes start date {}",
                record.end_date, record.start_date
            )));
        }

        Ok(Self {
            person,
            start_date,
            end_date,
            year,
        })
    }

    /// Render the booking in the persisted row format.
    pub fn to_row(&self) -> BookingRow {
        BookingRow {
            name: self.person.to_string(),
            start_date: format_civil_date(self.start_date),
            end_date: format_civil_date(self.end_date),
            year: self.year.to_string(),
        }
    }
}

/// Parse a `dd/mm/yyyy` date string.
pub fn parse_civil_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ROW_DATE_FORMAT).ok()
}

/// Format a date as `dd/mm/yyyy`.
pub fn format_civil_date(date: NaiveDate) -> String {
    date.format(ROW_DATE_FORMAT).to_string()
}
