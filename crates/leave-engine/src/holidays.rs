//! Public holiday calendar (England & Wales bank holiday rules).
//!
//! Holidays are a pure function of the year. Three are fixed dates, two hang off
//! Easter Sunday, and three are "first/last Monday of the month" rules:
//!
//! | Holiday                | Rule                        |
//! |------------------------|-----------------------------|
//! | New Year's Day         | 1 January                   |
//! | Good Friday            | Easter Monday − 3 days      |
//! | Easter Monday          | Easter Sunday + 1 day       |
//! | Early May Bank Holiday | first Monday of May         |
//! | Spring Bank Holiday    | last Monday of May          |
//! | Summer Bank Holiday    | last Monday of August       |
//! | Christmas Day          | 25 December                 |
//! | Boxing Day             | 26 December                 |
//!
//! No substitute days are added when a fixed holiday falls on a weekend.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use crate::error::{LeaveError, Result};

/// Earliest year the calendar is defined for.
pub const MIN_YEAR: i32 = 1;
/// Latest year the calendar is defined for (four-digit persisted dates).
pub const MAX_YEAR: i32 = 9999;

/// A public holiday: a date and its human-readable name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PublicHoliday {
    pub date: NaiveDate,
    pub label: &'static str,
}

/// Compute the public holidays for `year`, sorted by date.
///
/// The rule set always yields 8 distinct dates: New Year's Day, Good Friday,
/// Easter Monday, Early May (first Monday of May), Spring (last Monday of May),
/// Summer (last Monday of August), Christmas Day and Boxing Day.
///
/// # Errors
/// Returns `LeaveError::YearOutOfRange` if `year` is outside `MIN_YEAR..=MAX_YEAR`.
pub fn holidays_for_year(year: i32) -> Result<Vec<PublicHoliday>> {
    check_year(year)?;

    let easter_monday = easter_sunday(year)? + Duration::days(1);
    let out_of_range = || LeaveError::YearOutOfRange(year);

    let mut holidays = vec![
        PublicHoliday {
            date: ymd(year, 1, 1)?,
            label: "New Year's Day",
        },
        PublicHoliday {
            date: easter_monday - Duration::days(3),
            label: "Good Friday",
        },
        PublicHoliday {
            date: easter_monday,
            label: "Easter Monday",
        },
        PublicHoliday {
            date: nth_weekday_of_month(year, 5, Weekday::Mon, 1).ok_or_else(out_of_range)?,
            label: "Early May Bank Holiday",
        },
        PublicHoliday {
            date: last_weekday_of_month(year, 5, Weekday::Mon).ok_or_else(out_of_range)?,
            label: "Spring Bank Holiday",
        },
        PublicHoliday {
            date: last_weekday_of_month(year, 8, Weekday::Mon).ok_or_else(out_of_range)?,
            label: "Summer Bank Holiday",
        },
        PublicHoliday {
            date: ymd(year, 12, 25)?,
            label: "Christmas Day",
        },
        PublicHoliday {
            date: ymd(year, 12, 26)?,
            label: "Boxing Day",
        },
    ];
    holidays.sort();

    Ok(holidays)
}

/// The dates of [`holidays_for_year`] as a set.
pub fn holiday_dates(year: i32) -> Result<BTreeSet<NaiveDate>> {
    Ok(holidays_for_year(year)?.into_iter().map(|h| h.date).collect())
}

/// Easter Sunday for `year` by the anonymous Gregorian (Meeus/Jones/Butcher)
/// computus.
///
/// # Errors
/// Returns `LeaveError::YearOutOfRange` if `year` is outside `MIN_YEAR..=MAX_YEAR`.
pub fn easter_sunday(year: i32) -> Result<NaiveDate> {
    check_year(year)?;

    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    ymd(year, month as u32, day as u32)
}

/// The `n`-th (1-based) occurrence of `weekday` in the given month, if it exists.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

/// The last occurrence of `weekday` in the given month.
pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = first_of_next.pred_opt()?;
    let back = (last.weekday().num_days_from_monday() + 7 - weekday.num_days_from_monday()) % 7;
    Some(last - Duration::days(i64::from(back)))
}

fn check_year(year: i32) -> Result<()> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(LeaveError::YearOutOfRange(year))
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(LeaveError::YearOutOfRange(year))
}
