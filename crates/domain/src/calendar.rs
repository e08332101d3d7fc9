// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Week and month boundaries.
//!
//! Every canonical week opens on [`WEEK_ANCHOR`]. Resolving a date to its
//! week always steps backwards to the anchor of the week that contains the
//! date; it never moves forward into the following week.
//!
//! ## Offset table
//!
//! | weekday   | offset |
//! |-----------|--------|
//! | Wednesday | 0      |
//! | Thursday  | -1     |
//! | Friday    | -2     |
//! | Saturday  | -3     |
//! | Sunday    | -4     |
//! | Monday    | -5     |
//! | Tuesday   | -6     |

use crate::error::DomainError;
use time::{Date, Duration, Month, Weekday};

/// The weekday every canonical week begins on.
pub const WEEK_ANCHOR: Weekday = Weekday::Wednesday;

/// Number of dates in a canonical week.
pub const DAYS_PER_WEEK: usize = 7;

/// Last day of the month that belongs to the replication template.
pub const TEMPLATE_LAST_DAY: u8 = 7;

const MIN_YEAR: i32 = 2000;
const MAX_YEAR: i32 = 2200;

/// Signed day offset from `weekday` to the anchor of the same week.
#[must_use]
pub const fn anchor_offset(weekday: Weekday) -> i64 {
    match weekday {
        Weekday::Wednesday => 0,
        Weekday::Thursday => -1,
        Weekday::Friday => -2,
        Weekday::Saturday => -3,
        Weekday::Sunday => -4,
        Weekday::Monday => -5,
        Weekday::Tuesday => -6,
    }
}

/// Resolves any date to the anchor date of the week containing it.
///
/// # Errors
///
/// Returns an error only for dates at the very start of the representable
/// range, whose anchor would fall before it.
pub fn week_start(date: Date) -> Result<Date, DomainError> {
    date.checked_add(Duration::days(anchor_offset(date.weekday())))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("resolving the week start of {date}"),
        })
}

/// Validates that `date` falls on the anchor weekday.
///
/// # Errors
///
/// Returns an error if `date` is any other weekday.
pub fn validate_week_start(date: Date) -> Result<(), DomainError> {
    if date.weekday() != WEEK_ANCHOR {
        return Err(DomainError::InvalidWeekStart {
            date,
            weekday: date.weekday(),
        });
    }
    Ok(())
}

/// Returns the seven dates of the week opened by `anchor`.
///
/// # Errors
///
/// Returns an error if `anchor` is not the anchor weekday or the week runs
/// past the representable date range.
pub fn week_dates(anchor: Date) -> Result<Vec<Date>, DomainError> {
    validate_week_start(anchor)?;

    let mut dates: Vec<Date> = Vec::with_capacity(DAYS_PER_WEEK);
    let mut current: Date = anchor;
    dates.push(current);
    while dates.len() < DAYS_PER_WEEK {
        current = current
            .next_day()
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("enumerating the week of {anchor}"),
            })?;
        dates.push(current);
    }
    Ok(dates)
}

/// Returns the ISO week number and ISO year of a week anchor.
///
/// Weekly rows are tagged with this pair.
///
/// # Errors
///
/// Returns an error if `anchor` is not the anchor weekday.
pub fn week_number(anchor: Date) -> Result<(u8, i32), DomainError> {
    validate_week_start(anchor)?;
    let (iso_year, week, _) = anchor.to_iso_week_date();
    Ok((week, iso_year))
}

/// Returns every date of a calendar month in ascending order.
///
/// # Errors
///
/// Returns an error if the year is outside the supported range.
pub fn month_dates(month: Month, year: i32) -> Result<Vec<Date>, DomainError> {
    validate_year(year)?;

    let first: Date = Date::from_calendar_date(year, month, 1).map_err(|e| {
        DomainError::DateArithmeticOverflow {
            operation: format!("building the first day of {year}-{month}: {e}"),
        }
    })?;

    let mut dates: Vec<Date> = vec![first];
    let mut current: Date = first;
    while let Some(next) = current.next_day() {
        if next.month() != month {
            break;
        }
        dates.push(next);
        current = next;
    }
    Ok(dates)
}

/// Counts the Fridays of a calendar month.
///
/// # Errors
///
/// Returns an error if the year is outside the supported range.
pub fn count_fridays(month: Month, year: i32) -> Result<usize, DomainError> {
    Ok(month_dates(month, year)?
        .into_iter()
        .filter(|date| date.weekday() == Weekday::Friday)
        .count())
}

/// Converts a 1-based month number to a [`Month`].
///
/// # Errors
///
/// Returns an error if `month` is outside 1..=12.
pub fn month_from_number(month: u8) -> Result<Month, DomainError> {
    Month::try_from(month).map_err(|_| DomainError::InvalidMonth(month))
}

/// Validates that a year is within the supported range.
///
/// # Errors
///
/// Returns an error if the year is outside 2000..=2200.
pub const fn validate_year(year: i32) -> Result<(), DomainError> {
    if year < MIN_YEAR || year > MAX_YEAR {
        return Err(DomainError::InvalidYear(year));
    }
    Ok(())
}

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns an error if the string is not a valid date.
pub fn parse_date(date_string: &str) -> Result<Date, DomainError> {
    Date::parse(
        date_string,
        time::macros::format_description!("[year]-[month]-[day]"),
    )
    .map_err(|e| DomainError::DateParseError {
        date_string: date_string.to_string(),
        error: e.to_string(),
    })
}

/// Parses a weekday name (case-insensitive, full English name).
///
/// # Errors
///
/// Returns an error if the name is not a weekday.
pub fn parse_weekday(name: &str) -> Result<Weekday, DomainError> {
    match name.trim().to_lowercase().as_str() {
        "monday" => Ok(Weekday::Monday),
        "tuesday" => Ok(Weekday::Tuesday),
        "wednesday" => Ok(Weekday::Wednesday),
        "thursday" => Ok(Weekday::Thursday),
        "friday" => Ok(Weekday::Friday),
        "saturday" => Ok(Weekday::Saturday),
        "sunday" => Ok(Weekday::Sunday),
        _ => Err(DomainError::InvalidWeekday(name.to_string())),
    }
}

/// Parses a comma-separated list of weekday names.
///
/// An empty string yields an empty list.
///
/// # Errors
///
/// Returns an error if any entry is not a weekday.
pub fn parse_weekday_list(list: &str) -> Result<Vec<Weekday>, DomainError> {
    let mut days: Vec<Weekday> = Vec::new();
    for entry in list.split(',').filter(|entry| !entry.trim().is_empty()) {
        let day: Weekday = parse_weekday(entry)?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}
