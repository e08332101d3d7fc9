// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Availability queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use duty_roster_domain::{DateRange, DutyType};
use time::Date;

use crate::data_models::{AvailabilityRecord, AvailabilityRow, storage_date};
use crate::diesel_schema::availability;
use crate::error::PersistenceError;

/// Returns whether a person may serve a duty on a date.
///
/// Without a declaration the person is available.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn is_available(
    conn: &mut SqliteConnection,
    person_id: i64,
    date: Date,
    duty_type: DutyType,
) -> Result<bool, PersistenceError> {
    let declared: Option<i32> = availability::table
        .filter(availability::person_id.eq(person_id))
        .filter(availability::duty_date.eq(storage_date(date)))
        .filter(availability::duty_type.eq(duty_type.as_str()))
        .select(availability::is_available)
        .first::<i32>(conn)
        .optional()?;

    Ok(declared.is_none_or(|flag| flag != 0))
}

/// Lists declarations dated within `range`, ordered by date then person.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_availability(
    conn: &mut SqliteConnection,
    range: &DateRange,
) -> Result<Vec<AvailabilityRecord>, PersistenceError> {
    availability::table
        .filter(availability::duty_date.ge(storage_date(range.start())))
        .filter(availability::duty_date.le(storage_date(range.end())))
        .order((
            availability::duty_date.asc(),
            availability::person_id.asc(),
            availability::duty_type.asc(),
        ))
        .select(AvailabilityRow::as_select())
        .load::<AvailabilityRow>(conn)?
        .into_iter()
        .map(AvailabilityRecord::try_from)
        .collect()
}
