// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Availability mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use duty_roster_domain::DutyType;
use time::Date;

use crate::data_models::{flag, now_timestamp, storage_date};
use crate::diesel_schema::availability;
use crate::error::PersistenceError;

/// Records an availability declaration, replacing any earlier one for the
/// same `(person, date, duty)`.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_availability(
    conn: &mut SqliteConnection,
    person_id: i64,
    date: Date,
    duty_type: DutyType,
    is_available: bool,
    reason: Option<&str>,
) -> Result<(), PersistenceError> {
    let updated_at: String = now_timestamp()?;

    diesel::insert_into(availability::table)
        .values((
            availability::person_id.eq(person_id),
            availability::duty_date.eq(storage_date(date)),
            availability::duty_type.eq(duty_type.as_str()),
            availability::is_available.eq(flag(is_available)),
            availability::reason.eq(reason),
            availability::updated_at.eq(&updated_at),
        ))
        .on_conflict((
            availability::person_id,
            availability::duty_date,
            availability::duty_type,
        ))
        .do_update()
        .set((
            availability::is_available.eq(flag(is_available)),
            availability::reason.eq(reason),
            availability::updated_at.eq(&updated_at),
        ))
        .execute(conn)?;

    Ok(())
}
