// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly grid queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use duty_roster_domain::DateRange;
use num_traits::ToPrimitive;

use crate::data_models::{WeeklySlotRecord, WeeklySlotRow, storage_date};
use crate::diesel_schema::weekly_duty_slots;
use crate::error::PersistenceError;

/// Counts weekly slots dated within `range`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_weekly_slots(
    conn: &mut SqliteConnection,
    range: &DateRange,
) -> Result<usize, PersistenceError> {
    let count: i64 = weekly_duty_slots::table
        .filter(weekly_duty_slots::duty_date.ge(storage_date(range.start())))
        .filter(weekly_duty_slots::duty_date.le(storage_date(range.end())))
        .count()
        .get_result(conn)?;

    count
        .to_usize()
        .ok_or_else(|| PersistenceError::ReconstructionError(format!("Invalid count {count}")))
}

/// Lists weekly slots dated within `range`, in date then prayer order.
///
/// Vacant roles are included as `None`.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_weekly_slots(
    conn: &mut SqliteConnection,
    range: &DateRange,
) -> Result<Vec<WeeklySlotRecord>, PersistenceError> {
    let mut slots: Vec<WeeklySlotRecord> = weekly_duty_slots::table
        .filter(weekly_duty_slots::duty_date.ge(storage_date(range.start())))
        .filter(weekly_duty_slots::duty_date.le(storage_date(range.end())))
        .select(WeeklySlotRow::as_select())
        .load::<WeeklySlotRow>(conn)?
        .into_iter()
        .map(WeeklySlotRecord::try_from)
        .collect::<Result<Vec<WeeklySlotRecord>, PersistenceError>>()?;

    slots.sort_by_key(|slot| (slot.date, slot.prayer));
    Ok(slots)
}

/// Looks up a weekly slot by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
pub fn find_weekly_slot(
    conn: &mut SqliteConnection,
    slot_id: i64,
) -> Result<Option<WeeklySlotRecord>, PersistenceError> {
    weekly_duty_slots::table
        .filter(weekly_duty_slots::slot_id.eq(slot_id))
        .select(WeeklySlotRow::as_select())
        .first::<WeeklySlotRow>(conn)
        .optional()?
        .map(WeeklySlotRecord::try_from)
        .transpose()
}
