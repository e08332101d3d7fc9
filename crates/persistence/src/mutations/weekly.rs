// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly grid mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use duty_roster_domain::WeeklySlotPlan;

use crate::data_models::{NewWeeklySlot, flag, now_timestamp, storage_date};
use crate::diesel_schema::weekly_duty_slots;
use crate::error::PersistenceError;
use crate::mutations::chunked::insert_in_chunks;

/// Inserts planned weekly slots tagged with their ISO week.
///
/// # Errors
///
/// Returns an error if any chunk fails to insert.
pub fn insert_weekly_slots(
    conn: &mut SqliteConnection,
    slots: &[WeeklySlotPlan],
    week: (u8, i32),
    written_by: &str,
) -> Result<usize, PersistenceError> {
    let (week_number, week_year) = week;
    let rows: Vec<NewWeeklySlot> = slots
        .iter()
        .map(|slot| NewWeeklySlot {
            duty_date: storage_date(slot.date),
            prayer: slot.prayer.as_str().to_string(),
            prayer_leader_id: slot.prayer_leader,
            caller_id: slot.caller,
            week_number: i32::from(week_number),
            week_year,
            is_generated: flag(true),
            created_by: written_by.to_string(),
            updated_by: written_by.to_string(),
        })
        .collect();

    insert_in_chunks(&rows, |chunk| {
        Ok(diesel::insert_into(weekly_duty_slots::table)
            .values(chunk)
            .execute(conn)?)
    })
}

/// Rewrites both roles of a weekly slot and marks it manually edited.
///
/// # Errors
///
/// Returns an error if the slot does not exist or the update fails.
pub fn update_weekly_assignment(
    conn: &mut SqliteConnection,
    slot_id: i64,
    prayer_leader: Option<i64>,
    caller: Option<i64>,
    written_by: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        weekly_duty_slots::table.filter(weekly_duty_slots::slot_id.eq(slot_id)),
    )
    .set((
        weekly_duty_slots::prayer_leader_id.eq(prayer_leader),
        weekly_duty_slots::caller_id.eq(caller),
        weekly_duty_slots::is_generated.eq(flag(false)),
        weekly_duty_slots::updated_by.eq(written_by),
        weekly_duty_slots::updated_at.eq(now_timestamp()?),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("weekly slot {slot_id}")));
    }
    Ok(())
}
