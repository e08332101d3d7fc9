// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monthly grid mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use duty_roster_domain::{DateRange, MonthlyDutyPlan};
use time::Month;

use crate::data_models::{NewMonthlyDuty, flag, now_timestamp, storage_date};
use crate::diesel_schema::monthly_duties;
use crate::error::PersistenceError;
use crate::mutations::chunked::insert_in_chunks;

/// Inserts planned monthly rows tagged with their period.
///
/// # Errors
///
/// Returns an error if any chunk fails to insert.
pub fn insert_monthly_duties(
    conn: &mut SqliteConnection,
    rows: &[MonthlyDutyPlan],
    month: Month,
    year: i32,
    written_by: &str,
) -> Result<usize, PersistenceError> {
    let rows: Vec<NewMonthlyDuty> = rows
        .iter()
        .map(|row| NewMonthlyDuty {
            duty_date: storage_date(row.date),
            duty_type: row.duty_type.as_str().to_string(),
            role: row.role.as_str().to_string(),
            person_id: row.person_id,
            period_month: i32::from(u8::from(month)),
            period_year: year,
            is_generated: flag(true),
            created_by: written_by.to_string(),
            updated_by: written_by.to_string(),
        })
        .collect();

    insert_in_chunks(&rows, |chunk| {
        Ok(diesel::insert_into(monthly_duties::table)
            .values(chunk)
            .execute(conn)?)
    })
}

/// Deletes every monthly row dated within `range`.
///
/// # Returns
///
/// The number of rows deleted.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_monthly_duties(
    conn: &mut SqliteConnection,
    range: &DateRange,
) -> Result<usize, PersistenceError> {
    Ok(diesel::delete(
        monthly_duties::table
            .filter(monthly_duties::duty_date.ge(storage_date(range.start())))
            .filter(monthly_duties::duty_date.le(storage_date(range.end()))),
    )
    .execute(conn)?)
}

/// Rewrites the person on a monthly row and marks it manually edited.
///
/// # Errors
///
/// Returns an error if the row does not exist or the update fails.
pub fn update_monthly_assignment(
    conn: &mut SqliteConnection,
    duty_id: i64,
    person_id: Option<i64>,
    written_by: &str,
) -> Result<(), PersistenceError> {
    let updated: usize =
        diesel::update(monthly_duties::table.filter(monthly_duties::duty_id.eq(duty_id)))
            .set((
                monthly_duties::person_id.eq(person_id),
                monthly_duties::is_generated.eq(flag(false)),
                monthly_duties::updated_by.eq(written_by),
                monthly_duties::updated_at.eq(now_timestamp()?),
            ))
            .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("monthly duty {duty_id}")));
    }
    Ok(())
}
