// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monthly grid queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use duty_roster_domain::{DateRange, DutyType, MonthlyDutyPlan};
use time::Date;
use num_traits::ToPrimitive;

use crate::data_models::{MonthlyDutyRecord, MonthlyDutyRow, storage_date};
use crate::diesel_schema::monthly_duties;
use crate::error::PersistenceError;

/// Counts monthly rows dated within `range`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_monthly_duties(
    conn: &mut SqliteConnection,
    range: &DateRange,
) -> Result<usize, PersistenceError> {
    let count: i64 = monthly_duties::table
        .filter(monthly_duties::duty_date.ge(storage_date(range.start())))
        .filter(monthly_duties::duty_date.le(storage_date(range.end())))
        .count()
        .get_result(conn)?;

    count
        .to_usize()
        .ok_or_else(|| PersistenceError::ReconstructionError(format!("Invalid count {count}")))
}

/// Lists monthly rows dated within `range`, ordered by date, duty type,
/// then role.
///
/// Vacant roles are included as `None`.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_monthly_duties(
    conn: &mut SqliteConnection,
    range: &DateRange,
) -> Result<Vec<MonthlyDutyRecord>, PersistenceError> {
    let mut duties: Vec<MonthlyDutyRecord> = monthly_duties::table
        .filter(monthly_duties::duty_date.ge(storage_date(range.start())))
        .filter(monthly_duties::duty_date.le(storage_date(range.end())))
        .select(MonthlyDutyRow::as_select())
        .load::<MonthlyDutyRow>(conn)?
        .into_iter()
        .map(MonthlyDutyRecord::try_from)
        .collect::<Result<Vec<MonthlyDutyRecord>, PersistenceError>>()?;

    duties.sort_by_key(|duty| (duty.date, duty.duty_type, duty.role));
    Ok(duties)
}

/// Looks up a monthly row by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
pub fn find_monthly_duty(
    conn: &mut SqliteConnection,
    duty_id: i64,
) -> Result<Option<MonthlyDutyRecord>, PersistenceError> {
    monthly_duties::table
        .filter(monthly_duties::duty_id.eq(duty_id))
        .select(MonthlyDutyRow::as_select())
        .first::<MonthlyDutyRow>(conn)
        .optional()?
        .map(MonthlyDutyRecord::try_from)
        .transpose()
}

/// Lists the other role rows of the slot `(date, duty_type)`, leaving out
/// `duty_id` itself.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_slot_siblings(
    conn: &mut SqliteConnection,
    date: Date,
    duty_type: DutyType,
    duty_id: i64,
) -> Result<Vec<MonthlyDutyRecord>, PersistenceError> {
    monthly_duties::table
        .filter(monthly_duties::duty_date.eq(storage_date(date)))
        .filter(monthly_duties::duty_type.eq(duty_type.as_str()))
        .filter(monthly_duties::duty_id.ne(duty_id))
        .select(MonthlyDutyRow::as_select())
        .load::<MonthlyDutyRow>(conn)?
        .into_iter()
        .map(MonthlyDutyRecord::try_from)
        .collect()
}

/// Loads the rows dated within `range` in the shape the planner works with.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_monthly_plans(
    conn: &mut SqliteConnection,
    range: &DateRange,
) -> Result<Vec<MonthlyDutyPlan>, PersistenceError> {
    Ok(list_monthly_duties(conn, range)?
        .into_iter()
        .map(|duty| MonthlyDutyPlan {
            date: duty.date,
            duty_type: duty.duty_type,
            role: duty.role,
            person_id: duty.person_id,
        })
        .collect())
}
