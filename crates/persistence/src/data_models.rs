// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use duty_roster_domain::{DutyRole, DutyType, Prayer, parse_date};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

use crate::diesel_schema::{availability, monthly_duties, weekly_duty_slots};
use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// A stored weekly slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySlotRecord {
    pub slot_id: i64,
    pub date: Date,
    pub prayer: Prayer,
    pub prayer_leader: Option<i64>,
    pub caller: Option<i64>,
    pub week_number: u8,
    pub week_year: i32,
    /// `false` once an override has touched the slot.
    pub is_generated: bool,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A stored monthly duty row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyDutyRecord {
    pub duty_id: i64,
    pub date: Date,
    pub duty_type: DutyType,
    pub role: DutyRole,
    pub person_id: Option<i64>,
    pub period_month: u8,
    pub period_year: i32,
    /// `false` once an override has touched the row.
    pub is_generated: bool,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A stored availability declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRecord {
    pub person_id: i64,
    pub date: Date,
    pub duty_type: DutyType,
    pub is_available: bool,
    pub reason: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = weekly_duty_slots)]
pub struct WeeklySlotRow {
    pub slot_id: i64,
    pub duty_date: String,
    pub prayer: String,
    pub prayer_leader_id: Option<i64>,
    pub caller_id: Option<i64>,
    pub week_number: i32,
    pub week_year: i32,
    pub is_generated: i32,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<WeeklySlotRow> for WeeklySlotRecord {
    type Error = PersistenceError;

    fn try_from(row: WeeklySlotRow) -> Result<Self, Self::Error> {
        Ok(Self {
            slot_id: row.slot_id,
            date: stored_date(&row.duty_date)?,
            prayer: Prayer::from_str(&row.prayer).map_err(reconstruction)?,
            prayer_leader: row.prayer_leader_id,
            caller: row.caller_id,
            week_number: u8::try_from(row.week_number).map_err(reconstruction)?,
            week_year: row.week_year,
            is_generated: row.is_generated != 0,
            created_by: row.created_by,
            updated_by: row.updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = weekly_duty_slots)]
pub struct NewWeeklySlot {
    pub duty_date: String,
    pub prayer: String,
    pub prayer_leader_id: Option<i64>,
    pub caller_id: Option<i64>,
    pub week_number: i32,
    pub week_year: i32,
    pub is_generated: i32,
    pub created_by: String,
    pub updated_by: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = monthly_duties)]
pub struct MonthlyDutyRow {
    pub duty_id: i64,
    pub duty_date: String,
    pub duty_type: String,
    pub role: String,
    pub person_id: Option<i64>,
    pub period_month: i32,
    pub period_year: i32,
    pub is_generated: i32,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<MonthlyDutyRow> for MonthlyDutyRecord {
    type Error = PersistenceError;

    fn try_from(row: MonthlyDutyRow) -> Result<Self, Self::Error> {
        Ok(Self {
            duty_id: row.duty_id,
            date: stored_date(&row.duty_date)?,
            duty_type: DutyType::from_str(&row.duty_type).map_err(reconstruction)?,
            role: DutyRole::from_str(&row.role).map_err(reconstruction)?,
            person_id: row.person_id,
            period_month: u8::try_from(row.period_month).map_err(reconstruction)?,
            period_year: row.period_year,
            is_generated: row.is_generated != 0,
            created_by: row.created_by,
            updated_by: row.updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = monthly_duties)]
pub struct NewMonthlyDuty {
    pub duty_date: String,
    pub duty_type: String,
    pub role: String,
    pub person_id: Option<i64>,
    pub period_month: i32,
    pub period_year: i32,
    pub is_generated: i32,
    pub created_by: String,
    pub updated_by: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = availability)]
pub struct AvailabilityRow {
    pub person_id: i64,
    pub duty_date: String,
    pub duty_type: String,
    pub is_available: i32,
    pub reason: Option<String>,
}

impl TryFrom<AvailabilityRow> for AvailabilityRecord {
    type Error = PersistenceError;

    fn try_from(row: AvailabilityRow) -> Result<Self, Self::Error> {
        Ok(Self {
            person_id: row.person_id,
            date: stored_date(&row.duty_date)?,
            duty_type: DutyType::from_str(&row.duty_type).map_err(reconstruction)?,
            is_available: row.is_available != 0,
            reason: row.reason,
        })
    }
}

/// Formats a date the way it is stored (`YYYY-MM-DD`).
///
/// The stored form sorts lexicographically in date order.
pub fn storage_date(date: Date) -> String {
    date.to_string()
}

/// Parses a stored `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns an error if the stored text is not a valid date.
pub fn stored_date(text: &str) -> Result<Date, PersistenceError> {
    parse_date(text).map_err(reconstruction)
}

/// Returns the current UTC time in the format of `CURRENT_TIMESTAMP`.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn now_timestamp() -> Result<String, PersistenceError> {
    OffsetDateTime::now_utc()
        .format(time::macros::format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Stores a boolean as `0`/`1`.
pub fn flag(value: bool) -> i32 {
    i32::from(value)
}

fn reconstruction<E: std::fmt::Display>(err: E) -> PersistenceError {
    PersistenceError::ReconstructionError(err.to_string())
}
