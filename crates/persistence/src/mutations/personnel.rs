// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Personnel directory mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use duty_roster_domain::DutyRole;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::flag;
use crate::diesel_schema::{personnel, personnel_roles};
use crate::error::PersistenceError;

/// Inserts a person together with their roles.
///
/// # Returns
///
/// The person ID assigned by the database.
///
/// # Errors
///
/// Returns an error if either insert fails.
pub fn insert_person(
    conn: &mut SqliteConnection,
    display_name: &str,
    roles: &[DutyRole],
) -> Result<i64, PersistenceError> {
    diesel::insert_into(personnel::table)
        .values((
            personnel::display_name.eq(display_name),
            personnel::is_active.eq(flag(true)),
        ))
        .execute(conn)?;
    let person_id: i64 = conn.get_last_insert_rowid()?;

    let role_rows: Vec<_> = roles
        .iter()
        .map(|role| {
            (
                personnel_roles::person_id.eq(person_id),
                personnel_roles::role.eq(role.as_str()),
            )
        })
        .collect();
    diesel::insert_into(personnel_roles::table)
        .values(&role_rows)
        .execute(conn)?;

    debug!(person_id, roles = roles.len(), "Inserted person");
    Ok(person_id)
}

/// Sets a person's active flag.
///
/// # Errors
///
/// Returns an error if the person does not exist or the update fails.
pub fn set_person_active(
    conn: &mut SqliteConnection,
    person_id: i64,
    is_active: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(personnel::table.filter(personnel::person_id.eq(person_id)))
        .set(personnel::is_active.eq(flag(is_active)))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::PersonNotFound(person_id));
    }
    debug!(person_id, is_active, "Updated person active flag");
    Ok(())
}
