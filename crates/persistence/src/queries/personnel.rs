// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Personnel directory queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use duty_roster_domain::{DutyRole, Person};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::diesel_schema::{personnel, personnel_roles};
use crate::error::PersistenceError;

type PersonRow = (i64, String, i32);

/// Lists every person in the directory, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a stored role is unknown.
pub fn list_personnel(conn: &mut SqliteConnection) -> Result<Vec<Person>, PersistenceError> {
    let rows: Vec<PersonRow> = personnel::table
        .select((
            personnel::person_id,
            personnel::display_name,
            personnel::is_active,
        ))
        .order(personnel::person_id.asc())
        .load::<PersonRow>(conn)?;

    attach_roles(conn, rows)
}

/// Looks up a single person.
///
/// # Errors
///
/// Returns an error if the query fails or a stored role is unknown.
pub fn find_person(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<Option<Person>, PersistenceError> {
    let row: Option<PersonRow> = personnel::table
        .filter(personnel::person_id.eq(person_id))
        .select((
            personnel::person_id,
            personnel::display_name,
            personnel::is_active,
        ))
        .first::<PersonRow>(conn)
        .optional()?;

    match row {
        Some(row) => Ok(attach_roles(conn, vec![row])?.into_iter().next()),
        None => Ok(None),
    }
}

/// Lists active people holding `role`, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a stored role is unknown.
pub fn list_eligible(
    conn: &mut SqliteConnection,
    role: DutyRole,
) -> Result<Vec<Person>, PersistenceError> {
    let rows: Vec<PersonRow> = personnel::table
        .inner_join(personnel_roles::table)
        .filter(personnel_roles::role.eq(role.as_str()))
        .filter(personnel::is_active.eq(1))
        .select((
            personnel::person_id,
            personnel::display_name,
            personnel::is_active,
        ))
        .order(personnel::person_id.asc())
        .load::<PersonRow>(conn)?;

    attach_roles(conn, rows)
}

fn attach_roles(
    conn: &mut SqliteConnection,
    rows: Vec<PersonRow>,
) -> Result<Vec<Person>, PersistenceError> {
    let ids: Vec<i64> = rows.iter().map(|(id, _, _)| *id).collect();
    let role_rows: Vec<(i64, String)> = personnel_roles::table
        .filter(personnel_roles::person_id.eq_any(&ids))
        .select((personnel_roles::person_id, personnel_roles::role))
        .load::<(i64, String)>(conn)?;

    let mut roles: BTreeMap<i64, BTreeSet<DutyRole>> = BTreeMap::new();
    for (person_id, role) in role_rows {
        let role: DutyRole = DutyRole::from_str(&role)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        roles.entry(person_id).or_default().insert(role);
    }

    Ok(rows
        .into_iter()
        .map(|(person_id, display_name, is_active)| Person {
            person_id,
            display_name,
            roles: roles.remove(&person_id).unwrap_or_default(),
            is_active: is_active != 0,
        })
        .collect())
}
