// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence of intake transitions.

use diesel::{Connection, SqliteConnection};
use duty_roster::{Command, TransitionResult};
use tracing::info;

use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::mutations::availability::upsert_availability;
use crate::mutations::personnel::{insert_person, set_person_active};
use crate::queries::find_person;

/// The result of persisting a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistTransitionResult {
    /// The event ID assigned to the audit event.
    pub event_id: i64,
    /// The person the command created or touched.
    pub person_id: i64,
}

/// Persists an intake transition and its audit event.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `result` - The transition result to persist
///
/// # Errors
///
/// Returns an error if the referenced person does not exist or any write
/// fails. Nothing is stored on error.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<PersistTransitionResult, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let person_id: i64 = match &result.command {
            Command::RegisterPerson {
                display_name,
                roles,
            } => insert_person(conn, display_name, roles)?,
            Command::DeclareAvailability {
                person_id,
                date,
                duty_type,
                is_available,
                reason,
            } => {
                if find_person(conn, *person_id)?.is_none() {
                    return Err(PersistenceError::PersonNotFound(*person_id));
                }
                upsert_availability(
                    conn,
                    *person_id,
                    *date,
                    *duty_type,
                    *is_available,
                    reason.as_deref(),
                )?;
                *person_id
            }
            Command::SetPersonActive {
                person_id,
                is_active,
            } => {
                set_person_active(conn, *person_id, *is_active)?;
                *person_id
            }
        };

        let event_id: i64 = persist_audit_event(conn, &result.audit_event)?;
        info!(
            event_id,
            person_id,
            action = %result.audit_event.action.name,
            "Persisted transition"
        );

        Ok(PersistTransitionResult {
            event_id,
            person_id,
        })
    })
}
