// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The stored directory and availability, as seen by the planners.

use diesel::SqliteConnection;
use duty_roster::{AvailabilityGateway, GatewayError, PersonnelDirectory};
use duty_roster_domain::{DutyRole, DutyType, Person};
use time::Date;

use crate::error::PersistenceError;
use crate::queries;

/// Serves planner lookups from an open connection.
///
/// The source borrows the connection of the surrounding transaction, so the
/// planner reads exactly the rows the transaction sees.
pub struct ConnectionSource<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> ConnectionSource<'c> {
    /// Wraps a connection.
    pub const fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }
}

fn unavailable(err: &PersistenceError) -> GatewayError {
    GatewayError::new(err.to_string())
}

impl PersonnelDirectory for ConnectionSource<'_> {
    fn list_eligible(&mut self, role: DutyRole) -> Result<Vec<Person>, GatewayError> {
        queries::list_eligible(self.conn, role).map_err(|e| unavailable(&e))
    }

    fn find_person(&mut self, person_id: i64) -> Result<Option<Person>, GatewayError> {
        queries::find_person(self.conn, person_id).map_err(|e| unavailable(&e))
    }
}

impl AvailabilityGateway for ConnectionSource<'_> {
    fn is_available(
        &mut self,
        person_id: i64,
        date: Date,
        duty_type: DutyType,
    ) -> Result<bool, GatewayError> {
        queries::is_available(self.conn, person_id, date, duty_type).map_err(|e| unavailable(&e))
    }
}
