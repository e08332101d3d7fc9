// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only collaborators consulted while planning a roster.
//!
//! The generators never touch storage directly. They ask a
//! [`PersonnelDirectory`] who may fill a role and an [`AvailabilityGateway`]
//! whether that person can serve on a given date. Lookup failures surface as
//! [`GatewayError`] and are never read as "available".

use duty_roster_domain::{DutyRole, DutyType, Person};
use time::Date;

/// A failed directory or availability lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    /// Description of the failure.
    pub detail: String,
}

impl GatewayError {
    /// Creates a new gateway error.
    #[must_use]
    pub const fn new(detail: String) -> Self {
        Self { detail }
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.detail)
    }
}

impl std::error::Error for GatewayError {}

/// Read access to the personnel directory.
pub trait PersonnelDirectory {
    /// Lists active people holding `role`, ordered by person id.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn list_eligible(&mut self, role: DutyRole) -> Result<Vec<Person>, GatewayError>;

    /// Looks up a single person, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn find_person(&mut self, person_id: i64) -> Result<Option<Person>, GatewayError>;

    /// Returns whether `person_id` exists and is active.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn is_active(&mut self, person_id: i64) -> Result<bool, GatewayError> {
        Ok(self
            .find_person(person_id)?
            .is_some_and(|person| person.is_active))
    }
}

/// Read access to declared availability.
pub trait AvailabilityGateway {
    /// Returns whether `person_id` may serve `duty_type` on `date`.
    ///
    /// A person without a matching declaration is available.
    ///
    /// # Errors
    ///
    /// Returns an error if availability cannot be read.
    fn is_available(
        &mut self,
        person_id: i64,
        date: Date,
        duty_type: DutyType,
    ) -> Result<bool, GatewayError>;
}
