// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use duty_roster_domain::{DutyRole, DutyType};
use time::Date;

/// Intake commands that feed the scheduler's inputs.
///
/// Commands are data only; [`crate::apply`] validates them and produces the
/// audit event that accompanies the stored change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a person to the directory.
    RegisterPerson {
        /// The roster display name.
        display_name: String,
        /// The duty capabilities held.
        roles: Vec<DutyRole>,
    },
    /// Record whether a person can serve a duty on a date.
    ///
    /// A later declaration for the same `(person, date, duty)` replaces the
    /// earlier one.
    DeclareAvailability {
        /// The person the declaration is about.
        person_id: i64,
        /// The date concerned.
        date: Date,
        /// The duty concerned.
        duty_type: DutyType,
        /// Whether the person can serve.
        is_available: bool,
        /// Optional free-text reason.
        reason: Option<String>,
    },
    /// Mark a person active or inactive.
    SetPersonActive {
        /// The person to update.
        person_id: i64,
        /// The new active flag.
        is_active: bool,
    },
}
