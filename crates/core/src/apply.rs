// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::TransitionResult;
use duty_roster_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use duty_roster_domain::{DutyRole, validate_display_name, validate_reason, validate_roles};

const PERSONNEL_SCOPE: &str = "personnel";
const AVAILABILITY_SCOPE: &str = "availability";

/// Validates an intake command and produces its audit event.
///
/// # Arguments
///
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if the command violates a domain rule.
pub fn apply(command: Command, actor: Actor, cause: Cause) -> Result<TransitionResult, CoreError> {
    match command {
        Command::RegisterPerson {
            display_name,
            roles,
        } => {
            validate_display_name(&display_name)?;
            validate_roles(&roles)?;

            let display_name: String = display_name.trim().to_string();
            let mut roles: Vec<DutyRole> = roles;
            roles.sort();
            roles.dedup();

            let role_names: Vec<&str> = roles.iter().map(DutyRole::as_str).collect();
            let action: Action = Action::new(
                String::from("RegisterPerson"),
                Some(format!(
                    "Registered '{display_name}' with roles [{}]",
                    role_names.join(", ")
                )),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                StateSnapshot::new(String::from("person=absent")),
                StateSnapshot::new(format!("person={display_name},roles={}", roles.len())),
                String::from(PERSONNEL_SCOPE),
            );

            Ok(TransitionResult {
                command: Command::RegisterPerson {
                    display_name,
                    roles,
                },
                audit_event,
            })
        }
        Command::DeclareAvailability {
            person_id,
            date,
            duty_type,
            is_available,
            reason,
        } => {
            let reason: Option<String> = reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty());
            if let Some(r) = &reason {
                validate_reason(r)?;
            }

            let action: Action = Action::new(
                String::from("DeclareAvailability"),
                Some(format!(
                    "Person {person_id} {} for {duty_type} on {date}",
                    if is_available {
                        "available"
                    } else {
                        "unavailable"
                    }
                )),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                StateSnapshot::new(format!("person_id={person_id}")),
                StateSnapshot::new(format!(
                    "person_id={person_id},date={date},duty={duty_type},available={is_available}"
                )),
                String::from(AVAILABILITY_SCOPE),
            );

            Ok(TransitionResult {
                command: Command::DeclareAvailability {
                    person_id,
                    date,
                    duty_type,
                    is_available,
                    reason,
                },
                audit_event,
            })
        }
        Command::SetPersonActive {
            person_id,
            is_active,
        } => {
            let action: Action = Action::new(
                String::from("SetPersonActive"),
                Some(format!(
                    "Person {person_id} marked {}",
                    if is_active { "active" } else { "inactive" }
                )),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                StateSnapshot::new(format!("person_id={person_id}")),
                StateSnapshot::new(format!("person_id={person_id},active={is_active}")),
                String::from(PERSONNEL_SCOPE),
            );

            Ok(TransitionResult {
                command: Command::SetPersonActive {
                    person_id,
                    is_active,
                },
                audit_event,
            })
        }
    }
}
