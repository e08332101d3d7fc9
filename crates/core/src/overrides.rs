// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Manual slot overrides.
//!
//! Overrides bypass generation: an administrator names a stored slot and the
//! roles to reassign. A batch is validated as a whole before anything is
//! written; once validation passes, each item is resolved on its own and an
//! item that cannot be applied is reported without stopping the others.

use crate::error::CoreError;
use crate::gateway::PersonnelDirectory;
use duty_roster_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use duty_roster_domain::{DutyRole, DutyType, RosterGrid};
use std::collections::BTreeMap;
use std::str::FromStr;

/// The literal that clears a role.
pub const VACANT: &str = "vacant";

/// The new value for one role of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentValue {
    /// Assign this person.
    Person(i64),
    /// Leave the role empty.
    Vacant,
}

impl AssignmentValue {
    /// The assigned person, `None` for a vacancy.
    #[must_use]
    pub const fn person_id(&self) -> Option<i64> {
        match self {
            Self::Person(id) => Some(*id),
            Self::Vacant => None,
        }
    }
}

impl std::fmt::Display for AssignmentValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Person(id) => write!(f, "{id}"),
            Self::Vacant => write!(f, "{VACANT}"),
        }
    }
}

/// An override item as received, before validation.
///
/// Role keys are raw strings and values may be absent (`null`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOverrideItem {
    /// The slot row to change.
    pub slot_id: Option<i64>,
    /// Role name to new value.
    pub assignment: Option<Vec<(String, Option<AssignmentValue>)>>,
}

/// A validated override item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideItem {
    /// The slot row to change.
    pub slot_id: i64,
    /// The roles to change; never empty.
    pub assignment: BTreeMap<DutyRole, AssignmentValue>,
}

/// The stored assignment of one slot row.
///
/// Weekly rows carry both prayer roles; monthly rows carry exactly the one
/// role they were created for, and the other roles of the same
/// `(date, duty type)` live on sibling rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    /// The duty the slot staffs.
    pub duty_type: DutyType,
    /// The roles this row carries and who fills them.
    pub roles: BTreeMap<DutyRole, Option<i64>>,
    /// Roles of the same slot held on other rows. Read-only here; they only
    /// take part in the one-person-one-role check.
    pub sibling_roles: BTreeMap<DutyRole, Option<i64>>,
}

impl SlotAssignment {
    /// A row that carries every role of its slot.
    #[must_use]
    pub const fn new(duty_type: DutyType, roles: BTreeMap<DutyRole, Option<i64>>) -> Self {
        Self {
            duty_type,
            roles,
            sibling_roles: BTreeMap::new(),
        }
    }

    /// Adds the roles of the same slot stored on other rows.
    #[must_use]
    pub fn with_siblings(mut self, sibling_roles: BTreeMap<DutyRole, Option<i64>>) -> Self {
        self.sibling_roles = sibling_roles;
        self
    }
}

/// Why a single override item was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideRejection {
    /// No slot with this id exists in the addressed grid.
    SlotNotFound {
        /// The missing slot id.
        slot_id: i64,
    },
    /// The slot does not carry the role.
    RoleNotApplicable {
        /// The slot's duty type.
        duty_type: DutyType,
        /// The requested role.
        role: DutyRole,
    },
    /// The person does not exist.
    UnknownPerson {
        /// The unknown person id.
        person_id: i64,
    },
    /// The person is inactive or lacks the capability.
    IneligiblePerson {
        /// The person id.
        person_id: i64,
        /// The role they cannot fill.
        role: DutyRole,
    },
    /// The change would put one person in two roles of the same slot.
    SamePersonInBothRoles {
        /// The person id.
        person_id: i64,
    },
    /// Storage refused the write for this item.
    StorageConflict {
        /// The storage error message.
        detail: String,
    },
}

impl std::fmt::Display for OverrideRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SlotNotFound { slot_id } => write!(f, "Slot {slot_id} not found"),
            Self::RoleNotApplicable { duty_type, role } => {
                write!(f, "Role '{role}' is not staffed on duty '{duty_type}'")
            }
            Self::UnknownPerson { person_id } => write!(f, "Person {person_id} does not exist"),
            Self::IneligiblePerson { person_id, role } => {
                write!(f, "Person {person_id} is not eligible for role '{role}'")
            }
            Self::SamePersonInBothRoles { person_id } => {
                write!(f, "Person {person_id} cannot fill two roles of the same slot")
            }
            Self::StorageConflict { detail } => write!(f, "Storage conflict: {detail}"),
        }
    }
}

/// The outcome of a batch override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Items applied.
    pub success_count: usize,
    /// Items submitted.
    pub total_count: usize,
    /// Items not applied, in submission order.
    pub failures: Vec<(i64, OverrideRejection)>,
}

impl BatchOutcome {
    /// The slot ids of the failed items.
    #[must_use]
    pub fn failed_ids(&self) -> Vec<i64> {
        self.failures.iter().map(|(slot_id, _)| *slot_id).collect()
    }
}

/// Validates one override item.
///
/// # Errors
///
/// Returns an error if the slot id is missing, the assignment is absent or
/// empty, a role name is unknown or repeated, or a role maps to `null`.
pub fn validate_override_item(
    index: usize,
    raw: RawOverrideItem,
) -> Result<OverrideItem, CoreError> {
    let invalid = |reason: String| CoreError::InvalidOverride { index, reason };

    let slot_id: i64 = raw
        .slot_id
        .ok_or_else(|| invalid(String::from("missing slot id")))?;
    let entries: Vec<(String, Option<AssignmentValue>)> = raw
        .assignment
        .ok_or_else(|| invalid(format!("slot {slot_id}: missing assignment")))?;
    if entries.is_empty() {
        return Err(invalid(format!("slot {slot_id}: assignment is empty")));
    }

    let mut assignment: BTreeMap<DutyRole, AssignmentValue> = BTreeMap::new();
    for (key, value) in entries {
        let role: DutyRole = DutyRole::from_str(&key)
            .map_err(|_| invalid(format!("slot {slot_id}: unknown role '{key}'")))?;
        let value: AssignmentValue = value.ok_or_else(|| {
            invalid(format!(
                "slot {slot_id}: role '{role}' is null; use a person id or \"{VACANT}\""
            ))
        })?;
        if assignment.insert(role, value).is_some() {
            return Err(invalid(format!("slot {slot_id}: role '{role}' given twice")));
        }
    }

    Ok(OverrideItem {
        slot_id,
        assignment,
    })
}

/// Validates every item of a batch before any of them is applied.
///
/// # Errors
///
/// Returns an error if the batch is empty or any item is malformed.
pub fn validate_override_batch(
    items: Vec<RawOverrideItem>,
) -> Result<Vec<OverrideItem>, CoreError> {
    if items.is_empty() {
        return Err(CoreError::InvalidOverride {
            index: 0,
            reason: String::from("batch contains no items"),
        });
    }
    items
        .into_iter()
        .enumerate()
        .map(|(index, raw)| validate_override_item(index, raw))
        .collect()
}

/// Resolves an override against the slot's current assignment.
///
/// The outer `Result` carries lookup faults; the inner one says whether this
/// item can be applied and, if so, the slot's new assignment.
///
/// # Errors
///
/// Returns an error if the personnel directory cannot be read.
pub fn resolve_override<D>(
    current: &SlotAssignment,
    item: &OverrideItem,
    directory: &mut D,
) -> Result<Result<SlotAssignment, OverrideRejection>, CoreError>
where
    D: PersonnelDirectory,
{
    let mut updated: SlotAssignment = current.clone();

    for (&role, &value) in &item.assignment {
        let Some(slot_role) = updated.roles.get_mut(&role) else {
            return Ok(Err(OverrideRejection::RoleNotApplicable {
                duty_type: current.duty_type,
                role,
            }));
        };

        if let AssignmentValue::Person(person_id) = value {
            match directory.find_person(person_id)? {
                None => return Ok(Err(OverrideRejection::UnknownPerson { person_id })),
                Some(person) if !person.is_eligible_for(role) => {
                    return Ok(Err(OverrideRejection::IneligiblePerson { person_id, role }));
                }
                Some(_) => {}
            }
        }
        *slot_role = value.person_id();
    }

    let mut seen: Vec<i64> = Vec::new();
    for person_id in updated
        .roles
        .values()
        .chain(updated.sibling_roles.values())
        .flatten()
    {
        if seen.contains(person_id) {
            return Ok(Err(OverrideRejection::SamePersonInBothRoles {
                person_id: *person_id,
            }));
        }
        seen.push(*person_id);
    }

    Ok(Ok(updated))
}

/// Builds the audit event for a single override.
#[must_use]
pub fn override_audit_event(
    grid: RosterGrid,
    slot_id: i64,
    before: &SlotAssignment,
    after: &SlotAssignment,
    actor: Actor,
    cause: Cause,
) -> AuditEvent {
    AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("ApplyOverride"),
            Some(format!("{grid} slot {slot_id} ({})", before.duty_type)),
        ),
        StateSnapshot::new(describe_assignment(before)),
        StateSnapshot::new(describe_assignment(after)),
        format!("{grid} overrides"),
    )
}

/// Builds the audit event for a batch override.
#[must_use]
pub fn batch_audit_event(
    grid: RosterGrid,
    outcome: &BatchOutcome,
    actor: Actor,
    cause: Cause,
) -> AuditEvent {
    let failed: Vec<String> = outcome
        .failed_ids()
        .iter()
        .map(ToString::to_string)
        .collect();
    AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("ApplyOverrideBatch"),
            Some(format!(
                "Applied {} of {} {grid} overrides; failed [{}]",
                outcome.success_count,
                outcome.total_count,
                failed.join(", ")
            )),
        ),
        StateSnapshot::new(format!("items={}", outcome.total_count)),
        StateSnapshot::new(format!(
            "applied={},failed={}",
            outcome.success_count,
            outcome.failures.len()
        )),
        format!("{grid} overrides"),
    )
}

fn describe_assignment(assignment: &SlotAssignment) -> String {
    assignment
        .roles
        .iter()
        .map(|(role, person)| match person {
            Some(id) => format!("{role}={id}"),
            None => format!("{role}={VACANT}"),
        })
        .collect::<Vec<String>>()
        .join(",")
}
