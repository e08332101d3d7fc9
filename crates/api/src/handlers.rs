// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Each mutating handler checks the actor's role, translates the request
//! into domain values, and hands the work to persistence, which plans and
//! stores the change together with its audit event in one transaction.

use std::collections::BTreeMap;
use std::str::FromStr;

use duty_roster::{
    AssignmentValue, BatchOutcome, Command, RawOverrideItem, SlotAssignment, TransitionResult,
    VACANT, apply,
};
use duty_roster_audit::{Actor, AuditEvent, Cause};
use duty_roster_domain::{
    DateRange, DutyRole, DutyType, Person, RosterGrid, SpecialDutyCalendar, month_from_number,
    parse_date, week_dates, week_number, week_start,
};
use duty_roster_persistence::{
    AppliedBatch, AppliedOverride, GeneratedMonth, GeneratedWeek, MonthlyDutyRecord,
    PersistTransitionResult, Persistence, ReplicatedMonth, WeeklySlotRecord,
};
use time::{Date, Month};
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AssigneeInfo, AuditEventInfo, AuditTimelineQuery, AuditTimelineResponse, DateRangeQuery,
    DeclareAvailabilityRequest, FailedOverrideInfo, GenerateMonthResponse, GenerateWeekRequest,
    GenerateWeekResponse, ListMonthlyDutiesResponse, ListPersonnelResponse,
    ListWeeklySlotsResponse, MonthRequest, MonthlyDutyInfo, OverrideBatchRequest,
    OverrideBatchResponse, OverrideItemRequest, OverrideRequest, OverrideResponse, PersonInfo,
    PersonnelChangeResponse, RegisterPersonRequest, RegisterPersonResponse,
    ReplicateFirstWeekResponse, ResolveWeekQuery, ResolveWeekResponse, SetPersonActiveRequest,
    WeeklySlotInfo,
};

/// Parses a `YYYY-MM-DD` request field, naming the field on failure.
fn parse_request_date(field: &str, value: &str) -> Result<Date, ApiError> {
    parse_date(value.trim()).map_err(|err| ApiError::ValidationError {
        field: field.to_string(),
        message: err.to_string(),
    })
}

fn parse_range(query: &DateRangeQuery) -> Result<DateRange, ApiError> {
    let start: Date = parse_request_date("start", &query.start)?;
    let end: Date = parse_request_date("end", &query.end)?;
    DateRange::new(start, end).map_err(translate_domain_error)
}

fn parse_grid(value: &str) -> Result<RosterGrid, ApiError> {
    RosterGrid::from_str(value.trim()).map_err(translate_domain_error)
}

/// Converts one wire override into the scheduler's unvalidated form.
///
/// `null` stays absent so that the scheduler can reject it together with the
/// rest of the batch; values that are neither a person id nor the vacancy
/// literal are rejected here.
fn to_raw_item(index: usize, item: OverrideItemRequest) -> Result<RawOverrideItem, ApiError> {
    let assignment: Option<Vec<(String, Option<AssignmentValue>)>> = match item.assignment {
        None => None,
        Some(map) => {
            let mut entries: Vec<(String, Option<AssignmentValue>)> =
                Vec::with_capacity(map.len());
            for (role, value) in map {
                let parsed: Option<AssignmentValue> = match &value {
                    serde_json::Value::Null => None,
                    serde_json::Value::Number(number) => match number.as_i64() {
                        Some(person_id) => Some(AssignmentValue::Person(person_id)),
                        None => {
                            return Err(invalid_assignment_value(index, &role, &value));
                        }
                    },
                    serde_json::Value::String(text) if text == VACANT => {
                        Some(AssignmentValue::Vacant)
                    }
                    _ => return Err(invalid_assignment_value(index, &role, &value)),
                };
                entries.push((role, parsed));
            }
            Some(entries)
        }
    };

    Ok(RawOverrideItem {
        slot_id: item.slot_id,
        assignment,
    })
}

fn invalid_assignment_value(index: usize, role: &str, value: &serde_json::Value) -> ApiError {
    ApiError::ValidationError {
        field: format!("items[{index}].assignment.{role}"),
        message: format!("expected a person id or \"{VACANT}\", got {value}"),
    }
}

fn role_map(assignment: &SlotAssignment) -> BTreeMap<String, Option<i64>> {
    assignment
        .roles
        .iter()
        .map(|(role, person_id)| (role.as_str().to_string(), *person_id))
        .collect()
}

fn display_names(persistence: &mut Persistence) -> Result<BTreeMap<i64, String>, ApiError> {
    let people: Vec<Person> = persistence
        .list_personnel()
        .map_err(translate_persistence_error)?;
    Ok(people
        .into_iter()
        .map(|person| (person.person_id, person.display_name))
        .collect())
}

fn assignee(names: &BTreeMap<i64, String>, person_id: Option<i64>) -> Option<AssigneeInfo> {
    person_id.map(|person_id| AssigneeInfo {
        person_id,
        display_name: names.get(&person_id).cloned().unwrap_or_default(),
    })
}

fn role_names(roles: impl IntoIterator<Item = DutyRole>) -> Vec<String> {
    roles
        .into_iter()
        .map(|role| role.as_str().to_string())
        .collect()
}

/// Generates the weekly roster for the week opened by `week_start`.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The week to generate
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - `week_start` is not a date or not the anchor weekday
/// - The week already holds slots
/// - Personnel or availability data cannot be read
pub fn generate_week(
    persistence: &mut Persistence,
    request: &GenerateWeekRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<GenerateWeekResponse, ApiError> {
    AuthorizationService::authorize_generate(authenticated_actor)?;

    let anchor: Date = parse_request_date("week_start", &request.week_start)?;
    let (week, week_year) = week_number(anchor).map_err(translate_domain_error)?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let generated: GeneratedWeek = persistence
        .generate_week(anchor, actor, cause)
        .map_err(translate_persistence_error)?;

    let count: usize = generated.generation.slots.len();
    let vacancy_count: usize = generated.generation.vacancy_count();
    info!(
        week_start = %anchor,
        count,
        vacancy_count,
        event_id = generated.event_id,
        "Generated weekly roster"
    );

    Ok(GenerateWeekResponse {
        week_start: anchor.to_string(),
        week_number: week,
        week_year,
        count,
        vacancy_count,
        event_id: generated.event_id,
        message: format!(
            "Generated {count} slots for the week of {anchor} ({vacancy_count} vacant roles)"
        ),
    })
}

/// Generates the monthly roster: prayer slots for every date plus the
/// special duties `calendar` places on each weekday.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The month or year is out of range
/// - The month already holds rows
/// - Personnel or availability data cannot be read
pub fn generate_month(
    persistence: &mut Persistence,
    calendar: &SpecialDutyCalendar,
    request: MonthRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<GenerateMonthResponse, ApiError> {
    AuthorizationService::authorize_generate(authenticated_actor)?;

    let month: Month = month_from_number(request.month).map_err(translate_domain_error)?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let generated: GeneratedMonth = persistence
        .generate_month(month, request.year, calendar, actor, cause)
        .map_err(translate_persistence_error)?;

    let counts_by_duty_type: BTreeMap<String, usize> = generated
        .generation
        .counts
        .iter()
        .map(|(duty_type, count)| (duty_type.to_string(), *count))
        .collect();
    let slot_count: usize = generated.generation.slot_count();
    let vacancy_count: usize = generated.generation.vacancy_count();
    info!(
        month = request.month,
        year = request.year,
        slot_count,
        vacancy_count,
        event_id = generated.event_id,
        "Generated monthly roster"
    );

    Ok(GenerateMonthResponse {
        month: request.month,
        year: request.year,
        counts_by_duty_type,
        slot_count,
        vacancy_count,
        event_id: generated.event_id,
        message: format!(
            "Generated {slot_count} slots for {}-{:02} ({vacancy_count} vacant roles)",
            request.year, request.month
        ),
    })
}

/// Copies days 1-7 of a month onto every later date with the same weekday.
///
/// Rows already stored on day 8 onwards are replaced, overrides included;
/// the response reports how many were removed.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The month or year is out of range
/// - Days 1-7 hold no rows
pub fn replicate_first_week(
    persistence: &mut Persistence,
    request: MonthRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ReplicateFirstWeekResponse, ApiError> {
    AuthorizationService::authorize_generate(authenticated_actor)?;

    let month: Month = month_from_number(request.month).map_err(translate_domain_error)?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let replicated: ReplicatedMonth = persistence
        .replicate_first_week(month, request.year, actor, cause)
        .map_err(translate_persistence_error)?;

    let copied_count: usize = replicated.plan.copied_count();
    let deleted_count: usize = replicated.plan.replaced_count;
    let vacated_count: usize = replicated.plan.vacated_count;
    if deleted_count > 0 {
        warn!(
            month = request.month,
            year = request.year,
            deleted_count,
            "Replication replaced existing rows after the first week"
        );
    }
    info!(
        month = request.month,
        year = request.year,
        copied_count,
        vacated_count,
        event_id = replicated.event_id,
        "Replicated first week"
    );

    Ok(ReplicateFirstWeekResponse {
        month: request.month,
        year: request.year,
        copied_count,
        deleted_count,
        vacated_count,
        event_id: replicated.event_id,
        message: format!(
            "Copied {copied_count} slots from the first week of {}-{:02}; replaced {deleted_count} rows",
            request.year, request.month
        ),
    })
}

/// Reassigns the roles of one stored slot.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The grid name, slot id, or assignment is malformed
/// - The slot does not exist
/// - A role is not carried by the slot or the person cannot fill it
pub fn apply_override(
    persistence: &mut Persistence,
    request: OverrideRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<OverrideResponse, ApiError> {
    AuthorizationService::authorize_override(authenticated_actor)?;

    let grid: RosterGrid = parse_grid(&request.grid)?;
    let raw: RawOverrideItem = to_raw_item(0, request.item)?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let applied: AppliedOverride = persistence
        .apply_override(grid, raw, actor, cause)
        .map_err(translate_persistence_error)?;

    info!(
        grid = %grid,
        slot_id = applied.slot_id,
        event_id = applied.event_id,
        "Applied override"
    );

    Ok(OverrideResponse {
        slot_id: applied.slot_id,
        duty_type: applied.after.duty_type.to_string(),
        before: role_map(&applied.before),
        after: role_map(&applied.after),
        event_id: applied.event_id,
        message: format!("Updated {grid} slot {}", applied.slot_id),
    })
}

/// Applies several overrides to one grid.
///
/// The whole batch is validated before anything is written. Items that
/// cannot be applied are reported in the response; the rest are committed.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The grid name is unknown or any item is malformed
/// - Storage aborts the batch
pub fn apply_override_batch(
    persistence: &mut Persistence,
    request: OverrideBatchRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<OverrideBatchResponse, ApiError> {
    AuthorizationService::authorize_override(authenticated_actor)?;

    let grid: RosterGrid = parse_grid(&request.grid)?;
    let raws: Vec<RawOverrideItem> = request
        .items
        .into_iter()
        .enumerate()
        .map(|(index, item)| to_raw_item(index, item))
        .collect::<Result<_, _>>()?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let applied: AppliedBatch = persistence
        .apply_override_batch(grid, raws, actor, cause)
        .map_err(translate_persistence_error)?;

    let outcome: BatchOutcome = applied.outcome;
    let failed_ids: Vec<i64> = outcome.failed_ids();
    for (slot_id, rejection) in &outcome.failures {
        warn!(grid = %grid, slot_id, reason = %rejection, "Override not applied");
    }
    info!(
        grid = %grid,
        success_count = outcome.success_count,
        total_count = outcome.total_count,
        event_id = applied.event_id,
        "Applied override batch"
    );

    let failed_list: Vec<String> = failed_ids.iter().map(ToString::to_string).collect();
    Ok(OverrideBatchResponse {
        success_count: outcome.success_count,
        total_count: outcome.total_count,
        message: format!(
            "Applied {} of {} {grid} overrides; failed [{}]",
            outcome.success_count,
            outcome.total_count,
            failed_list.join(", ")
        ),
        failed_ids,
        failures: outcome
            .failures
            .iter()
            .map(|(slot_id, rejection)| FailedOverrideInfo {
                slot_id: *slot_id,
                reason: rejection.to_string(),
            })
            .collect(),
        event_id: applied.event_id,
    })
}

/// Lists the weekly slots in a date range, vacancies included.
///
/// # Errors
///
/// Returns an error if the range is malformed or the query fails.
pub fn list_weekly_slots(
    persistence: &mut Persistence,
    query: &DateRangeQuery,
) -> Result<ListWeeklySlotsResponse, ApiError> {
    let range: DateRange = parse_range(query)?;
    let records: Vec<WeeklySlotRecord> = persistence
        .list_weekly_slots(&range)
        .map_err(translate_persistence_error)?;
    let names: BTreeMap<i64, String> = display_names(persistence)?;

    let slots: Vec<WeeklySlotInfo> = records
        .into_iter()
        .map(|record| WeeklySlotInfo {
            slot_id: record.slot_id,
            date: record.date.to_string(),
            prayer: record.prayer.as_str().to_string(),
            prayer_leader: assignee(&names, record.prayer_leader),
            caller: assignee(&names, record.caller),
            week_number: record.week_number,
            is_generated: record.is_generated,
            updated_by: record.updated_by,
        })
        .collect();

    Ok(ListWeeklySlotsResponse { slots })
}

/// Lists the monthly rows in a date range, vacancies included.
///
/// # Errors
///
/// Returns an error if the range is malformed or the query fails.
pub fn list_monthly_duties(
    persistence: &mut Persistence,
    query: &DateRangeQuery,
) -> Result<ListMonthlyDutiesResponse, ApiError> {
    let range: DateRange = parse_range(query)?;
    let records: Vec<MonthlyDutyRecord> = persistence
        .list_monthly_duties(&range)
        .map_err(translate_persistence_error)?;
    let names: BTreeMap<i64, String> = display_names(persistence)?;

    let duties: Vec<MonthlyDutyInfo> = records
        .into_iter()
        .map(|record| MonthlyDutyInfo {
            duty_id: record.duty_id,
            date: record.date.to_string(),
            duty_type: record.duty_type.to_string(),
            role: record.role.as_str().to_string(),
            assignee: assignee(&names, record.person_id),
            is_generated: record.is_generated,
            updated_by: record.updated_by,
        })
        .collect();

    Ok(ListMonthlyDutiesResponse { duties })
}

/// Resolves the week containing a date.
///
/// # Errors
///
/// Returns an error if the date is malformed or the week runs past the
/// representable date range.
pub fn resolve_week(query: &ResolveWeekQuery) -> Result<ResolveWeekResponse, ApiError> {
    let date: Date = parse_request_date("date", &query.date)?;
    let anchor: Date = week_start(date).map_err(translate_domain_error)?;
    let dates: Vec<Date> = week_dates(anchor).map_err(translate_domain_error)?;
    let week_end: Date = dates.last().copied().unwrap_or(anchor);

    Ok(ResolveWeekResponse {
        week_start: anchor.to_string(),
        week_end: week_end.to_string(),
        dates: dates.iter().map(ToString::to_string).collect(),
    })
}

/// Adds a person to the directory.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The name is blank or too long, or no valid role is given
pub fn register_person(
    persistence: &mut Persistence,
    request: RegisterPersonRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<RegisterPersonResponse, ApiError> {
    AuthorizationService::authorize_manage_personnel(authenticated_actor)?;

    let roles: Vec<DutyRole> = request
        .roles
        .iter()
        .map(|role| DutyRole::from_str(role.trim()))
        .collect::<Result<_, _>>()
        .map_err(translate_domain_error)?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let command: Command = Command::RegisterPerson {
        display_name: request.display_name,
        roles,
    };
    let transition: TransitionResult =
        apply(command, actor, cause).map_err(translate_core_error)?;

    let Command::RegisterPerson {
        display_name,
        roles,
    } = transition.command.clone()
    else {
        return Err(ApiError::Internal {
            message: String::from("Registration produced an unexpected command"),
        });
    };

    let persisted: PersistTransitionResult = persistence
        .persist_transition(&transition)
        .map_err(translate_persistence_error)?;

    info!(
        person_id = persisted.person_id,
        event_id = persisted.event_id,
        "Registered person"
    );

    Ok(RegisterPersonResponse {
        person_id: persisted.person_id,
        message: format!("Registered '{display_name}' as person {}", persisted.person_id),
        display_name,
        roles: role_names(roles),
        event_id: persisted.event_id,
    })
}

/// Records whether a person can serve a duty on a date.
///
/// A later declaration for the same person, date, and duty replaces the
/// earlier one.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The date, duty type, or reason is invalid
/// - The person does not exist
pub fn declare_availability(
    persistence: &mut Persistence,
    request: DeclareAvailabilityRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<PersonnelChangeResponse, ApiError> {
    AuthorizationService::authorize_manage_personnel(authenticated_actor)?;

    let date: Date = parse_request_date("date", &request.date)?;
    let duty_type: DutyType =
        DutyType::from_str(request.duty_type.trim()).map_err(translate_domain_error)?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let command: Command = Command::DeclareAvailability {
        person_id: request.person_id,
        date,
        duty_type,
        is_available: request.is_available,
        reason: request.reason,
    };
    let transition: TransitionResult =
        apply(command, actor, cause).map_err(translate_core_error)?;
    let persisted: PersistTransitionResult = persistence
        .persist_transition(&transition)
        .map_err(translate_persistence_error)?;

    info!(
        person_id = persisted.person_id,
        date = %date,
        duty_type = %duty_type,
        is_available = request.is_available,
        "Recorded availability"
    );

    Ok(PersonnelChangeResponse {
        person_id: persisted.person_id,
        event_id: persisted.event_id,
        message: format!(
            "Person {} marked {} for {duty_type} on {date}",
            persisted.person_id,
            if request.is_available {
                "available"
            } else {
                "unavailable"
            }
        ),
    })
}

/// Marks a person active or inactive.
///
/// Inactive people stay in the directory and on already generated rosters,
/// but are never picked by later generation or accepted by overrides.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the person does not
/// exist.
pub fn set_person_active(
    persistence: &mut Persistence,
    request: SetPersonActiveRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<PersonnelChangeResponse, ApiError> {
    AuthorizationService::authorize_manage_personnel(authenticated_actor)?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let command: Command = Command::SetPersonActive {
        person_id: request.person_id,
        is_active: request.is_active,
    };
    let transition: TransitionResult =
        apply(command, actor, cause).map_err(translate_core_error)?;
    let persisted: PersistTransitionResult = persistence
        .persist_transition(&transition)
        .map_err(translate_persistence_error)?;

    info!(
        person_id = persisted.person_id,
        is_active = request.is_active,
        "Updated person status"
    );

    Ok(PersonnelChangeResponse {
        person_id: persisted.person_id,
        event_id: persisted.event_id,
        message: format!(
            "Person {} marked {}",
            persisted.person_id,
            if request.is_active { "active" } else { "inactive" }
        ),
    })
}

/// Lists every person in the directory.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_personnel(persistence: &mut Persistence) -> Result<ListPersonnelResponse, ApiError> {
    let people: Vec<Person> = persistence
        .list_personnel()
        .map_err(translate_persistence_error)?;

    Ok(ListPersonnelResponse {
        personnel: people
            .into_iter()
            .map(|person| PersonInfo {
                person_id: person.person_id,
                display_name: person.display_name,
                roles: role_names(person.roles),
                is_active: person.is_active,
            })
            .collect(),
    })
}

/// Lists recorded audit events in recording order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_audit_timeline(
    persistence: &mut Persistence,
    query: &AuditTimelineQuery,
) -> Result<AuditTimelineResponse, ApiError> {
    let events: Vec<AuditEvent> = persistence
        .get_audit_timeline(query.scope.as_deref(), query.after)
        .map_err(translate_persistence_error)?;

    let events: Vec<AuditEventInfo> = events
        .into_iter()
        .map(|event| {
            let event_id: i64 = event.event_id.ok_or_else(|| ApiError::Internal {
                message: String::from("Stored audit event has no identifier"),
            })?;
            Ok(AuditEventInfo {
                event_id,
                actor_id: event.actor.id,
                actor_type: event.actor.actor_type,
                cause: event.cause.description,
                action: event.action.name,
                details: event.action.details,
                before: event.before.data,
                after: event.after.data,
                scope: event.scope,
            })
        })
        .collect::<Result<_, ApiError>>()?;

    Ok(AuditTimelineResponse { events })
}
