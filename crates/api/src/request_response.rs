// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates travel as `YYYY-MM-DD` strings and enumerations as their snake-case
//! wire names, so every DTO serializes to plain JSON.

use std::collections::BTreeMap;

/// API request to generate the weekly roster opened by `week_start`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenerateWeekRequest {
    /// The anchor date opening the week (`YYYY-MM-DD`).
    pub week_start: String,
}

/// API response for a generated week.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenerateWeekResponse {
    /// The anchor date of the week.
    pub week_start: String,
    /// The ISO week number of the anchor date.
    pub week_number: u8,
    /// The ISO week-numbering year of the anchor date.
    pub week_year: i32,
    /// Number of slots created.
    pub count: usize,
    /// Number of roles left vacant.
    pub vacancy_count: usize,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API request naming a calendar month.
///
/// Used by both monthly generation and first-week replication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MonthRequest {
    /// The month number (1-12).
    pub month: u8,
    /// The year.
    pub year: i32,
}

/// API response for a generated month.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenerateMonthResponse {
    /// The month number.
    pub month: u8,
    /// The year.
    pub year: i32,
    /// Number of `(date, duty_type)` slots per duty type.
    pub counts_by_duty_type: BTreeMap<String, usize>,
    /// Total number of slots created.
    pub slot_count: usize,
    /// Number of role rows left vacant.
    pub vacancy_count: usize,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API response for a first-week replication.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReplicateFirstWeekResponse {
    /// The month number.
    pub month: u8,
    /// The year.
    pub year: i32,
    /// Number of `(date, duty_type)` slots written on days 8 onwards.
    pub copied_count: usize,
    /// Number of previously stored rows on days 8 onwards that were removed.
    pub deleted_count: usize,
    /// Copied roles left vacant because the person is unavailable on the new date.
    pub vacated_count: usize,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// One override as submitted.
///
/// Both fields are optional on the wire so that a missing value is reported
/// as a validation error rather than a decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OverrideItemRequest {
    /// The slot row to change.
    #[serde(default)]
    pub slot_id: Option<i64>,
    /// Role name to a person id or the literal `"vacant"`.
    #[serde(default)]
    pub assignment: Option<serde_json::Map<String, serde_json::Value>>,
}

/// API request to override a single slot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OverrideRequest {
    /// The grid holding the slot (`weekly` or `monthly`).
    pub grid: String,
    /// The override itself.
    #[serde(flatten)]
    pub item: OverrideItemRequest,
}

/// API request to override several slots of one grid.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OverrideBatchRequest {
    /// The grid holding the slots (`weekly` or `monthly`).
    pub grid: String,
    /// The overrides, applied in order.
    pub items: Vec<OverrideItemRequest>,
}

/// API response for a single override.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OverrideResponse {
    /// The slot that was changed.
    pub slot_id: i64,
    /// The slot's duty type.
    pub duty_type: String,
    /// Role to person id before the change.
    pub before: BTreeMap<String, Option<i64>>,
    /// Role to person id after the change.
    pub after: BTreeMap<String, Option<i64>>,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// A batch item that was not applied.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FailedOverrideInfo {
    /// The slot named by the item.
    pub slot_id: i64,
    /// Why it was not applied.
    pub reason: String,
}

/// API response for a batch override.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OverrideBatchResponse {
    /// Items applied.
    pub success_count: usize,
    /// Items submitted.
    pub total_count: usize,
    /// Slot ids of the items not applied, in submission order.
    pub failed_ids: Vec<i64>,
    /// Per-item failure reasons.
    pub failures: Vec<FailedOverrideInfo>,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A summary message.
    pub message: String,
}

/// API request for roster rows within an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DateRangeQuery {
    /// First date (`YYYY-MM-DD`).
    pub start: String,
    /// Last date (`YYYY-MM-DD`), inclusive.
    pub end: String,
}

/// A person filling a role.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssigneeInfo {
    /// The person's identifier.
    pub person_id: i64,
    /// The person's display name.
    pub display_name: String,
}

/// One stored weekly slot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WeeklySlotInfo {
    /// The slot's identifier.
    pub slot_id: i64,
    /// The slot's date.
    pub date: String,
    /// The prayer staffed.
    pub prayer: String,
    /// The prayer leader, `None` when vacant.
    pub prayer_leader: Option<AssigneeInfo>,
    /// The caller, `None` when vacant.
    pub caller: Option<AssigneeInfo>,
    /// The ISO week number recorded at generation.
    pub week_number: u8,
    /// Whether the slot is still as generated.
    pub is_generated: bool,
    /// The actor who last changed the slot.
    pub updated_by: String,
}

/// API response listing weekly slots.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListWeeklySlotsResponse {
    /// Slots in `(date, prayer)` order, vacancies included.
    pub slots: Vec<WeeklySlotInfo>,
}

/// One stored monthly row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MonthlyDutyInfo {
    /// The row's identifier.
    pub duty_id: i64,
    /// The duty's date.
    pub date: String,
    /// The duty type.
    pub duty_type: String,
    /// The role within the duty.
    pub role: String,
    /// The assignee, `None` when vacant.
    pub assignee: Option<AssigneeInfo>,
    /// Whether the row is still as generated.
    pub is_generated: bool,
    /// The actor who last changed the row.
    pub updated_by: String,
}

/// API response listing monthly rows.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListMonthlyDutiesResponse {
    /// Rows in `(date, duty_type, role)` order, vacancies included.
    pub duties: Vec<MonthlyDutyInfo>,
}

/// API request to resolve the week containing a date.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResolveWeekQuery {
    /// Any date (`YYYY-MM-DD`).
    pub date: String,
}

/// API response for a resolved week.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResolveWeekResponse {
    /// The anchor date of the week containing the requested date.
    pub week_start: String,
    /// The last date of that week.
    pub week_end: String,
    /// The seven dates of the week.
    pub dates: Vec<String>,
}

/// API request to register a person.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterPersonRequest {
    /// The roster display name.
    pub display_name: String,
    /// Role wire names (`prayer_leader`, `caller`, ...).
    pub roles: Vec<String>,
}

/// API response for a registered person.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterPersonResponse {
    /// The new person's identifier.
    pub person_id: i64,
    /// The stored display name.
    pub display_name: String,
    /// The stored roles, sorted.
    pub roles: Vec<String>,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API request to record a person's availability.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeclareAvailabilityRequest {
    /// The person the declaration is about.
    pub person_id: i64,
    /// The date concerned (`YYYY-MM-DD`).
    pub date: String,
    /// The duty type concerned.
    pub duty_type: String,
    /// Whether the person can serve.
    pub is_available: bool,
    /// Optional free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// API request to mark a person active or inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetPersonActiveRequest {
    /// The person to update.
    pub person_id: i64,
    /// The new active flag.
    pub is_active: bool,
}

/// API response for a personnel or availability change.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PersonnelChangeResponse {
    /// The person affected.
    pub person_id: i64,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// One person in the directory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PersonInfo {
    /// The person's identifier.
    pub person_id: i64,
    /// The display name.
    pub display_name: String,
    /// Role wire names, sorted.
    pub roles: Vec<String>,
    /// Whether the person may be rostered.
    pub is_active: bool,
}

/// API response listing the directory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListPersonnelResponse {
    /// People in id order.
    pub personnel: Vec<PersonInfo>,
}

/// API request for the audit timeline.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct AuditTimelineQuery {
    /// Only return events recorded against this scope.
    #[serde(default)]
    pub scope: Option<String>,
    /// Only return events after this id.
    #[serde(default)]
    pub after: Option<i64>,
}

/// One recorded audit event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditEventInfo {
    /// The event's identifier.
    pub event_id: i64,
    /// The actor id.
    pub actor_id: String,
    /// The actor's role at the time.
    pub actor_type: String,
    /// The request or reason the change was made for.
    pub cause: String,
    /// The action name.
    pub action: String,
    /// Optional action details.
    pub details: Option<String>,
    /// State summary before the change.
    pub before: String,
    /// State summary after the change.
    pub after: String,
    /// The roster scope the change touched.
    pub scope: String,
}

/// API response for the audit timeline.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditTimelineResponse {
    /// Events in recording order.
    pub events: Vec<AuditEventInfo>,
}
