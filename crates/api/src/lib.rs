// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! The public API of the duty roster scheduler.
//!
//! Handlers take an open [`duty_roster_persistence::Persistence`], a request
//! DTO, the authenticated actor, and the cause of the request. They enforce
//! the role check, translate every lower-layer error into [`ApiError`], and
//! return plain serializable responses.

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_override_rejection, translate_persistence_error,
};
pub use handlers::{
    apply_override, apply_override_batch, declare_availability, generate_month, generate_week,
    get_audit_timeline, list_monthly_duties, list_personnel, list_weekly_slots, register_person,
    replicate_first_week, resolve_week, set_person_active,
};
pub use request_response::{
    AssigneeInfo, AuditEventInfo, AuditTimelineQuery, AuditTimelineResponse, DateRangeQuery,
    DeclareAvailabilityRequest, FailedOverrideInfo, GenerateMonthResponse, GenerateWeekRequest,
    GenerateWeekResponse, ListMonthlyDutiesResponse, ListPersonnelResponse,
    ListWeeklySlotsResponse, MonthRequest, MonthlyDutyInfo, OverrideBatchRequest,
    OverrideBatchResponse, OverrideItemRequest, OverrideRequest, OverrideResponse, PersonInfo,
    PersonnelChangeResponse, RegisterPersonRequest, RegisterPersonResponse,
    ReplicateFirstWeekResponse, ResolveWeekQuery, ResolveWeekResponse, SetPersonActiveRequest,
    WeeklySlotInfo,
};
