// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roster orchestration.
//!
//! Each operation here runs the matching planner against the rows its
//! transaction sees, writes the planned rows, and records the audit event,
//! all inside a single transaction. Generation and replication take the
//! write lock up front so that the existence check and the insert cannot
//! interleave with a concurrent request.

use diesel::{Connection, SqliteConnection};
use duty_roster::{
    BatchOutcome, MonthlyGeneration, OverrideItem, OverrideRejection, RawOverrideItem,
    ReplicationPlan, SlotAssignment, WeeklyGeneration, batch_audit_event, override_audit_event,
    plan_month, plan_replication, plan_week, resolve_override, validate_override_batch,
    validate_override_item,
};
use duty_roster_audit::{Actor, Cause};
use duty_roster_domain::{
    DateRange, DomainError, DutyRole, DutyType, MonthlyDutyPlan, Period, RosterGrid, SpecialDutyCalendar, TEMPLATE_LAST_DAY,
    week_number,
};
use std::collections::BTreeMap;
use time::{Date, Month};
use tracing::{info, warn};

use crate::data_models::{MonthlyDutyRecord, WeeklySlotRecord};
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::mutations::monthly::{
    delete_monthly_duties, insert_monthly_duties, update_monthly_assignment,
};
use crate::mutations::weekly::{insert_weekly_slots, update_weekly_assignment};
use crate::queries::{
    count_monthly_duties, count_weekly_slots, find_monthly_duty, find_weekly_slot,
    list_monthly_plans, list_slot_siblings,
};
use crate::source::ConnectionSource;

/// A stored weekly generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedWeek {
    /// The audit event recording the generation.
    pub event_id: i64,
    /// What was planned and written.
    pub generation: WeeklyGeneration,
}

/// A stored monthly generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMonth {
    /// The audit event recording the generation.
    pub event_id: i64,
    /// What was planned and written.
    pub generation: MonthlyGeneration,
}

/// A stored first-week replication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicatedMonth {
    /// The audit event recording the replication.
    pub event_id: i64,
    /// What was planned and written.
    pub plan: ReplicationPlan,
}

/// A stored single override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedOverride {
    /// The audit event recording the override.
    pub event_id: i64,
    /// The slot that changed.
    pub slot_id: i64,
    /// The assignment before the change.
    pub before: SlotAssignment,
    /// The assignment after the change.
    pub after: SlotAssignment,
}

/// A stored batch override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedBatch {
    /// The audit event recording the batch.
    pub event_id: i64,
    /// Which items were applied.
    pub outcome: BatchOutcome,
}

/// Generates and stores the weekly grid for the week opened by `anchor`.
///
/// # Errors
///
/// Returns an error if the week is already populated, planning fails, or
/// any write fails. Nothing is stored on error.
pub fn generate_week(
    conn: &mut SqliteConnection,
    anchor: Date,
    actor: Actor,
    cause: Cause,
) -> Result<GeneratedWeek, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let period: Period = Period::week(anchor)?;
        let range: DateRange = period.range()?;
        let existing: usize = count_weekly_slots(conn, &range)?;

        let generation: WeeklyGeneration = {
            let mut source: ConnectionSource<'_> = ConnectionSource::new(conn);
            plan_week(anchor, existing, &mut source, actor, cause)?
        };

        let written_by: String = generation.audit_event.actor.id.clone();
        insert_weekly_slots(conn, &generation.slots, week_number(anchor)?, &written_by)?;
        let event_id: i64 = persist_audit_event(conn, &generation.audit_event)?;

        info!(
            event_id,
            %period,
            slots = generation.slots.len(),
            vacancies = generation.vacancy_count(),
            "Stored weekly roster"
        );
        Ok(GeneratedWeek {
            event_id,
            generation,
        })
    })
}

/// Generates and stores the monthly grid.
///
/// # Errors
///
/// Returns an error if the month is already populated, planning fails, or
/// any write fails. Nothing is stored on error.
pub fn generate_month(
    conn: &mut SqliteConnection,
    month: Month,
    year: i32,
    calendar: &SpecialDutyCalendar,
    actor: Actor,
    cause: Cause,
) -> Result<GeneratedMonth, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let period: Period = Period::month(month, year);
        let range: DateRange = period.range()?;
        let existing: usize = count_monthly_duties(conn, &range)?;

        let generation: MonthlyGeneration = {
            let mut source: ConnectionSource<'_> = ConnectionSource::new(conn);
            plan_month(month, year, calendar, existing, &mut source, actor, cause)?
        };

        let written_by: String = generation.audit_event.actor.id.clone();
        insert_monthly_duties(conn, &generation.rows, month, year, &written_by)?;
        let event_id: i64 = persist_audit_event(conn, &generation.audit_event)?;

        info!(
            event_id,
            %period,
            slots = generation.slot_count(),
            rows = generation.rows.len(),
            vacancies = generation.vacancy_count(),
            "Stored monthly roster"
        );
        Ok(GeneratedMonth {
            event_id,
            generation,
        })
    })
}

/// Replaces days 8 onward of a month with copies of its first week.
///
/// # Errors
///
/// Returns an error if the first week is empty or any write fails. The
/// existing rows are left untouched on error.
pub fn replicate_first_week(
    conn: &mut SqliteConnection,
    month: Month,
    year: i32,
    actor: Actor,
    cause: Cause,
) -> Result<ReplicatedMonth, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let period: Period = Period::month(month, year);
        let dates: Vec<Date> = period.dates()?;
        let (head, tail) = dates.split_at(usize::from(TEMPLATE_LAST_DAY).min(dates.len()));
        let template_range: DateRange = span(head)?;
        let tail_range: DateRange = span(tail)?;

        let template: Vec<MonthlyDutyPlan> = list_monthly_plans(conn, &template_range)?;
        let replaced: usize = count_monthly_duties(conn, &tail_range)?;
        let plan: ReplicationPlan = {
            let mut source: ConnectionSource<'_> = ConnectionSource::new(conn);
            plan_replication(month, year, &template, replaced, &mut source, actor, cause)?
        };

        let deleted: usize = delete_monthly_duties(conn, &tail_range)?;
        let written_by: String = plan.audit_event.actor.id.clone();
        insert_monthly_duties(conn, &plan.rows, month, year, &written_by)?;
        let event_id: i64 = persist_audit_event(conn, &plan.audit_event)?;

        info!(
            event_id,
            %period,
            copied = plan.copied_count(),
            rows = plan.rows.len(),
            vacated = plan.vacated_count,
            deleted,
            "Replicated first week"
        );
        Ok(ReplicatedMonth { event_id, plan })
    })
}

/// Applies one override.
///
/// # Errors
///
/// Returns an error if the item is malformed, cannot be applied, or the
/// write fails. A rejected override changes nothing.
pub fn apply_override(
    conn: &mut SqliteConnection,
    grid: RosterGrid,
    raw: RawOverrideItem,
    actor: Actor,
    cause: Cause,
) -> Result<AppliedOverride, PersistenceError> {
    let item: OverrideItem = validate_override_item(0, raw)?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let (before, after) = apply_item(conn, grid, &item, &actor.id)?;
        let event = override_audit_event(grid, item.slot_id, &before, &after, actor, cause);
        let event_id: i64 = persist_audit_event(conn, &event)?;

        info!(event_id, %grid, slot_id = item.slot_id, "Applied override");
        Ok(AppliedOverride {
            event_id,
            slot_id: item.slot_id,
            before,
            after,
        })
    })
}

/// Applies a batch of overrides.
///
/// Every item is validated before any is applied. Each item then runs in
/// its own savepoint: an item that is rejected, or that storage refuses on
/// a constraint, is reported and rolled back alone. Any other storage
/// failure aborts the whole batch.
///
/// # Errors
///
/// Returns an error if any item is malformed or a storage failure aborts
/// the batch.
pub fn apply_override_batch(
    conn: &mut SqliteConnection,
    grid: RosterGrid,
    raws: Vec<RawOverrideItem>,
    actor: Actor,
    cause: Cause,
) -> Result<AppliedBatch, PersistenceError> {
    let items: Vec<OverrideItem> = validate_override_batch(raws)?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let mut outcome: BatchOutcome = BatchOutcome {
            success_count: 0,
            total_count: items.len(),
            failures: Vec::new(),
        };

        for item in &items {
            let applied: Result<(SlotAssignment, SlotAssignment), PersistenceError> =
                conn.transaction(|conn| apply_item(conn, grid, item, &actor.id));
            match applied {
                Ok(_) => outcome.success_count += 1,
                Err(PersistenceError::OverrideRejected(rejection)) => {
                    warn!(%grid, slot_id = item.slot_id, %rejection, "Override item rejected");
                    outcome.failures.push((item.slot_id, rejection));
                }
                Err(err) => return Err(err),
            }
        }

        let event = batch_audit_event(grid, &outcome, actor, cause);
        let event_id: i64 = persist_audit_event(conn, &event)?;

        info!(
            event_id,
            %grid,
            applied = outcome.success_count,
            total = outcome.total_count,
            "Applied override batch"
        );
        Ok(AppliedBatch { event_id, outcome })
    })
}

/// Resolves and writes one override item.
///
/// Rejections, and constraint violations raised by the write, come back as
/// [`PersistenceError::OverrideRejected`].
fn apply_item(
    conn: &mut SqliteConnection,
    grid: RosterGrid,
    item: &OverrideItem,
    written_by: &str,
) -> Result<(SlotAssignment, SlotAssignment), PersistenceError> {
    let current: SlotAssignment =
        load_assignment(conn, grid, item.slot_id)?.ok_or_else(|| {
            PersistenceError::OverrideRejected(OverrideRejection::SlotNotFound {
                slot_id: item.slot_id,
            })
        })?;

    let resolved = {
        let mut source: ConnectionSource<'_> = ConnectionSource::new(conn);
        resolve_override(&current, item, &mut source)?
    };
    let updated: SlotAssignment = resolved.map_err(PersistenceError::OverrideRejected)?;

    write_assignment(conn, grid, item.slot_id, &updated, written_by).map_err(|err| {
        if err.is_constraint_violation() {
            PersistenceError::OverrideRejected(OverrideRejection::StorageConflict {
                detail: err.to_string(),
            })
        } else {
            err
        }
    })?;

    Ok((current, updated))
}

fn load_assignment(
    conn: &mut SqliteConnection,
    grid: RosterGrid,
    slot_id: i64,
) -> Result<Option<SlotAssignment>, PersistenceError> {
    match grid {
        RosterGrid::Weekly => Ok(find_weekly_slot(conn, slot_id)?.map(|slot: WeeklySlotRecord| {
            SlotAssignment::new(
                DutyType::Prayer(slot.prayer),
                BTreeMap::from([
                    (DutyRole::PrayerLeader, slot.prayer_leader),
                    (DutyRole::Caller, slot.caller),
                ]),
            )
        })),
        RosterGrid::Monthly => {
            let Some(duty) = find_monthly_duty(conn, slot_id)? else {
                return Ok(None);
            };
            let siblings: BTreeMap<DutyRole, Option<i64>> =
                list_slot_siblings(conn, duty.date, duty.duty_type, duty.duty_id)?
                    .into_iter()
                    .map(|sibling: MonthlyDutyRecord| (sibling.role, sibling.person_id))
                    .collect();
            Ok(Some(
                SlotAssignment::new(duty.duty_type, BTreeMap::from([(duty.role, duty.person_id)]))
                    .with_siblings(siblings),
            ))
        }
    }
}

fn write_assignment(
    conn: &mut SqliteConnection,
    grid: RosterGrid,
    slot_id: i64,
    assignment: &SlotAssignment,
    written_by: &str,
) -> Result<(), PersistenceError> {
    match grid {
        RosterGrid::Weekly => update_weekly_assignment(
            conn,
            slot_id,
            assignment.roles.get(&DutyRole::PrayerLeader).copied().flatten(),
            assignment.roles.get(&DutyRole::Caller).copied().flatten(),
            written_by,
        ),
        RosterGrid::Monthly => {
            let person_id: Option<i64> = assignment.roles.values().next().copied().flatten();
            update_monthly_assignment(conn, slot_id, person_id, written_by)
        }
    }
}

fn span(dates: &[Date]) -> Result<DateRange, PersistenceError> {
    match (dates.first(), dates.last()) {
        (Some(start), Some(end)) => Ok(DateRange::new(*start, *end)?),
        _ => Err(PersistenceError::from(DomainError::DateArithmeticOverflow {
            operation: String::from("splitting a month at its first week"),
        })),
    }
}
