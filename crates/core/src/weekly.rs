// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly grid planning.
//!
//! A week is seven dates opened by the anchor weekday, each carrying the five
//! daily prayers. Every slot gets a prayer leader and a caller chosen by
//! round-robin over the eligible population; anyone unavailable, or already
//! placed in the same slot, is skipped. A role nobody can fill stays vacant.

use crate::error::CoreError;
use crate::gateway::{AvailabilityGateway, GatewayError, PersonnelDirectory};
use crate::state::WeeklyGeneration;
use duty_roster_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use duty_roster_domain::{
    DutyCategory, DutyRole, DutyType, Period, Person, Prayer, RotationState, WeeklySlotPlan,
};
use time::Date;
use tracing::{debug, warn};

/// Plans the weekly grid for the week opened by `anchor`.
///
/// # Arguments
///
/// * `anchor` - The week start; must fall on the anchor weekday
/// * `existing_slots` - How many weekly rows already exist in the week
/// * `source` - Personnel and availability lookups
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - `anchor` is not the anchor weekday
/// - the week already holds rows
/// - a personnel or availability lookup fails
pub fn plan_week<S>(
    anchor: Date,
    existing_slots: usize,
    source: &mut S,
    actor: Actor,
    cause: Cause,
) -> Result<WeeklyGeneration, CoreError>
where
    S: PersonnelDirectory + AvailabilityGateway,
{
    let period: Period = Period::week(anchor)?;
    if existing_slots > 0 {
        warn!(%period, existing_slots, "Refusing to regenerate a populated week");
        return Err(CoreError::AlreadyGenerated {
            period: period.to_string(),
            existing: existing_slots,
        });
    }

    let leaders: Vec<Person> = source.list_eligible(DutyRole::PrayerLeader)?;
    let callers: Vec<Person> = source.list_eligible(DutyRole::Caller)?;
    debug!(
        %period,
        leaders = leaders.len(),
        callers = callers.len(),
        "Loaded weekly candidate pools"
    );

    let mut rotation: RotationState = RotationState::new();
    let mut slots: Vec<WeeklySlotPlan> = Vec::with_capacity(35);
    for date in period.dates()? {
        for prayer in Prayer::ALL {
            slots.push(staff_prayer_slot(
                date,
                prayer,
                &leaders,
                &callers,
                &mut rotation,
                source,
            )?);
        }
    }

    let generation_details: String = format!("Generated {} slots for {period}", slots.len());
    let after: StateSnapshot = StateSnapshot::new(format!(
        "slots={},vacancies={}",
        slots.len(),
        count_weekly_vacancies(&slots)
    ));
    let audit_event: AuditEvent = AuditEvent::for_period(
        actor,
        cause,
        Action::new(String::from("GenerateWeek"), Some(generation_details)),
        StateSnapshot::new(String::from("slots=0")),
        after,
        &period,
    );

    Ok(WeeklyGeneration {
        period,
        slots,
        audit_event,
    })
}

/// Fills one prayer slot with a leader and a distinct caller.
fn staff_prayer_slot<S>(
    date: Date,
    prayer: Prayer,
    leaders: &[Person],
    callers: &[Person],
    rotation: &mut RotationState,
    source: &mut S,
) -> Result<WeeklySlotPlan, GatewayError>
where
    S: AvailabilityGateway,
{
    let duty_type: DutyType = DutyType::Prayer(prayer);

    let prayer_leader: Option<i64> = rotation.select(
        DutyCategory::Prayer,
        DutyRole::PrayerLeader,
        leaders,
        |person| source.is_available(person.person_id, date, duty_type),
    )?;

    let caller: Option<i64> =
        rotation.select(DutyCategory::Prayer, DutyRole::Caller, callers, |person| {
            if Some(person.person_id) == prayer_leader {
                return Ok(false);
            }
            source.is_available(person.person_id, date, duty_type)
        })?;

    Ok(WeeklySlotPlan {
        date,
        prayer,
        prayer_leader,
        caller,
    })
}

pub(crate) fn count_weekly_vacancies(slots: &[WeeklySlotPlan]) -> usize {
    slots
        .iter()
        .map(|slot| usize::from(slot.prayer_leader.is_none()) + usize::from(slot.caller.is_none()))
        .sum()
}
