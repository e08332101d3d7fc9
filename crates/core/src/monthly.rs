// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monthly grid planning.
//!
//! Each day of the month carries the five prayers plus whichever special
//! duties the [`SpecialDutyCalendar`] places on its weekday. Rows are one per
//! `(date, duty_type, role)`; each duty category rotates independently.
//!
//! A person holds a given role at most once per day: whoever leads Fajr is
//! not a candidate to lead Dhuhr, but may still call Dhuhr or take a special
//! duty. When the day's pool for a role runs out the role stays vacant.

use crate::error::CoreError;
use crate::gateway::{AvailabilityGateway, PersonnelDirectory};
use crate::state::MonthlyGeneration;
use duty_roster_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use duty_roster_domain::{
    DutyRole, DutyType, MonthlyDutyPlan, Period, Person, RotationState, SpecialDutyCalendar,
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Plans the monthly grid for `month`/`year`.
///
/// # Arguments
///
/// * `month` - The calendar month
/// * `year` - The year
/// * `calendar` - Which weekdays carry the special duties
/// * `existing_rows` - How many monthly rows already exist in the month
/// * `source` - Personnel and availability lookups
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - the year is out of range
/// - the month already holds rows
/// - a personnel or availability lookup fails
pub fn plan_month<S>(
    month: time::Month,
    year: i32,
    calendar: &SpecialDutyCalendar,
    existing_rows: usize,
    source: &mut S,
    actor: Actor,
    cause: Cause,
) -> Result<MonthlyGeneration, CoreError>
where
    S: PersonnelDirectory + AvailabilityGateway,
{
    let period: Period = Period::month(month, year);
    let dates: Vec<time::Date> = period.dates()?;
    if existing_rows > 0 {
        warn!(%period, existing_rows, "Refusing to regenerate a populated month");
        return Err(CoreError::AlreadyGenerated {
            period: period.to_string(),
            existing: existing_rows,
        });
    }

    let mut pools: HashMap<DutyRole, Vec<Person>> = HashMap::new();
    for role in DutyRole::ALL {
        pools.insert(role, source.list_eligible(role)?);
    }
    debug!(
        %period,
        pools = ?pools.iter().map(|(role, pool)| (role.as_str(), pool.len())).collect::<BTreeMap<_, _>>(),
        "Loaded monthly candidate pools"
    );

    let mut rotation: RotationState = RotationState::new();
    let mut rows: Vec<MonthlyDutyPlan> = Vec::new();
    let mut counts: BTreeMap<DutyType, usize> = BTreeMap::new();

    for date in dates {
        let mut held_today: HashMap<DutyRole, Vec<i64>> = HashMap::new();
        for duty_type in calendar.duties_on(date) {
            let mut placed: Vec<i64> = Vec::with_capacity(duty_type.required_roles().len());
            for &role in duty_type.required_roles() {
                let pool: &[Person] = pools.get(&role).map(Vec::as_slice).unwrap_or_default();
                let same_role: &[i64] =
                    held_today.get(&role).map(Vec::as_slice).unwrap_or_default();
                let person_id: Option<i64> =
                    rotation.select(duty_type.category(), role, pool, |person| {
                        if placed.contains(&person.person_id)
                            || same_role.contains(&person.person_id)
                        {
                            return Ok(false);
                        }
                        source.is_available(person.person_id, date, duty_type)
                    })?;
                if let Some(id) = person_id {
                    placed.push(id);
                    held_today.entry(role).or_default().push(id);
                }
                rows.push(MonthlyDutyPlan {
                    date,
                    duty_type,
                    role,
                    person_id,
                });
            }
            *counts.entry(duty_type).or_insert(0) += 1;
        }
    }

    let slot_count: usize = counts.values().sum();
    let vacancies: usize = rows.iter().filter(|row| row.person_id.is_none()).count();
    let audit_event: AuditEvent = AuditEvent::for_period(
        actor,
        cause,
        Action::new(
            String::from("GenerateMonth"),
            Some(format!(
                "Generated {slot_count} slots ({} rows) for {period}",
                rows.len()
            )),
        ),
        StateSnapshot::new(String::from("rows=0")),
        StateSnapshot::new(format!(
            "slots={slot_count},rows={},vacancies={vacancies}",
            rows.len()
        )),
        &period,
    );

    Ok(MonthlyGeneration {
        period,
        rows,
        counts,
        audit_event,
    })
}
