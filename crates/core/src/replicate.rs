// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! First-week replication.
//!
//! Days 1-7 of a month cover every weekday exactly once, so they form a
//! per-weekday template. Replication stamps that template onto days 8
//! through the end of the month and never touches days 1-7.
//!
//! A copied person who has declared themselves unavailable for the new date
//! and duty is not carried over; that role is left vacant instead.

use crate::error::CoreError;
use crate::gateway::AvailabilityGateway;
use crate::state::ReplicationPlan;
use duty_roster_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use duty_roster_domain::{MonthlyDutyPlan, Period, TEMPLATE_LAST_DAY};
use time::{Date, Month};
use tracing::{debug, warn};

/// Plans the replication of the first week of `month`/`year`.
///
/// `template` may contain rows from anywhere in the month; only rows dated
/// on days 1-7 of the requested month are used.
///
/// # Arguments
///
/// * `month` - The calendar month
/// * `year` - The year
/// * `template` - The stored monthly rows of days 1-7
/// * `replaced_rows` - How many rows are currently stored on days 8+
/// * `availability` - Availability lookups for the copied people
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if the year is out of range, the template is empty, or
/// an availability lookup fails.
pub fn plan_replication<A>(
    month: Month,
    year: i32,
    template: &[MonthlyDutyPlan],
    replaced_rows: usize,
    availability: &mut A,
    actor: Actor,
    cause: Cause,
) -> Result<ReplicationPlan, CoreError>
where
    A: AvailabilityGateway,
{
    let period: Period = Period::month(month, year);
    let dates: Vec<Date> = period.dates()?;

    let template: Vec<&MonthlyDutyPlan> = template
        .iter()
        .filter(|row| {
            row.date.year() == year && row.date.month() == month && is_template_day(row.date)
        })
        .collect();
    if template.is_empty() {
        warn!(%period, "No first-week template to replicate");
        return Err(CoreError::NoTemplate {
            month: u8::from(month),
            year,
        });
    }

    let mut rows: Vec<MonthlyDutyPlan> = Vec::new();
    let mut vacated: usize = 0;
    for date in dates.into_iter().filter(|date| !is_template_day(*date)) {
        for source_row in template
            .iter()
            .filter(|row| row.date.weekday() == date.weekday())
        {
            let mut row: MonthlyDutyPlan = source_row.on_date(date);
            let unavailable: bool = match row.person_id {
                Some(person_id) => !availability.is_available(person_id, date, row.duty_type)?,
                None => false,
            };
            if unavailable {
                debug!(
                    person_id = ?row.person_id,
                    %date,
                    duty_type = %row.duty_type,
                    "Copied person unavailable"
                );
                row.person_id = None;
                vacated += 1;
            }
            rows.push(row);
        }
    }

    let mut plan: ReplicationPlan = ReplicationPlan {
        period,
        rows,
        replaced_count: replaced_rows,
        vacated_count: vacated,
        audit_event: AuditEvent::for_period(
            actor,
            cause,
            Action::new(String::from("ReplicateFirstWeek"), None),
            StateSnapshot::new(format!("tail_rows={replaced_rows}")),
            StateSnapshot::new(String::new()),
            &period,
        ),
    };

    let copied: usize = plan.copied_count();
    plan.audit_event.action.details = Some(format!(
        "Copied {copied} slots ({} rows) from {} template rows; replaced {replaced_rows} rows; vacated {vacated} unavailable",
        plan.rows.len(),
        template.len()
    ));
    plan.audit_event.after = StateSnapshot::new(format!("tail_rows={}", plan.rows.len()));

    Ok(plan)
}

const fn is_template_day(date: Date) -> bool {
    date.day() <= TEMPLATE_LAST_DAY
}
