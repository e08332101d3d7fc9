// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use duty_roster_audit::AuditEvent;
use duty_roster_domain::{DutyCategory, DutyType, MonthlyDutyPlan, Period, WeeklySlotPlan};
use std::collections::{BTreeMap, BTreeSet};
use time::Date;

/// A planned weekly roster, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyGeneration {
    /// The week being generated.
    pub period: Period,
    /// Exactly 35 slots in date, then prayer order.
    pub slots: Vec<WeeklySlotPlan>,
    /// The audit event recording this generation.
    pub audit_event: AuditEvent,
}

impl WeeklyGeneration {
    /// Counts the roles left vacant across the week.
    #[must_use]
    pub fn vacancy_count(&self) -> usize {
        crate::weekly::count_weekly_vacancies(&self.slots)
    }
}

/// A planned monthly roster, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyGeneration {
    /// The month being generated.
    pub period: Period,
    /// One row per `(date, duty_type, role)`.
    pub rows: Vec<MonthlyDutyPlan>,
    /// Number of `(date, duty_type)` slots per duty type.
    pub counts: BTreeMap<DutyType, usize>,
    /// The audit event recording this generation.
    pub audit_event: AuditEvent,
}

impl MonthlyGeneration {
    /// Total number of `(date, duty_type)` slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of slots whose duty type belongs to `category`.
    #[must_use]
    pub fn count_for_category(&self, category: DutyCategory) -> usize {
        self.counts
            .iter()
            .filter(|(duty_type, _)| duty_type.category() == category)
            .map(|(_, count)| count)
            .sum()
    }

    /// Counts the role rows left vacant across the month.
    #[must_use]
    pub fn vacancy_count(&self) -> usize {
        self.rows.iter().filter(|row| row.person_id.is_none()).count()
    }
}

/// A planned replication of the first week across the rest of a month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationPlan {
    /// The month being replicated.
    pub period: Period,
    /// Rows to insert for days 8 through the end of the month.
    pub rows: Vec<MonthlyDutyPlan>,
    /// Rows currently stored on days 8+ that the replication replaces.
    pub replaced_count: usize,
    /// Copied roles left vacant because the person is unavailable on the
    /// new date.
    pub vacated_count: usize,
    /// The audit event recording this replication.
    pub audit_event: AuditEvent,
}

impl ReplicationPlan {
    /// Number of distinct `(date, duty_type)` slots written.
    #[must_use]
    pub fn copied_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| (row.date, row.duty_type))
            .collect::<BTreeSet<(Date, DutyType)>>()
            .len()
    }
}

/// The result of applying an intake command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The validated, normalized command to persist.
    pub command: Command,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
