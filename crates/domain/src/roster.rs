// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roster rows as computed in memory, before they are persisted.

use crate::error::DomainError;
use crate::types::{DutyRole, DutyType, Prayer};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, Weekday};

/// The two stored roster grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterGrid {
    /// One row per `(date, prayer)` with leader and caller columns.
    Weekly,
    /// One row per `(date, duty_type, role)`.
    Monthly,
}

impl RosterGrid {
    /// Converts this grid to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl FromStr for RosterGrid {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(DomainError::InvalidGrid(other.to_string())),
        }
    }
}

impl std::fmt::Display for RosterGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One planned cell of the weekly grid.
///
/// A weekly slot staffs a prayer leader and a caller; either may be vacant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySlotPlan {
    /// The date of the slot.
    pub date: Date,
    /// The prayer being staffed.
    pub prayer: Prayer,
    /// The assigned prayer leader, if any.
    pub prayer_leader: Option<i64>,
    /// The assigned caller, if any.
    pub caller: Option<i64>,
}

/// One planned row of the monthly grid, keyed by `(date, duty_type, role)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyDutyPlan {
    /// The date of the duty.
    pub date: Date,
    /// The duty being staffed.
    pub duty_type: DutyType,
    /// The role within the duty.
    pub role: DutyRole,
    /// The assigned person, `None` for a vacancy.
    pub person_id: Option<i64>,
}

impl MonthlyDutyPlan {
    /// Returns a copy of this row moved to another date.
    #[must_use]
    pub const fn on_date(&self, date: Date) -> Self {
        Self {
            date,
            duty_type: self.duty_type,
            role: self.role,
            person_id: self.person_id,
        }
    }
}

/// Which weekdays carry the special (non-prayer) duties.
///
/// Friday leadership is not configurable; it falls on every Friday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialDutyCalendar {
    study_days: Vec<Weekday>,
    coaching_days: Vec<Weekday>,
}

impl SpecialDutyCalendar {
    /// Creates a calendar from the weekdays carrying each special duty.
    #[must_use]
    pub const fn new(study_days: Vec<Weekday>, coaching_days: Vec<Weekday>) -> Self {
        Self {
            study_days,
            coaching_days,
        }
    }

    /// Weekdays carrying a study session.
    #[must_use]
    pub fn study_days(&self) -> &[Weekday] {
        &self.study_days
    }

    /// Weekdays carrying a recitation-coaching session.
    #[must_use]
    pub fn coaching_days(&self) -> &[Weekday] {
        &self.coaching_days
    }

    /// Lists the duty types scheduled on `date`, in storage order.
    ///
    /// The five prayers come first, then study, coaching, and Friday
    /// leadership where the date carries them.
    #[must_use]
    pub fn duties_on(&self, date: Date) -> Vec<DutyType> {
        let weekday: Weekday = date.weekday();
        let mut duties: Vec<DutyType> = Prayer::ALL.into_iter().map(DutyType::Prayer).collect();
        if self.study_days.contains(&weekday) {
            duties.push(DutyType::Study);
        }
        if self.coaching_days.contains(&weekday) {
            duties.push(DutyType::Coaching);
        }
        if weekday == Weekday::Friday {
            duties.push(DutyType::FridayLeadership);
        }
        duties
    }
}

impl Default for SpecialDutyCalendar {
    fn default() -> Self {
        Self::new(
            vec![Weekday::Thursday],
            vec![Weekday::Monday, Weekday::Saturday],
        )
    }
}
