// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{DutyRole, DutyType};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A week was requested with a start date that is not the anchor weekday.
    InvalidWeekStart {
        /// The rejected start date.
        date: time::Date,
        /// The actual weekday of the rejected date.
        weekday: time::Weekday,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Month number is outside 1..=12.
    InvalidMonth(u8),
    /// Year is outside the supported range.
    InvalidYear(i32),
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// The end of a date range precedes its start.
    InvalidDateRange {
        /// The range start.
        start: time::Date,
        /// The range end.
        end: time::Date,
    },
    /// Unknown duty role name.
    InvalidDutyRole(String),
    /// Unknown duty type name.
    InvalidDutyType(String),
    /// Unknown weekday name.
    InvalidWeekday(String),
    /// Unknown roster grid name.
    InvalidGrid(String),
    /// Display name is empty or invalid.
    InvalidName(String),
    /// Availability reason is too long.
    InvalidReason(String),
    /// Person carries no duty role.
    NoRolesDeclared,
    /// The role is not staffed on the given duty type.
    RoleNotApplicable {
        /// The duty type of the slot.
        duty_type: DutyType,
        /// The role that was requested.
        role: DutyRole,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWeekStart { date, weekday } => {
                write!(
                    f,
                    "Week start must be a {}, but {date} is a {weekday}",
                    crate::calendar::WEEK_ANCHOR
                )
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::InvalidMonth(month) => {
                write!(f, "Invalid month: {month}. Must be between 1 and 12")
            }
            Self::InvalidYear(year) => {
                write!(f, "Invalid year: {year}. Must be between 2000 and 2200")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidDateRange { start, end } => {
                write!(f, "Invalid date range: end {end} precedes start {start}")
            }
            Self::InvalidDutyRole(role) => write!(f, "Invalid duty role: {role}"),
            Self::InvalidDutyType(duty) => write!(f, "Invalid duty type: {duty}"),
            Self::InvalidWeekday(day) => write!(f, "Invalid weekday: {day}"),
            Self::InvalidGrid(grid) => {
                write!(f, "Invalid roster grid: {grid}. Must be 'weekly' or 'monthly'")
            }
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidReason(msg) => write!(f, "Invalid reason: {msg}"),
            Self::NoRolesDeclared => write!(f, "A person must carry at least one duty role"),
            Self::RoleNotApplicable { duty_type, role } => {
                write!(f, "Role '{role}' is not staffed on duty '{duty_type}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}
