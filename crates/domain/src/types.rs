// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::calendar;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use time::{Date, Month};

/// A duty capability a person may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyRole {
    /// Leads a congregational prayer (imam).
    PrayerLeader,
    /// Gives the call to prayer (muadhin).
    Caller,
    /// Leads the Quran-study session.
    StudyLeader,
    /// Coaches recitation.
    RecitationCoach,
    /// Leads the Friday prayer and delivers the sermon.
    FridayPreacher,
}

impl DutyRole {
    /// Every role, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::PrayerLeader,
        Self::Caller,
        Self::StudyLeader,
        Self::RecitationCoach,
        Self::FridayPreacher,
    ];

    /// Converts this role to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PrayerLeader => "prayer_leader",
            Self::Caller => "caller",
            Self::StudyLeader => "study_leader",
            Self::RecitationCoach => "recitation_coach",
            Self::FridayPreacher => "friday_preacher",
        }
    }
}

impl FromStr for DutyRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| DomainError::InvalidDutyRole(s.to_string()))
    }
}

impl std::fmt::Display for DutyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The five daily congregational prayers.
///
/// Declaration order is the canonical slot order of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    /// All prayers in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Fajr,
        Self::Dhuhr,
        Self::Asr,
        Self::Maghrib,
        Self::Isha,
    ];

    /// Converts this prayer to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fajr => "fajr",
            Self::Dhuhr => "dhuhr",
            Self::Asr => "asr",
            Self::Maghrib => "maghrib",
            Self::Isha => "isha",
        }
    }
}

impl FromStr for Prayer {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|prayer| prayer.as_str() == s)
            .ok_or_else(|| DomainError::InvalidDutyType(s.to_string()))
    }
}

impl std::fmt::Display for Prayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Groups duty types that share one rotation.
///
/// All five prayer slots rotate through the same populations; every
/// special duty keeps its own rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DutyCategory {
    Prayer,
    Study,
    Coaching,
    FridayLeadership,
}

/// A bookable duty on a given date.
///
/// Each variant names the roles it must staff via [`DutyType::required_roles`],
/// so adding a duty type never widens the stored row shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DutyType {
    /// One of the five daily prayers.
    Prayer(Prayer),
    /// Quran-study session.
    Study,
    /// Recitation coaching session.
    Coaching,
    /// Friday prayer leadership (only on Fridays).
    FridayLeadership,
}

impl DutyType {
    /// Converts this duty type to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Prayer(prayer) => prayer.as_str(),
            Self::Study => "study",
            Self::Coaching => "coaching",
            Self::FridayLeadership => "friday_leadership",
        }
    }

    /// The roles that must each be filled (or left vacant) on this duty.
    #[must_use]
    pub const fn required_roles(&self) -> &'static [DutyRole] {
        match self {
            Self::Prayer(_) => &[DutyRole::PrayerLeader, DutyRole::Caller],
            Self::Study => &[DutyRole::StudyLeader],
            Self::Coaching => &[DutyRole::RecitationCoach],
            Self::FridayLeadership => &[DutyRole::FridayPreacher],
        }
    }

    /// Returns whether this duty staffs the given role.
    #[must_use]
    pub fn carries(&self, role: DutyRole) -> bool {
        self.required_roles().contains(&role)
    }

    /// The rotation this duty type draws from.
    #[must_use]
    pub const fn category(&self) -> DutyCategory {
        match self {
            Self::Prayer(_) => DutyCategory::Prayer,
            Self::Study => DutyCategory::Study,
            Self::Coaching => DutyCategory::Coaching,
            Self::FridayLeadership => DutyCategory::FridayLeadership,
        }
    }
}

impl FromStr for DutyType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "study" => Ok(Self::Study),
            "coaching" => Ok(Self::Coaching),
            "friday_leadership" => Ok(Self::FridayLeadership),
            other => Prayer::from_str(other).map(Self::Prayer),
        }
    }
}

impl TryFrom<String> for DutyType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<DutyType> for String {
    fn from(value: DutyType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for DutyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A member of the personnel directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// The canonical identifier assigned by the directory.
    pub person_id: i64,
    /// The name shown on the roster.
    pub display_name: String,
    /// The duty capabilities this person holds.
    pub roles: BTreeSet<DutyRole>,
    /// Inactive people are never scheduled.
    pub is_active: bool,
}

impl Person {
    /// Creates a new active person.
    ///
    /// # Arguments
    ///
    /// * `person_id` - The directory identifier
    /// * `display_name` - The roster display name
    /// * `roles` - The duty capabilities held
    #[must_use]
    pub fn new(person_id: i64, display_name: &str, roles: &[DutyRole]) -> Self {
        Self {
            person_id,
            display_name: display_name.to_string(),
            roles: roles.iter().copied().collect(),
            is_active: true,
        }
    }

    /// Returns whether this person holds the given capability.
    #[must_use]
    pub fn has_role(&self, role: DutyRole) -> bool {
        self.roles.contains(&role)
    }

    /// Returns whether this person may currently be scheduled in the role.
    #[must_use]
    pub fn is_eligible_for(&self, role: DutyRole) -> bool {
        self.is_active && self.has_role(role)
    }
}

/// A scheduling period.
///
/// Periods are derived boundaries, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Seven consecutive dates beginning on the anchor weekday.
    Week {
        /// The anchor date that opens the week.
        anchor: Date,
    },
    /// A calendar month.
    Month {
        /// The month.
        month: Month,
        /// The year.
        year: i32,
    },
}

impl Period {
    /// Creates a week period, validating that `anchor` is the anchor weekday.
    ///
    /// # Errors
    ///
    /// Returns an error if `anchor` does not fall on the anchor weekday.
    pub fn week(anchor: Date) -> Result<Self, DomainError> {
        calendar::validate_week_start(anchor)?;
        Ok(Self::Week { anchor })
    }

    /// Creates a month period.
    #[must_use]
    pub const fn month(month: Month, year: i32) -> Self {
        Self::Month { month, year }
    }

    /// Returns every date of the period in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the period runs past the representable date range.
    pub fn dates(&self) -> Result<Vec<Date>, DomainError> {
        match self {
            Self::Week { anchor } => calendar::week_dates(*anchor),
            Self::Month { month, year } => calendar::month_dates(*month, *year),
        }
    }

    /// Returns the inclusive date range covered by this period.
    ///
    /// # Errors
    ///
    /// Returns an error if the period runs past the representable date range.
    pub fn range(&self) -> Result<DateRange, DomainError> {
        let dates: Vec<Date> = self.dates()?;
        match (dates.first(), dates.last()) {
            (Some(start), Some(end)) => DateRange::new(*start, *end),
            _ => Err(DomainError::DateArithmeticOverflow {
                operation: format!("computing the dates of {self}"),
            }),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Week { anchor } => {
                let (iso_year, week, _) = anchor.to_iso_week_date();
                write!(f, "week {iso_year}-W{week:02} ({anchor})")
            }
            Self::Month { month, year } => write!(f, "month {year}-{:02}", u8::from(*month)),
        }
    }
}

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Creates a new inclusive range.
    ///
    /// # Errors
    ///
    /// Returns an error if `end` precedes `start`.
    pub fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the first date of the range.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Returns the last date of the range.
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Returns whether `date` falls within the range.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}
