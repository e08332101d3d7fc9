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

mod calendar;
mod error;
mod roster;
mod rotation;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use calendar::{
    DAYS_PER_WEEK, TEMPLATE_LAST_DAY, WEEK_ANCHOR, anchor_offset, count_fridays,
    month_dates, month_from_number, parse_date, parse_weekday, parse_weekday_list,
    validate_week_start, validate_year, week_dates, week_number, week_start,
};
pub use error::DomainError;
pub use roster::{MonthlyDutyPlan, RosterGrid, SpecialDutyCalendar, WeeklySlotPlan};
pub use rotation::RotationState;
pub use types::{DateRange, DutyCategory, DutyRole, DutyType, Period, Person, Prayer};
pub use validation::{validate_display_name, validate_reason, validate_roles};
