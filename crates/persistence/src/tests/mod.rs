// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod monthly_tests;
mod override_tests;
mod replication_tests;

use crate::Persistence;
use duty_roster::{Command, TransitionResult, apply};
use duty_roster_audit::{Actor, Cause};
use duty_roster_domain::{DutyRole, DutyType};
use time::{Date, Month};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test-actor"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("Valid test date")
}

pub fn setup_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create persistence")
}

/// Registers a person through the intake path and returns their id.
pub fn register(persistence: &mut Persistence, name: &str, roles: &[DutyRole]) -> i64 {
    let result: TransitionResult = apply(
        Command::RegisterPerson {
            display_name: name.to_string(),
            roles: roles.to_vec(),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .expect("Valid registration");
    persistence
        .persist_transition(&result)
        .expect("Registration persisted")
        .person_id
}

pub fn declare_unavailable(
    persistence: &mut Persistence,
    person_id: i64,
    day: Date,
    duty_type: DutyType,
) {
    let result: TransitionResult = apply(
        Command::DeclareAvailability {
            person_id,
            date: day,
            duty_type,
            is_available: false,
            reason: Some(String::from("Travelling")),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .expect("Valid declaration");
    persistence
        .persist_transition(&result)
        .expect("Declaration persisted");
}

/// Five people holding both prayer roles; ids 1 through 5.
pub fn seed_prayer_staff(persistence: &mut Persistence) -> Vec<i64> {
    ["Ahmad", "Bilal", "Hamza", "Idris", "Yusuf"]
        .iter()
        .map(|name| {
            register(
                persistence,
                name,
                &[DutyRole::PrayerLeader, DutyRole::Caller],
            )
        })
        .collect()
}

/// Prayer staff plus a study leader (6), two coaches (7, 8), and a
/// Friday preacher (9).
pub fn seed_full_staff(persistence: &mut Persistence) {
    seed_prayer_staff(persistence);
    register(persistence, "Khalid", &[DutyRole::StudyLeader]);
    register(persistence, "Musa", &[DutyRole::RecitationCoach]);
    register(persistence, "Nuh", &[DutyRole::RecitationCoach]);
    register(persistence, "Salih", &[DutyRole::FridayPreacher]);
}
