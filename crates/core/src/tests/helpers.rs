// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AvailabilityGateway, GatewayError, PersonnelDirectory};
use duty_roster_audit::{Actor, Cause};
use duty_roster_domain::{DutyRole, DutyType, Person};
use time::{Date, Month};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Admin request"))
}

pub fn date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("Valid test date")
}

/// In-memory personnel directory and availability store.
#[derive(Debug, Default)]
pub struct FakeSource {
    pub people: Vec<Person>,
    pub unavailable: Vec<(i64, Date, DutyType)>,
    pub offline: bool,
}

impl FakeSource {
    pub fn with_people(people: Vec<Person>) -> Self {
        Self {
            people,
            ..Self::default()
        }
    }

    pub fn mark_unavailable(&mut self, person_id: i64, date: Date, duty_type: DutyType) {
        self.unavailable.push((person_id, date, duty_type));
    }
}

impl PersonnelDirectory for FakeSource {
    fn list_eligible(&mut self, role: DutyRole) -> Result<Vec<Person>, GatewayError> {
        let mut eligible: Vec<Person> = self
            .people
            .iter()
            .filter(|person| person.is_eligible_for(role))
            .cloned()
            .collect();
        eligible.sort_by_key(|person| person.person_id);
        Ok(eligible)
    }

    fn find_person(&mut self, person_id: i64) -> Result<Option<Person>, GatewayError> {
        Ok(self
            .people
            .iter()
            .find(|person| person.person_id == person_id)
            .cloned())
    }
}

impl AvailabilityGateway for FakeSource {
    fn is_available(
        &mut self,
        person_id: i64,
        date: Date,
        duty_type: DutyType,
    ) -> Result<bool, GatewayError> {
        if self.offline {
            return Err(GatewayError::new(String::from("availability store offline")));
        }
        Ok(!self.unavailable.contains(&(person_id, date, duty_type)))
    }
}

/// Two leaders, two callers, and one person holding both prayer roles.
pub fn create_prayer_staff() -> Vec<Person> {
    vec![
        Person::new(1, "Ahmad", &[DutyRole::PrayerLeader]),
        Person::new(2, "Bilal", &[DutyRole::Caller]),
        Person::new(3, "Hasan", &[DutyRole::PrayerLeader, DutyRole::Caller]),
        Person::new(4, "Idris", &[DutyRole::Caller]),
        Person::new(5, "Yusuf", &[DutyRole::PrayerLeader]),
    ]
}

/// Prayer staff plus one holder of every special-duty role.
pub fn create_full_staff() -> Vec<Person> {
    let mut people: Vec<Person> = create_prayer_staff();
    people.push(Person::new(10, "Khalid", &[DutyRole::StudyLeader]));
    people.push(Person::new(11, "Musa", &[DutyRole::RecitationCoach]));
    people.push(Person::new(12, "Nuh", &[DutyRole::RecitationCoach]));
    people.push(Person::new(13, "Salih", &[DutyRole::FridayPreacher]));
    people
}
