// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use crate::tests::{create_test_actor, create_test_cause, date, seed_full_staff, setup_persistence};
use crate::{GeneratedMonth, MonthlyDutyRecord, Persistence};
use duty_roster::CoreError;
use duty_roster_domain::{
    DateRange, DomainError, DutyCategory, DutyRole, DutyType, Period, SpecialDutyCalendar,
};
use time::{Month, Weekday};

fn february() -> DateRange {
    Period::month(Month::February, 2026).range().unwrap()
}

fn generate(
    persistence: &mut Persistence,
    month: Month,
    year: i32,
) -> Result<GeneratedMonth, PersistenceError> {
    persistence.generate_month(
        month,
        year,
        &SpecialDutyCalendar::default(),
        create_test_actor(),
        create_test_cause(),
    )
}

#[test]
fn test_february_2026_slot_counts() {
    let mut persistence = setup_persistence();
    seed_full_staff(&mut persistence);

    let generated: GeneratedMonth = generate(&mut persistence, Month::February, 2026).unwrap();

    assert_eq!(
        generated.generation.count_for_category(DutyCategory::Prayer),
        140
    );
    assert_eq!(
        generated.generation.counts.get(&DutyType::FridayLeadership),
        Some(&4)
    );
    assert_eq!(generated.generation.counts.get(&DutyType::Study), Some(&4));
    assert_eq!(generated.generation.counts.get(&DutyType::Coaching), Some(&8));
}

#[test]
fn test_generated_rows_are_stored_once_per_role() {
    let mut persistence = setup_persistence();
    seed_full_staff(&mut persistence);

    generate(&mut persistence, Month::February, 2026).unwrap();
    let stored: Vec<MonthlyDutyRecord> = persistence.list_monthly_duties(&february()).unwrap();

    // 140 prayer slots with two roles each, plus 16 single-role special slots.
    assert_eq!(stored.len(), 296);
    assert!(stored.iter().all(|row| row.period_month == 2 && row.period_year == 2026));
    assert!(stored.iter().all(|row| row.duty_type.carries(row.role)));
    assert!(
        stored
            .iter()
            .filter(|row| row.duty_type == DutyType::FridayLeadership)
            .all(|row| row.date.weekday() == Weekday::Friday && row.person_id == Some(9))
    );
}

#[test]
fn test_prayer_slots_never_pair_a_person_with_themselves() {
    let mut persistence = setup_persistence();
    seed_full_staff(&mut persistence);

    generate(&mut persistence, Month::February, 2026).unwrap();
    let stored: Vec<MonthlyDutyRecord> = persistence.list_monthly_duties(&february()).unwrap();

    for leader in stored
        .iter()
        .filter(|row| row.role == DutyRole::PrayerLeader)
    {
        let caller: &MonthlyDutyRecord = stored
            .iter()
            .find(|row| {
                row.date == leader.date
                    && row.duty_type == leader.duty_type
                    && row.role == DutyRole::Caller
            })
            .unwrap();
        assert_ne!(leader.person_id, caller.person_id, "{}", leader.date);
    }
}

#[test]
fn test_second_generation_is_refused() {
    let mut persistence = setup_persistence();
    seed_full_staff(&mut persistence);
    generate(&mut persistence, Month::February, 2026).unwrap();

    let result = generate(&mut persistence, Month::February, 2026);

    assert!(matches!(
        result,
        Err(PersistenceError::Planning(CoreError::AlreadyGenerated { existing: 296, .. }))
    ));
    assert_eq!(persistence.list_monthly_duties(&february()).unwrap().len(), 296);
}

#[test]
fn test_neighbouring_months_are_independent() {
    let mut persistence = setup_persistence();
    seed_full_staff(&mut persistence);
    generate(&mut persistence, Month::February, 2026).unwrap();

    assert!(generate(&mut persistence, Month::March, 2026).is_ok());
}

#[test]
fn test_out_of_range_year_is_rejected() {
    let mut persistence = setup_persistence();

    let result = generate(&mut persistence, Month::January, 1999);

    assert!(matches!(
        result,
        Err(PersistenceError::Planning(CoreError::DomainViolation(
            DomainError::InvalidYear(1999)
        )))
    ));
}

#[test]
fn test_missing_special_staff_leaves_vacancies() {
    let mut persistence = setup_persistence();
    crate::tests::seed_prayer_staff(&mut persistence);

    generate(&mut persistence, Month::February, 2026).unwrap();
    let stored: Vec<MonthlyDutyRecord> = persistence.list_monthly_duties(&february()).unwrap();

    assert!(
        stored
            .iter()
            .filter(|row| row.duty_type.category() != DutyCategory::Prayer)
            .all(|row| row.person_id.is_none())
    );
    assert_eq!(
        stored
            .iter()
            .find(|row| row.date == date(2026, Month::February, 6)
                && row.duty_type == DutyType::FridayLeadership)
            .map(|row| row.person_id),
        Some(None)
    );
}
