// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use crate::mutations::monthly::insert_monthly_duties;
use crate::tests::{
    create_test_actor, create_test_cause, date, declare_unavailable, seed_full_staff,
    setup_persistence,
};
use crate::{MonthlyDutyRecord, Persistence, ReplicatedMonth};
use duty_roster::CoreError;
use duty_roster_domain::{
    DateRange, DutyRole, DutyType, MonthlyDutyPlan, Prayer, SpecialDutyCalendar,
};
use time::{Date, Month};

fn range(month: Month, first: u8, last: u8) -> DateRange {
    DateRange::new(date(2026, month, first), date(2026, month, last)).unwrap()
}

fn generate_april(persistence: &mut Persistence) {
    persistence
        .generate_month(
            Month::April,
            2026,
            &SpecialDutyCalendar::default(),
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();
}

fn replicate(
    persistence: &mut Persistence,
    month: Month,
) -> Result<ReplicatedMonth, PersistenceError> {
    persistence.replicate_first_week(month, 2026, create_test_actor(), create_test_cause())
}

fn person_on(
    rows: &[MonthlyDutyRecord],
    day: Date,
    duty_type: DutyType,
    role: DutyRole,
) -> Option<i64> {
    rows.iter()
        .find(|row| row.date == day && row.duty_type == duty_type && row.role == role)
        .and_then(|row| row.person_id)
}

#[test]
fn test_replication_rewrites_the_tail_of_april() {
    let mut persistence = setup_persistence();
    seed_full_staff(&mut persistence);
    generate_april(&mut persistence);

    let replicated: ReplicatedMonth = replicate(&mut persistence, Month::April).unwrap();

    // 23 tail days of five prayers, plus 4 study, 6 coaching, and 3 Friday slots.
    assert_eq!(replicated.plan.copied_count(), 128);
    assert_eq!(replicated.plan.rows.len(), 243);
    assert_eq!(replicated.plan.replaced_count, 243);
    assert_eq!(
        persistence
            .list_monthly_duties(&range(Month::April, 8, 30))
            .unwrap()
            .len(),
        243
    );
}

#[test]
fn test_replicated_rows_copy_the_matching_weekday() {
    let mut persistence = setup_persistence();
    seed_full_staff(&mut persistence);
    generate_april(&mut persistence);

    replicate(&mut persistence, Month::April).unwrap();
    let rows: Vec<MonthlyDutyRecord> = persistence
        .list_monthly_duties(&range(Month::April, 1, 30))
        .unwrap();

    let fajr = DutyType::Prayer(Prayer::Fajr);
    for (template_day, copies) in [(1, &[8, 15, 22, 29][..]), (3, &[10, 17, 24][..])] {
        let source: Date = date(2026, Month::April, template_day);
        for &copy in copies {
            let target: Date = date(2026, Month::April, copy);
            assert_eq!(
                person_on(&rows, target, fajr, DutyRole::PrayerLeader),
                person_on(&rows, source, fajr, DutyRole::PrayerLeader),
                "{target}"
            );
            assert_eq!(
                person_on(&rows, target, fajr, DutyRole::Caller),
                person_on(&rows, source, fajr, DutyRole::Caller),
                "{target}"
            );
        }
    }
    assert!(
        rows.iter()
            .filter(|row| row.date.day() >= 8)
            .all(|row| row.is_generated)
    );
}

#[test]
fn test_first_week_is_left_untouched() {
    let mut persistence = setup_persistence();
    seed_full_staff(&mut persistence);
    generate_april(&mut persistence);
    let before: Vec<MonthlyDutyRecord> = persistence
        .list_monthly_duties(&range(Month::April, 1, 7))
        .unwrap();

    replicate(&mut persistence, Month::April).unwrap();

    let after: Vec<MonthlyDutyRecord> = persistence
        .list_monthly_duties(&range(Month::April, 1, 7))
        .unwrap();
    assert_eq!(before.len(), 74);
    assert_eq!(before, after);
}

#[test]
fn test_missing_template_leaves_the_tail_in_place() {
    let mut persistence = setup_persistence();
    let stray: Vec<MonthlyDutyPlan> = vec![MonthlyDutyPlan {
        date: date(2026, Month::May, 15),
        duty_type: DutyType::Study,
        role: DutyRole::StudyLeader,
        person_id: None,
    }];
    insert_monthly_duties(&mut persistence.conn, &stray, Month::May, 2026, "seed").unwrap();

    let result = replicate(&mut persistence, Month::May);

    assert_eq!(
        result,
        Err(PersistenceError::Planning(CoreError::NoTemplate {
            month: 5,
            year: 2026,
        }))
    );
    assert_eq!(
        persistence
            .list_monthly_duties(&range(Month::May, 8, 31))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_replication_is_audited() {
    let mut persistence = setup_persistence();
    seed_full_staff(&mut persistence);
    generate_april(&mut persistence);

    let replicated: ReplicatedMonth = replicate(&mut persistence, Month::April).unwrap();
    let event = persistence.get_audit_event(replicated.event_id).unwrap();

    assert_eq!(event.action.name, "ReplicateFirstWeek");
    assert_eq!(event.scope, "month 2026-04");
    assert_eq!(event.before.data, "tail_rows=243");
}

#[test]
fn test_replication_skips_people_unavailable_on_the_new_date() {
    let mut persistence = setup_persistence();
    seed_full_staff(&mut persistence);
    generate_april(&mut persistence);
    declare_unavailable(
        &mut persistence,
        9,
        date(2026, Month::April, 17),
        DutyType::FridayLeadership,
    );

    let replicated: ReplicatedMonth = replicate(&mut persistence, Month::April).unwrap();
    let rows: Vec<MonthlyDutyRecord> = persistence
        .list_monthly_duties(&range(Month::April, 1, 30))
        .unwrap();

    assert_eq!(replicated.plan.vacated_count, 1);
    for (day, expected) in [(3, Some(9)), (10, Some(9)), (17, None), (24, Some(9))] {
        assert_eq!(
            person_on(
                &rows,
                date(2026, Month::April, day),
                DutyType::FridayLeadership,
                DutyRole::FridayPreacher
            ),
            expected,
            "April {day}"
        );
    }
    assert!(
        rows.iter()
            .any(|row| row.date == date(2026, Month::April, 17)
                && row.duty_type == DutyType::FridayLeadership)
    );
}
