// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Generation, replication, and listing through the API.

use duty_roster_domain::SpecialDutyCalendar;

use crate::{
    ApiError, AuditTimelineQuery, DateRangeQuery, GenerateWeekRequest, MonthRequest,
    ResolveWeekQuery, generate_month, generate_week, get_audit_timeline, list_monthly_duties,
    list_weekly_slots, replicate_first_week, resolve_week,
};

use super::helpers::{
    create_test_admin, create_test_cause, seed_prayer_staff, setup_test_persistence,
};

fn week_request(week_start: &str) -> GenerateWeekRequest {
    GenerateWeekRequest {
        week_start: String::from(week_start),
    }
}

fn range(start: &str, end: &str) -> DateRangeQuery {
    DateRangeQuery {
        start: String::from(start),
        end: String::from(end),
    }
}

const FEBRUARY: MonthRequest = MonthRequest {
    month: 2,
    year: 2026,
};

#[test]
fn test_generate_week_reports_count_and_event() {
    let mut persistence = setup_test_persistence();
    seed_prayer_staff(&mut persistence);

    let response = generate_week(
        &mut persistence,
        &week_request("2026-02-04"),
        &create_test_admin(),
        create_test_cause(),
    )
    .expect("Generation should succeed");

    assert_eq!(response.count, 35);
    assert_eq!(response.vacancy_count, 0);
    assert_eq!(response.week_start, "2026-02-04");
    assert_eq!(response.week_number, 6);
    assert_eq!(response.week_year, 2026);

    let timeline = get_audit_timeline(
        &mut persistence,
        &AuditTimelineQuery {
            scope: Some(String::from("week 2026-W06 (2026-02-04)")),
            after: None,
        },
    )
    .expect("Timeline should load");
    assert_eq!(timeline.events.len(), 1);
    assert_eq!(timeline.events[0].event_id, response.event_id);
    assert_eq!(timeline.events[0].actor_id, "admin-123");
}

#[test]
fn test_generate_week_twice_is_already_generated() {
    let mut persistence = setup_test_persistence();
    seed_prayer_staff(&mut persistence);
    generate_week(
        &mut persistence,
        &week_request("2026-02-04"),
        &create_test_admin(),
        create_test_cause(),
    )
    .expect("First generation should succeed");

    let result = generate_week(
        &mut persistence,
        &week_request("2026-02-04"),
        &create_test_admin(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::AlreadyGenerated { existing: 35, .. })
    ));
    let slots = list_weekly_slots(&mut persistence, &range("2026-02-04", "2026-02-10"))
        .expect("Listing should succeed");
    assert_eq!(slots.slots.len(), 35);
}

#[test]
fn test_generate_week_rejects_non_anchor_date() {
    let mut persistence = setup_test_persistence();

    let result = generate_week(
        &mut persistence,
        &week_request("2026-02-05"),
        &create_test_admin(),
        create_test_cause(),
    );

    match result {
        Err(ApiError::ValidationError { field, .. }) => assert_eq!(field, "week_start"),
        other => panic!("Expected ValidationError, got {other:?}"),
    }
}

#[test]
fn test_generate_week_rejects_malformed_date() {
    let mut persistence = setup_test_persistence();

    let result = generate_week(
        &mut persistence,
        &week_request("04/02/2026"),
        &create_test_admin(),
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::ValidationError { .. })));
}

#[test]
fn test_list_weekly_slots_resolves_names_and_vacancies() {
    let mut persistence = setup_test_persistence();
    generate_week(
        &mut persistence,
        &week_request("2026-02-04"),
        &create_test_admin(),
        create_test_cause(),
    )
    .expect("Generation should succeed");

    let empty = list_weekly_slots(&mut persistence, &range("2026-02-04", "2026-02-04"))
        .expect("Listing should succeed");
    assert_eq!(empty.slots.len(), 5);
    assert!(
        empty
            .slots
            .iter()
            .all(|slot| slot.prayer_leader.is_none() && slot.caller.is_none())
    );
    assert_eq!(empty.slots[0].prayer, "fajr");
    assert!(empty.slots.iter().all(|slot| slot.is_generated));
}

#[test]
fn test_list_weekly_slots_includes_display_names() {
    let mut persistence = setup_test_persistence();
    seed_prayer_staff(&mut persistence);
    generate_week(
        &mut persistence,
        &week_request("2026-02-04"),
        &create_test_admin(),
        create_test_cause(),
    )
    .expect("Generation should succeed");

    let listed = list_weekly_slots(&mut persistence, &range("2026-02-04", "2026-02-10"))
        .expect("Listing should succeed");

    for slot in &listed.slots {
        let leader = slot.prayer_leader.as_ref().expect("Leader assigned");
        let caller = slot.caller.as_ref().expect("Caller assigned");
        assert!(!leader.display_name.is_empty());
        assert_ne!(leader.person_id, caller.person_id);
    }
}

#[test]
fn test_list_rejects_inverted_range() {
    let mut persistence = setup_test_persistence();

    let result = list_monthly_duties(&mut persistence, &range("2026-02-10", "2026-02-01"));

    assert!(matches!(result, Err(ApiError::ValidationError { .. })));
}

#[test]
fn test_generate_month_counts_by_duty_type() {
    let mut persistence = setup_test_persistence();
    seed_prayer_staff(&mut persistence);

    let response = generate_month(
        &mut persistence,
        &SpecialDutyCalendar::default(),
        FEBRUARY,
        &create_test_admin(),
        create_test_cause(),
    )
    .expect("Generation should succeed");

    assert_eq!(response.counts_by_duty_type.get("fajr"), Some(&28));
    assert_eq!(response.counts_by_duty_type.get("isha"), Some(&28));
    assert_eq!(
        response.counts_by_duty_type.get("friday_leadership"),
        Some(&4)
    );
    assert_eq!(response.counts_by_duty_type.get("study"), Some(&4));
    assert_eq!(response.counts_by_duty_type.get("coaching"), Some(&8));
    assert_eq!(response.slot_count, 156);
    // Nobody holds a special-duty role.
    assert_eq!(response.vacancy_count, 16);
}

#[test]
fn test_generate_month_rejects_bad_month() {
    let mut persistence = setup_test_persistence();

    let result = generate_month(
        &mut persistence,
        &SpecialDutyCalendar::default(),
        MonthRequest {
            month: 13,
            year: 2026,
        },
        &create_test_admin(),
        create_test_cause(),
    );

    match result {
        Err(ApiError::ValidationError { field, .. }) => assert_eq!(field, "month"),
        other => panic!("Expected ValidationError, got {other:?}"),
    }
}

#[test]
fn test_list_monthly_duties_includes_vacancies() {
    let mut persistence = setup_test_persistence();
    generate_month(
        &mut persistence,
        &SpecialDutyCalendar::default(),
        FEBRUARY,
        &create_test_admin(),
        create_test_cause(),
    )
    .expect("Generation should succeed");

    let listed = list_monthly_duties(&mut persistence, &range("2026-02-01", "2026-02-28"))
        .expect("Listing should succeed");

    assert_eq!(listed.duties.len(), 296);
    assert!(listed.duties.iter().all(|duty| duty.assignee.is_none()));
}

#[test]
fn test_replicate_first_week_reports_copied_and_deleted() {
    let mut persistence = setup_test_persistence();
    seed_prayer_staff(&mut persistence);
    let april = MonthRequest {
        month: 4,
        year: 2026,
    };
    generate_month(
        &mut persistence,
        &SpecialDutyCalendar::default(),
        april,
        &create_test_admin(),
        create_test_cause(),
    )
    .expect("Generation should succeed");

    let response = replicate_first_week(
        &mut persistence,
        april,
        &create_test_admin(),
        create_test_cause(),
    )
    .expect("Replication should succeed");

    assert_eq!(response.copied_count, 128);
    assert_eq!(response.deleted_count, 243);
    assert_eq!(response.vacated_count, 0);

    let first_friday = list_monthly_duties(&mut persistence, &range("2026-04-03", "2026-04-03"))
        .expect("Listing should succeed");
    let later_friday = list_monthly_duties(&mut persistence, &range("2026-04-24", "2026-04-24"))
        .expect("Listing should succeed");
    let assignees = |duties: &[crate::MonthlyDutyInfo]| -> Vec<Option<i64>> {
        duties
            .iter()
            .map(|duty| duty.assignee.as_ref().map(|a| a.person_id))
            .collect()
    };
    assert_eq!(
        assignees(&first_friday.duties),
        assignees(&later_friday.duties)
    );
    assert!(later_friday.duties.iter().all(|duty| duty.is_generated));
}

#[test]
fn test_replicate_without_template_is_no_template() {
    let mut persistence = setup_test_persistence();

    let result = replicate_first_week(
        &mut persistence,
        MonthRequest {
            month: 5,
            year: 2026,
        },
        &create_test_admin(),
        create_test_cause(),
    );

    assert_eq!(
        result,
        Err(ApiError::NoTemplate {
            month: 5,
            year: 2026
        })
    );
}

#[test]
fn test_resolve_week_goes_back_to_anchor() {
    let response = resolve_week(&ResolveWeekQuery {
        date: String::from("2026-02-08"),
    })
    .expect("Resolution should succeed");

    assert_eq!(response.week_start, "2026-02-04");
    assert_eq!(response.week_end, "2026-02-10");
    assert_eq!(response.dates.len(), 7);
}

#[test]
fn test_resolve_week_is_idempotent_on_anchor() {
    let response = resolve_week(&ResolveWeekQuery {
        date: String::from("2026-02-04"),
    })
    .expect("Resolution should succeed");

    assert_eq!(response.week_start, "2026-02-04");
}
