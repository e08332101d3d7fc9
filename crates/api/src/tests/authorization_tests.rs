// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authorization tests.
//!
//! Every mutating handler rejects viewers before touching storage; reads
//! need no role check.

use crate::{
    ApiError, AuditTimelineQuery, AuthError, DateRangeQuery, DeclareAvailabilityRequest,
    GenerateWeekRequest, MonthRequest, OverrideBatchRequest, OverrideItemRequest,
    OverrideRequest, RegisterPersonRequest, Role, SetPersonActiveRequest, apply_override,
    apply_override_batch, authenticate, declare_availability, generate_month, generate_week,
    get_audit_timeline, list_weekly_slots, register_person, replicate_first_week,
    set_person_active,
};
use duty_roster_domain::SpecialDutyCalendar;

use super::helpers::{
    create_test_admin, create_test_cause, create_test_viewer, register, setup_test_persistence,
};

fn assert_unauthorized<T: std::fmt::Debug>(result: Result<T, ApiError>, expected_action: &str) {
    match result {
        Err(ApiError::Unauthorized {
            action,
            required_role,
        }) => {
            assert_eq!(action, expected_action);
            assert_eq!(required_role, "Admin");
        }
        other => panic!("Expected Unauthorized, got {other:?}"),
    }
}

#[test]
fn test_generate_week_rejects_viewer() {
    let mut persistence = setup_test_persistence();

    let request = GenerateWeekRequest {
        week_start: String::from("2026-02-04"),
    };
    let result = generate_week(
        &mut persistence,
        &request,
        &create_test_viewer(),
        create_test_cause(),
    );

    assert_unauthorized(result, "generate_roster");
    let slots = list_weekly_slots(
        &mut persistence,
        &DateRangeQuery {
            start: String::from("2026-02-04"),
            end: String::from("2026-02-10"),
        },
    )
    .expect("Listing should succeed");
    assert!(slots.slots.is_empty());
}

#[test]
fn test_generate_month_and_replicate_reject_viewer() {
    let mut persistence = setup_test_persistence();
    let request = MonthRequest {
        month: 2,
        year: 2026,
    };

    assert_unauthorized(
        generate_month(
            &mut persistence,
            &SpecialDutyCalendar::default(),
            request,
            &create_test_viewer(),
            create_test_cause(),
        ),
        "generate_roster",
    );
    assert_unauthorized(
        replicate_first_week(
            &mut persistence,
            request,
            &create_test_viewer(),
            create_test_cause(),
        ),
        "generate_roster",
    );
}

#[test]
fn test_overrides_reject_viewer() {
    let mut persistence = setup_test_persistence();
    let item = OverrideItemRequest {
        slot_id: Some(1),
        assignment: Some(serde_json::Map::new()),
    };

    assert_unauthorized(
        apply_override(
            &mut persistence,
            OverrideRequest {
                grid: String::from("weekly"),
                item: item.clone(),
            },
            &create_test_viewer(),
            create_test_cause(),
        ),
        "override_slot",
    );
    assert_unauthorized(
        apply_override_batch(
            &mut persistence,
            OverrideBatchRequest {
                grid: String::from("weekly"),
                items: vec![item],
            },
            &create_test_viewer(),
            create_test_cause(),
        ),
        "override_slot",
    );
}

#[test]
fn test_personnel_changes_reject_viewer() {
    let mut persistence = setup_test_persistence();
    let person_id = register(&mut persistence, "Ahmad", &["caller"]);

    assert_unauthorized(
        register_person(
            &mut persistence,
            RegisterPersonRequest {
                display_name: String::from("Bilal"),
                roles: vec![String::from("caller")],
            },
            &create_test_viewer(),
            create_test_cause(),
        ),
        "manage_personnel",
    );
    assert_unauthorized(
        declare_availability(
            &mut persistence,
            DeclareAvailabilityRequest {
                person_id,
                date: String::from("2026-02-04"),
                duty_type: String::from("fajr"),
                is_available: false,
                reason: None,
            },
            &create_test_viewer(),
            create_test_cause(),
        ),
        "manage_personnel",
    );
    assert_unauthorized(
        set_person_active(
            &mut persistence,
            SetPersonActiveRequest {
                person_id,
                is_active: false,
            },
            &create_test_viewer(),
            create_test_cause(),
        ),
        "manage_personnel",
    );

    // Only the admin registration was recorded.
    let timeline = get_audit_timeline(&mut persistence, &AuditTimelineQuery::default())
        .expect("Timeline should load");
    assert_eq!(timeline.events.len(), 1);
}

#[test]
fn test_admin_passes_role_check() {
    let mut persistence = setup_test_persistence();
    let request = GenerateWeekRequest {
        week_start: String::from("2026-02-04"),
    };

    let result = generate_week(
        &mut persistence,
        &request,
        &create_test_admin(),
        create_test_cause(),
    );

    assert!(result.is_ok());
}

#[test]
fn test_authenticate_parses_role() {
    let actor = authenticate("  ops-1 ", "Admin").expect("Should authenticate");
    assert_eq!(actor.id, "ops-1");
    assert_eq!(actor.role, Role::Admin);

    let viewer = authenticate("ops-2", "viewer").expect("Should authenticate");
    assert_eq!(viewer.role, Role::Viewer);
    assert_eq!(viewer.to_audit_actor().actor_type, "viewer");
}

#[test]
fn test_authenticate_rejects_blank_id_and_unknown_role() {
    assert!(matches!(
        authenticate("   ", "admin"),
        Err(AuthError::AuthenticationFailed { .. })
    ));
    assert!(matches!(
        authenticate("ops-1", "superuser"),
        Err(AuthError::AuthenticationFailed { .. })
    ));
}
