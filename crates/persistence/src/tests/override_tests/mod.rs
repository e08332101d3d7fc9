// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for manual overrides on both grids.

use crate::error::PersistenceError;
use crate::tests::{
    create_test_actor, create_test_cause, date, seed_full_staff, setup_persistence,
};
use crate::{AppliedBatch, MonthlyDutyRecord, Persistence, WeeklySlotRecord};
use duty_roster::{AssignmentValue, CoreError, OverrideRejection, RawOverrideItem};
use duty_roster_domain::{
    DateRange, DutyRole, DutyType, Period, Prayer, RosterGrid, SpecialDutyCalendar,
};
use time::Month;

fn setup_week() -> (Persistence, Vec<WeeklySlotRecord>) {
    let mut persistence = setup_persistence();
    seed_full_staff(&mut persistence);
    let anchor = date(2026, Month::February, 4);
    persistence
        .generate_week(anchor, create_test_actor(), create_test_cause())
        .unwrap();
    let slots: Vec<WeeklySlotRecord> = persistence
        .list_weekly_slots(&Period::week(anchor).unwrap().range().unwrap())
        .unwrap();
    (persistence, slots)
}

fn setup_month() -> (Persistence, Vec<MonthlyDutyRecord>) {
    let mut persistence = setup_persistence();
    seed_full_staff(&mut persistence);
    persistence
        .generate_month(
            Month::February,
            2026,
            &SpecialDutyCalendar::default(),
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();
    let rows: Vec<MonthlyDutyRecord> = persistence
        .list_monthly_duties(&february())
        .unwrap();
    (persistence, rows)
}

fn february() -> DateRange {
    Period::month(Month::February, 2026).range().unwrap()
}

fn item(slot_id: i64, entries: &[(&str, AssignmentValue)]) -> RawOverrideItem {
    RawOverrideItem {
        slot_id: Some(slot_id),
        assignment: Some(
            entries
                .iter()
                .map(|(role, value)| ((*role).to_string(), Some(*value)))
                .collect(),
        ),
    }
}

fn weekly_slot(persistence: &mut Persistence, slot_id: i64) -> WeeklySlotRecord {
    crate::queries::find_weekly_slot(&mut persistence.conn, slot_id)
        .unwrap()
        .unwrap()
}

/// A prayer-staff member who is neither of the slot's current people.
fn free_person(slot: &WeeklySlotRecord) -> i64 {
    (1..=5)
        .find(|id| slot.prayer_leader != Some(*id) && slot.caller != Some(*id))
        .unwrap()
}

#[test]
fn test_weekly_override_replaces_caller() {
    let (mut persistence, slots) = setup_week();
    let slot: &WeeklySlotRecord = &slots[0];
    let replacement: i64 = free_person(slot);

    let applied = persistence
        .apply_override(
            RosterGrid::Weekly,
            item(slot.slot_id, &[("caller", AssignmentValue::Person(replacement))]),
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();

    let stored: WeeklySlotRecord = weekly_slot(&mut persistence, slot.slot_id);
    assert_eq!(stored.caller, Some(replacement));
    assert_eq!(stored.prayer_leader, slot.prayer_leader);
    assert!(!stored.is_generated);
    assert_eq!(stored.updated_by, "test-actor");
    assert_eq!(
        applied.after.roles.get(&DutyRole::Caller),
        Some(&Some(replacement))
    );

    let event = persistence.get_audit_event(applied.event_id).unwrap();
    assert_eq!(event.action.name, "ApplyOverride");
    assert_eq!(event.scope, "weekly overrides");
}

#[test]
fn test_weekly_override_can_vacate_a_role() {
    let (mut persistence, slots) = setup_week();
    let slot_id: i64 = slots[3].slot_id;

    persistence
        .apply_override(
            RosterGrid::Weekly,
            item(slot_id, &[("prayer_leader", AssignmentValue::Vacant)]),
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();

    assert_eq!(weekly_slot(&mut persistence, slot_id).prayer_leader, None);
}

#[test]
fn test_same_person_in_both_roles_is_rejected() {
    let (mut persistence, slots) = setup_week();
    let slot: &WeeklySlotRecord = &slots[0];
    let leader: i64 = slot.prayer_leader.unwrap();

    let result = persistence.apply_override(
        RosterGrid::Weekly,
        item(slot.slot_id, &[("caller", AssignmentValue::Person(leader))]),
        create_test_actor(),
        create_test_cause(),
    );

    assert_eq!(
        result,
        Err(PersistenceError::OverrideRejected(
            OverrideRejection::SamePersonInBothRoles { person_id: leader }
        ))
    );
    assert_eq!(weekly_slot(&mut persistence, slot.slot_id), slot.clone());
}

/// The leader and caller rows of Fajr on 1 February.
fn first_fajr_rows(rows: &[MonthlyDutyRecord]) -> (MonthlyDutyRecord, MonthlyDutyRecord) {
    let fajr = |role: DutyRole| {
        rows.iter()
            .find(|row| {
                row.date == date(2026, Month::February, 1)
                    && row.duty_type == DutyType::Prayer(Prayer::Fajr)
                    && row.role == role
            })
            .cloned()
            .unwrap()
    };
    (fajr(DutyRole::PrayerLeader), fajr(DutyRole::Caller))
}

fn monthly_row(persistence: &mut Persistence, duty_id: i64) -> MonthlyDutyRecord {
    crate::queries::find_monthly_duty(&mut persistence.conn, duty_id)
        .unwrap()
        .unwrap()
}

#[test]
fn test_monthly_caller_row_cannot_take_the_slot_leader() {
    let (mut persistence, rows) = setup_month();
    let (leader_row, caller_row) = first_fajr_rows(&rows);
    let leader: i64 = leader_row.person_id.unwrap();

    let result = persistence.apply_override(
        RosterGrid::Monthly,
        item(caller_row.duty_id, &[("caller", AssignmentValue::Person(leader))]),
        create_test_actor(),
        create_test_cause(),
    );

    assert_eq!(
        result,
        Err(PersistenceError::OverrideRejected(
            OverrideRejection::SamePersonInBothRoles { person_id: leader }
        ))
    );
    assert_eq!(monthly_row(&mut persistence, caller_row.duty_id), caller_row);
}

#[test]
fn test_monthly_batch_sees_earlier_items_of_the_same_slot() {
    let (mut persistence, rows) = setup_month();
    let (leader_row, caller_row) = first_fajr_rows(&rows);
    let newcomer: i64 = (1..=5)
        .find(|id| leader_row.person_id != Some(*id) && caller_row.person_id != Some(*id))
        .unwrap();

    let applied: AppliedBatch = persistence
        .apply_override_batch(
            RosterGrid::Monthly,
            vec![
                item(leader_row.duty_id, &[("prayer_leader", AssignmentValue::Person(newcomer))]),
                item(caller_row.duty_id, &[("caller", AssignmentValue::Person(newcomer))]),
            ],
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();

    assert_eq!(applied.outcome.success_count, 1);
    assert_eq!(
        applied.outcome.failures,
        vec![(
            caller_row.duty_id,
            OverrideRejection::SamePersonInBothRoles { person_id: newcomer }
        )]
    );
    assert_eq!(
        monthly_row(&mut persistence, leader_row.duty_id).person_id,
        Some(newcomer)
    );
    assert_eq!(
        monthly_row(&mut persistence, caller_row.duty_id).person_id,
        caller_row.person_id
    );
}

#[test]
fn test_monthly_special_rows_have_no_sibling_clash() {
    let (mut persistence, rows) = setup_month();
    let (leader_row, _) = first_fajr_rows(&rows);
    let coaching: &MonthlyDutyRecord = rows
        .iter()
        .find(|row| row.duty_type == DutyType::Coaching)
        .unwrap();
    let coach: i64 = (7..=8).find(|id| coaching.person_id != Some(*id)).unwrap();

    persistence
        .apply_override(
            RosterGrid::Monthly,
            item(coaching.duty_id, &[("recitation_coach", AssignmentValue::Person(coach))]),
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();

    assert_eq!(monthly_row(&mut persistence, coaching.duty_id).person_id, Some(coach));
    assert_eq!(monthly_row(&mut persistence, leader_row.duty_id), leader_row);
}

#[test]
fn test_unknown_slot_is_rejected() {
    let (mut persistence, _) = setup_week();

    let result = persistence.apply_override(
        RosterGrid::Weekly,
        item(9_999, &[("caller", AssignmentValue::Vacant)]),
        create_test_actor(),
        create_test_cause(),
    );

    assert_eq!(
        result,
        Err(PersistenceError::OverrideRejected(
            OverrideRejection::SlotNotFound { slot_id: 9_999 }
        ))
    );
}

#[test]
fn test_monthly_override_checks_the_row_role() {
    let (mut persistence, rows) = setup_month();
    let study: &MonthlyDutyRecord = rows
        .iter()
        .find(|row| row.duty_type == DutyType::Study)
        .unwrap();

    let result = persistence.apply_override(
        RosterGrid::Monthly,
        item(study.duty_id, &[("caller", AssignmentValue::Person(1))]),
        create_test_actor(),
        create_test_cause(),
    );

    assert_eq!(
        result,
        Err(PersistenceError::OverrideRejected(
            OverrideRejection::RoleNotApplicable {
                duty_type: DutyType::Study,
                role: DutyRole::Caller,
            }
        ))
    );
}

#[test]
fn test_monthly_override_requires_capability() {
    let (mut persistence, rows) = setup_month();
    let study: &MonthlyDutyRecord = rows
        .iter()
        .find(|row| row.duty_type == DutyType::Study)
        .unwrap();

    let result = persistence.apply_override(
        RosterGrid::Monthly,
        item(study.duty_id, &[("study_leader", AssignmentValue::Person(1))]),
        create_test_actor(),
        create_test_cause(),
    );

    assert_eq!(
        result,
        Err(PersistenceError::OverrideRejected(
            OverrideRejection::IneligiblePerson {
                person_id: 1,
                role: DutyRole::StudyLeader,
            }
        ))
    );
}

#[test]
fn test_monthly_override_with_unknown_person_is_rejected() {
    let (mut persistence, rows) = setup_month();

    let result = persistence.apply_override(
        RosterGrid::Monthly,
        item(rows[0].duty_id, &[(rows[0].role.as_str(), AssignmentValue::Person(404))]),
        create_test_actor(),
        create_test_cause(),
    );

    assert_eq!(
        result,
        Err(PersistenceError::OverrideRejected(
            OverrideRejection::UnknownPerson { person_id: 404 }
        ))
    );
}

#[test]
fn test_batch_reports_missing_slot_and_applies_the_rest() {
    let (mut persistence, rows) = setup_month();
    let fajr_callers: Vec<&MonthlyDutyRecord> = rows
        .iter()
        .filter(|row| {
            row.duty_type == DutyType::Prayer(Prayer::Fajr) && row.role == DutyRole::Caller
        })
        .collect();
    let first: i64 = fajr_callers[0].duty_id;
    let third: i64 = fajr_callers[1].duty_id;

    let applied: AppliedBatch = persistence
        .apply_override_batch(
            RosterGrid::Monthly,
            vec![
                item(first, &[("caller", AssignmentValue::Vacant)]),
                item(88_888, &[("caller", AssignmentValue::Vacant)]),
                item(third, &[("caller", AssignmentValue::Vacant)]),
            ],
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();

    assert_eq!(applied.outcome.success_count, 2);
    assert_eq!(applied.outcome.total_count, 3);
    assert_eq!(applied.outcome.failed_ids(), vec![88_888]);

    let stored: Vec<MonthlyDutyRecord> = persistence.list_monthly_duties(&february()).unwrap();
    for duty_id in [first, third] {
        let row: &MonthlyDutyRecord = stored.iter().find(|row| row.duty_id == duty_id).unwrap();
        assert_eq!(row.person_id, None);
        assert!(!row.is_generated);
    }

    let event = persistence.get_audit_event(applied.event_id).unwrap();
    assert_eq!(event.action.name, "ApplyOverrideBatch");
    assert_eq!(
        event.action.details.as_deref(),
        Some("Applied 2 of 3 monthly overrides; failed [88888]")
    );
}

#[test]
fn test_batch_rejection_leaves_its_slot_unchanged() {
    let (mut persistence, slots) = setup_week();
    let clashing: &WeeklySlotRecord = &slots[0];
    let leader: i64 = clashing.prayer_leader.unwrap();
    let vacated: i64 = slots[1].slot_id;

    let applied: AppliedBatch = persistence
        .apply_override_batch(
            RosterGrid::Weekly,
            vec![
                item(clashing.slot_id, &[("caller", AssignmentValue::Person(leader))]),
                item(vacated, &[("caller", AssignmentValue::Vacant)]),
            ],
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();

    assert_eq!(applied.outcome.success_count, 1);
    assert_eq!(
        applied.outcome.failures,
        vec![(
            clashing.slot_id,
            OverrideRejection::SamePersonInBothRoles { person_id: leader }
        )]
    );
    assert_eq!(weekly_slot(&mut persistence, clashing.slot_id), clashing.clone());
    assert_eq!(weekly_slot(&mut persistence, vacated).caller, None);
}

#[test]
fn test_malformed_batch_applies_nothing() {
    let (mut persistence, slots) = setup_week();

    let result = persistence.apply_override_batch(
        RosterGrid::Weekly,
        vec![
            item(slots[0].slot_id, &[("caller", AssignmentValue::Vacant)]),
            RawOverrideItem {
                slot_id: None,
                assignment: Some(vec![(String::from("caller"), Some(AssignmentValue::Vacant))]),
            },
        ],
        create_test_actor(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(PersistenceError::Planning(CoreError::InvalidOverride { index: 1, .. }))
    ));
    assert_eq!(weekly_slot(&mut persistence, slots[0].slot_id), slots[0]);
    assert!(
        persistence
            .get_audit_timeline(Some("weekly overrides"), None)
            .unwrap()
            .is_empty()
    );
}
