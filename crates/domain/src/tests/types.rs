// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::date;
use crate::{
    DateRange, DomainError, DutyCategory, DutyRole, DutyType, Period, Person, Prayer,
    RosterGrid, SpecialDutyCalendar,
};
use std::str::FromStr;
use time::{Month, Weekday};

#[test]
fn test_duty_role_round_trips_through_storage_name() {
    for role in DutyRole::ALL {
        assert_eq!(DutyRole::from_str(role.as_str()).unwrap(), role);
    }
    assert_eq!(
        DutyRole::from_str("janitor"),
        Err(DomainError::InvalidDutyRole(String::from("janitor")))
    );
}

#[test]
fn test_duty_type_parsing() {
    assert_eq!(
        DutyType::from_str("maghrib").unwrap(),
        DutyType::Prayer(Prayer::Maghrib)
    );
    assert_eq!(
        DutyType::from_str("friday_leadership").unwrap(),
        DutyType::FridayLeadership
    );
    assert!(DutyType::from_str("tarawih").is_err());
}

#[test]
fn test_duty_type_required_roles() {
    assert_eq!(
        DutyType::Prayer(Prayer::Fajr).required_roles(),
        &[DutyRole::PrayerLeader, DutyRole::Caller]
    );
    assert_eq!(DutyType::Study.required_roles(), &[DutyRole::StudyLeader]);
    assert_eq!(
        DutyType::Coaching.required_roles(),
        &[DutyRole::RecitationCoach]
    );
    assert!(DutyType::FridayLeadership.carries(DutyRole::FridayPreacher));
    assert!(!DutyType::FridayLeadership.carries(DutyRole::PrayerLeader));
}

#[test]
fn test_prayers_share_one_category() {
    for prayer in Prayer::ALL {
        assert_eq!(DutyType::Prayer(prayer).category(), DutyCategory::Prayer);
    }
    assert_eq!(DutyType::Study.category(), DutyCategory::Study);
}

#[test]
fn test_duty_type_string_conversion_uses_storage_name() {
    assert_eq!(String::from(DutyType::Prayer(Prayer::Isha)), "isha");
    assert_eq!(
        DutyType::try_from(String::from("coaching")).unwrap(),
        DutyType::Coaching
    );
}

#[test]
fn test_person_eligibility_requires_active_and_role() {
    let mut person = Person::new(7, "Umar", &[DutyRole::Caller]);
    assert!(person.is_eligible_for(DutyRole::Caller));
    assert!(!person.is_eligible_for(DutyRole::PrayerLeader));

    person.is_active = false;
    assert!(!person.is_eligible_for(DutyRole::Caller));
}

#[test]
fn test_week_period_requires_anchor() {
    assert!(Period::week(date(2026, Month::February, 4)).is_ok());
    assert!(matches!(
        Period::week(date(2026, Month::February, 5)),
        Err(DomainError::InvalidWeekStart { .. })
    ));
}

#[test]
fn test_period_ranges() {
    let week = Period::week(date(2026, Month::February, 25)).unwrap();
    let range = week.range().unwrap();
    assert_eq!(range.start(), date(2026, Month::February, 25));
    assert_eq!(range.end(), date(2026, Month::March, 3));

    let month = Period::month(Month::April, 2026);
    let range = month.range().unwrap();
    assert_eq!(range.start(), date(2026, Month::April, 1));
    assert_eq!(range.end(), date(2026, Month::April, 30));
}

#[test]
fn test_period_display() {
    let week = Period::week(date(2026, Month::February, 4)).unwrap();
    assert_eq!(week.to_string(), "week 2026-W06 (2026-02-04)");
    assert_eq!(Period::month(Month::March, 2026).to_string(), "month 2026-03");
}

#[test]
fn test_date_range_validation() {
    let start = date(2026, Month::March, 10);
    let end = date(2026, Month::March, 1);
    assert_eq!(
        DateRange::new(start, end),
        Err(DomainError::InvalidDateRange { start, end })
    );

    let range = DateRange::new(end, start).unwrap();
    assert!(range.contains(date(2026, Month::March, 5)));
    assert!(!range.contains(date(2026, Month::March, 11)));
}

#[test]
fn test_special_duty_calendar_layout() {
    let calendar = SpecialDutyCalendar::new(vec![Weekday::Thursday], vec![Weekday::Friday]);

    // Thursday: five prayers plus study.
    let thursday = calendar.duties_on(date(2026, Month::February, 5));
    assert_eq!(thursday.len(), 6);
    assert_eq!(thursday[5], DutyType::Study);

    // Friday: five prayers, coaching, then Friday leadership.
    let friday = calendar.duties_on(date(2026, Month::February, 6));
    assert_eq!(
        &friday[5..],
        &[DutyType::Coaching, DutyType::FridayLeadership]
    );

    // Sunday: prayers only.
    assert_eq!(calendar.duties_on(date(2026, Month::February, 8)).len(), 5);
}

#[test]
fn test_roster_grid_parsing() {
    assert_eq!(RosterGrid::from_str("weekly").unwrap(), RosterGrid::Weekly);
    assert_eq!(RosterGrid::from_str("monthly").unwrap(), RosterGrid::Monthly);
    assert_eq!(
        RosterGrid::from_str("daily"),
        Err(DomainError::InvalidGrid(String::from("daily")))
    );
}
