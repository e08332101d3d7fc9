// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other persistence test also opens an in-memory database, so
//! connection setup, migrations, and foreign key enforcement are exercised
//! throughout. The tests here pin the properties directly.

use crate::Persistence;
use crate::tests::{register, setup_persistence};
use duty_roster_domain::DutyRole;

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, crate::error::PersistenceError> =
        Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = setup_persistence();
    let mut db2 = setup_persistence();

    register(&mut db1, "Ahmad", &[DutyRole::PrayerLeader]);

    assert_eq!(db1.list_personnel().unwrap().len(), 1);
    assert_eq!(
        db2.list_personnel().unwrap().len(),
        0,
        "db2 should not see db1's directory"
    );
}

#[test]
fn test_migrations_applied_on_initialization() {
    let mut persistence = setup_persistence();

    assert!(
        persistence.get_audit_timeline(None, None).is_ok(),
        "Migrations must have applied for audit_events to exist"
    );
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence = setup_persistence();

    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_file_database_survives_reopen() {
    let path = std::env::temp_dir().join(format!(
        "duty_roster_init_test_{}.sqlite",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let mut persistence = Persistence::new_with_file(&path).unwrap();
    register(&mut persistence, "Ahmad", &[DutyRole::Caller]);
    drop(persistence);

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.list_personnel().unwrap().len(), 1);
    drop(reopened);

    for suffix in ["", "-wal", "-shm"] {
        let mut leftover = path.clone().into_os_string();
        leftover.push(suffix);
        let _ = std::fs::remove_file(leftover);
    }
}
