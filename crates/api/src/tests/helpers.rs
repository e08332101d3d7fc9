// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use duty_roster_audit::Cause;
use duty_roster_persistence::Persistence;

use crate::{AuthenticatedActor, RegisterPersonRequest, Role, register_person};

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-123"), Role::Admin)
}

pub fn create_test_viewer() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("viewer-456"), Role::Viewer)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn setup_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Registers a person through the API and returns the new id.
pub fn register(persistence: &mut Persistence, name: &str, roles: &[&str]) -> i64 {
    let request = RegisterPersonRequest {
        display_name: String::from(name),
        roles: roles.iter().map(|role| String::from(*role)).collect(),
    };
    register_person(
        persistence,
        request,
        &create_test_admin(),
        create_test_cause(),
    )
    .expect("Failed to register person")
    .person_id
}

/// Five people holding both prayer roles, ids 1 through 5.
pub fn seed_prayer_staff(persistence: &mut Persistence) {
    for name in ["Ahmad", "Bilal", "Hasan", "Idris", "Yusuf"] {
        register(persistence, name, &["prayer_leader", "caller"]);
    }
}
