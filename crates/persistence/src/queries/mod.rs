// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `audit`: Audit event queries
//! - `availability`: Declared availability
//! - `personnel`: The personnel directory
//! - `weekly`: The weekly prayer grid
//! - `monthly`: The monthly duty grid

pub mod audit;
pub mod availability;
pub mod monthly;
pub mod personnel;
pub mod weekly;

pub use audit::{get_audit_event, get_audit_timeline};
pub use availability::{is_available, list_availability};
pub use monthly::{
    count_monthly_duties, find_monthly_duty, list_monthly_duties, list_monthly_plans,
    list_slot_siblings,
};
pub use personnel::{find_person, list_eligible, list_personnel};
pub use weekly::{count_weekly_slots, find_weekly_slot, list_weekly_slots};
