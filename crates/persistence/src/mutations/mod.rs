// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the persistence
//! layer. Mutations use Diesel DSL; the one backend helper they need,
//! `last_insert_rowid()`, comes through the `PersistenceBackend` trait.
//!
//! ## Module Organization
//!
//! - `audit`: Audit event persistence
//! - `personnel`, `availability`: Directory and availability writes
//! - `weekly`, `monthly`: Grid inserts, deletes, and assignment updates
//! - `chunked`: Bulk inserts split into bounded statements
//! - `roster`: Generation, replication, and override orchestration
//! - `transition`: Intake command orchestration

pub mod audit;
pub mod availability;
pub mod chunked;
pub mod monthly;
pub mod personnel;
pub mod roster;
pub mod transition;
pub mod weekly;

pub use audit::persist_audit_event;
pub use roster::{
    AppliedBatch, AppliedOverride, GeneratedMonth, GeneratedWeek, ReplicatedMonth,
    apply_override, apply_override_batch, generate_month, generate_week, replicate_first_week,
};
pub use transition::{PersistTransitionResult, persist_transition};
