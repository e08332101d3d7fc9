// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Roster planning.
//!
//! Everything here is computed in memory from the inputs it is handed: the
//! number of rows already stored, a personnel directory, and an availability
//! gateway. Persistence decides the transaction boundaries and writes the
//! planned rows together with the accompanying audit event.

mod apply;
mod command;
mod error;
mod gateway;
mod monthly;
mod overrides;
mod replicate;
mod state;
mod weekly;

#[cfg(test)]
mod tests;

pub use apply::apply;
pub use command::Command;
pub use error::CoreError;
pub use gateway::{AvailabilityGateway, GatewayError, PersonnelDirectory};
pub use monthly::plan_month;
pub use overrides::{
    AssignmentValue, BatchOutcome, OverrideItem, OverrideRejection, RawOverrideItem,
    SlotAssignment, VACANT, batch_audit_event, override_audit_event, resolve_override,
    validate_override_batch, validate_override_item,
};
pub use replicate::plan_replication;
pub use state::{MonthlyGeneration, ReplicationPlan, TransitionResult, WeeklyGeneration};
pub use weekly::plan_week;

/// Maximum number of rows written by a single insert statement.
pub const INSERT_CHUNK_SIZE: usize = 100;
