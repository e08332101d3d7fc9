// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the duty roster scheduler.
//!
//! This crate stores the personnel directory, declared availability, both
//! roster grids, and the audit trail in `SQLite` through Diesel. Every
//! roster operation runs as one transaction: the planner from the core
//! crate reads through the transaction's connection, and the planned rows
//! are written together with their audit event or not at all.
//!
//! ## Storage
//!
//! - File databases run in WAL mode with a busy timeout so readers do not
//!   block the single writer.
//! - Foreign keys are enforced and verified at startup.
//! - Dates are stored as `YYYY-MM-DD` text and flags as `0`/`1`.
//! - Bulk inserts are split into statements of at most
//!   [`duty_roster::INSERT_CHUNK_SIZE`] rows.
//!
//! ## Testing Philosophy
//!
//! - Tests run against isolated shared in-memory databases
//! - Each call to [`Persistence::new_in_memory`] gets its own database
//! - Tests fail fast if the schema or pragmas are not as expected

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use duty_roster::{RawOverrideItem, TransitionResult};
use duty_roster_audit::{Actor, AuditEvent, Cause};
use duty_roster_domain::{DateRange, Person, RosterGrid, SpecialDutyCalendar};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, Month};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod source;

#[cfg(test)]
mod tests;

pub use data_models::{AvailabilityRecord, MonthlyDutyRecord, WeeklySlotRecord};
pub use error::PersistenceError;
pub use mutations::{
    AppliedBatch, AppliedOverride, GeneratedMonth, GeneratedWeek, PersistTransitionResult,
    ReplicatedMonth,
};

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the roster database.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    /// Persists an intake transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the referenced person does not exist or a write
    /// fails.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        mutations::persist_transition(&mut self.conn, result)
    }

    /// Generates and stores the weekly grid opened by `anchor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the week is already populated or generation fails.
    pub fn generate_week(
        &mut self,
        anchor: Date,
        actor: Actor,
        cause: Cause,
    ) -> Result<GeneratedWeek, PersistenceError> {
        mutations::generate_week(&mut self.conn, anchor, actor, cause)
    }

    /// Generates and stores a monthly grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the month is already populated or generation fails.
    pub fn generate_month(
        &mut self,
        month: Month,
        year: i32,
        calendar: &SpecialDutyCalendar,
        actor: Actor,
        cause: Cause,
    ) -> Result<GeneratedMonth, PersistenceError> {
        mutations::generate_month(&mut self.conn, month, year, calendar, actor, cause)
    }

    /// Copies the first week of a month over the rest of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the first week is empty or replication fails.
    pub fn replicate_first_week(
        &mut self,
        month: Month,
        year: i32,
        actor: Actor,
        cause: Cause,
    ) -> Result<ReplicatedMonth, PersistenceError> {
        mutations::replicate_first_week(&mut self.conn, month, year, actor, cause)
    }

    /// Applies a single override.
    ///
    /// # Errors
    ///
    /// Returns an error if the override is malformed, rejected, or fails to
    /// write.
    pub fn apply_override(
        &mut self,
        grid: RosterGrid,
        item: RawOverrideItem,
        actor: Actor,
        cause: Cause,
    ) -> Result<AppliedOverride, PersistenceError> {
        mutations::apply_override(&mut self.conn, grid, item, actor, cause)
    }

    /// Applies a batch of overrides, reporting the items that failed.
    ///
    /// # Errors
    ///
    /// Returns an error if any item is malformed or storage aborts the batch.
    pub fn apply_override_batch(
        &mut self,
        grid: RosterGrid,
        items: Vec<RawOverrideItem>,
        actor: Actor,
        cause: Cause,
    ) -> Result<AppliedBatch, PersistenceError> {
        mutations::apply_override_batch(&mut self.conn, grid, items, actor, cause)
    }

    /// Lists the weekly slots dated within `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_weekly_slots(
        &mut self,
        range: &DateRange,
    ) -> Result<Vec<WeeklySlotRecord>, PersistenceError> {
        queries::list_weekly_slots(&mut self.conn, range)
    }

    /// Lists the monthly rows dated within `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_monthly_duties(
        &mut self,
        range: &DateRange,
    ) -> Result<Vec<MonthlyDutyRecord>, PersistenceError> {
        queries::list_monthly_duties(&mut self.conn, range)
    }

    /// Lists every person in the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_personnel(&mut self) -> Result<Vec<Person>, PersistenceError> {
        queries::list_personnel(&mut self.conn)
    }

    /// Looks up a person.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_person(&mut self, person_id: i64) -> Result<Option<Person>, PersistenceError> {
        queries::find_person(&mut self.conn, person_id)
    }

    /// Lists availability declarations dated within `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_availability(
        &mut self,
        range: &DateRange,
    ) -> Result<Vec<AvailabilityRecord>, PersistenceError> {
        queries::list_availability(&mut self.conn, range)
    }

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::get_audit_event(&mut self.conn, event_id)
    }

    /// Retrieves audit events in recording order.
    ///
    /// # Arguments
    ///
    /// * `scope` - Only return events recorded against this scope
    /// * `after_event_id` - Only return events after this ID (exclusive)
    ///
    /// # Errors
    ///
    /// Returns an error if the events cannot be retrieved.
    pub fn get_audit_timeline(
        &mut self,
        scope: Option<&str>,
        after_event_id: Option<i64>,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::get_audit_timeline(&mut self.conn, scope, after_event_id)
    }
}
