// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use duty_roster::{CoreError, OverrideRejection};
use duty_roster_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Another connection held the database lock past the busy timeout.
    DatabaseBusy(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// The requested event was not found.
    EventNotFound(i64),
    /// The requested person was not found.
    PersonNotFound(i64),
    /// A stored row could not be turned back into domain values.
    ReconstructionError(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A uniqueness constraint rejected a write.
    UniqueViolation(String),
    /// A foreign key constraint rejected a write.
    ForeignKeyViolation(String),
    /// A chunked insert failed; every earlier chunk was rolled back.
    ChunkFailed {
        /// The 1-based chunk that failed.
        chunk: usize,
        /// Total number of chunks in the insert.
        chunks: usize,
        /// Rows from earlier chunks discarded by the rollback.
        rows_rolled_back: usize,
        /// The underlying failure.
        cause: Box<Self>,
    },
    /// The scheduler refused the request.
    Planning(CoreError),
    /// A single override could not be applied.
    OverrideRejected(OverrideRejection),
    /// The requested resource was not found.
    NotFound(String),
}

impl PersistenceError {
    /// Returns whether this error, or the failure inside a chunked insert,
    /// is a uniqueness violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::UniqueViolation(_) => true,
            Self::ChunkFailed { cause, .. } => cause.is_unique_violation(),
            _ => false,
        }
    }

    /// Returns whether retrying the operation later may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::DatabaseBusy(_) | Self::DatabaseConnectionFailed(_) => true,
            Self::ChunkFailed { cause, .. } => cause.is_retryable(),
            _ => false,
        }
    }

    /// Returns whether a constraint attributable to the written values
    /// rejected the write.
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::UniqueViolation(_) | Self::ForeignKeyViolation(_) => true,
            Self::ChunkFailed { cause, .. } => cause.is_constraint_violation(),
            _ => false,
        }
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::DatabaseBusy(msg) => write!(f, "Database busy: {msg}"),
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::EventNotFound(id) => write!(f, "Event not found: {id}"),
            Self::PersonNotFound(id) => write!(f, "Person not found: {id}"),
            Self::ReconstructionError(msg) => write!(f, "Row reconstruction error: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::UniqueViolation(msg) => write!(f, "Uniqueness constraint violated: {msg}"),
            Self::ForeignKeyViolation(msg) => write!(f, "Foreign key constraint violated: {msg}"),
            Self::ChunkFailed {
                chunk,
                chunks,
                rows_rolled_back,
                cause,
            } => write!(
                f,
                "Insert chunk {chunk} of {chunks} failed ({rows_rolled_back} rows rolled back): {cause}"
            ),
            Self::Planning(err) => write!(f, "{err}"),
            Self::OverrideRejected(rejection) => write!(f, "Override rejected: {rejection}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::DatabaseErrorKind;

        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation(info.message().to_string())
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation(info.message().to_string())
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::Unknown, info)
                if is_lock_contention(info.message()) =>
            {
                Self::DatabaseBusy(info.message().to_string())
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

/// `SQLite` reports `SQLITE_BUSY` and `SQLITE_LOCKED` without a dedicated
/// Diesel error kind; only the message tells them apart.
fn is_lock_contention(message: &str) -> bool {
    message.contains("is locked") || message.contains("database is busy")
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<CoreError> for PersistenceError {
    fn from(err: CoreError) -> Self {
        Self::Planning(err)
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::Planning(CoreError::DomainViolation(err))
    }
}
