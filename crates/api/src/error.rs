// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use duty_roster::{CoreError, OverrideRejection};
use duty_roster_domain::DomainError;
use duty_roster_persistence::PersistenceError;
use thiserror::Error;
use tracing::error;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// The request is malformed or breaks a roster rule.
    #[error("Invalid input for field '{field}': {message}")]
    ValidationError {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The period already holds roster rows.
    #[error("Roster for {period} already exists ({existing} rows)")]
    AlreadyGenerated {
        /// The requested period.
        period: String,
        /// How many rows already exist.
        existing: usize,
    },
    /// Days 1-7 of the month hold nothing to replicate.
    #[error("No first-week template for {year}-{month:02}")]
    NoTemplate {
        /// The month number.
        month: u8,
        /// The year.
        year: i32,
    },
    /// Storage refused the write on a uniqueness or reference constraint.
    #[error("Storage conflict: {message}")]
    StorageConflict {
        /// A description of the conflict.
        message: String,
    },
    /// Personnel, availability, or storage could not be reached; retryable.
    #[error("Data unavailable: {message}")]
    DataUnavailable {
        /// A description of the failed lookup.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

fn invalid(field: &str, message: String) -> ApiError {
    ApiError::ValidationError {
        field: field.to_string(),
        message,
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidWeekStart { .. } => invalid("week_start", message),
        DomainError::DateArithmeticOverflow { .. }
        | DomainError::DateParseError { .. }
        | DomainError::InvalidDateRange { .. } => invalid("date", message),
        DomainError::InvalidMonth(_) => invalid("month", message),
        DomainError::InvalidYear(_) => invalid("year", message),
        DomainError::InvalidDutyRole(_)
        | DomainError::NoRolesDeclared
        | DomainError::RoleNotApplicable { .. } => invalid("role", message),
        DomainError::InvalidDutyType(_) => invalid("duty_type", message),
        DomainError::InvalidWeekday(_) => invalid("weekday", message),
        DomainError::InvalidGrid(_) => invalid("grid", message),
        DomainError::InvalidName(_) => invalid("display_name", message),
        DomainError::InvalidReason(_) => invalid("reason", message),
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::AlreadyGenerated { period, existing } => {
            ApiError::AlreadyGenerated { period, existing }
        }
        CoreError::NoTemplate { month, year } => ApiError::NoTemplate { month, year },
        CoreError::InvalidOverride { index, reason } => {
            invalid(&format!("items[{index}]"), reason)
        }
        CoreError::DataUnavailable { detail } => ApiError::DataUnavailable { message: detail },
    }
}

/// Translates a rejected override into an API error.
#[must_use]
pub fn translate_override_rejection(rejection: OverrideRejection) -> ApiError {
    let message: String = rejection.to_string();
    match rejection {
        OverrideRejection::SlotNotFound { .. } => ApiError::ResourceNotFound {
            resource_type: String::from("Slot"),
            message,
        },
        OverrideRejection::StorageConflict { .. } => ApiError::StorageConflict { message },
        OverrideRejection::RoleNotApplicable { .. }
        | OverrideRejection::UnknownPerson { .. }
        | OverrideRejection::IneligiblePerson { .. }
        | OverrideRejection::SamePersonInBothRoles { .. } => invalid("assignment", message),
    }
}

/// Translates a persistence error into an API error.
///
/// Constraint violations become [`ApiError::StorageConflict`] and lock
/// contention becomes [`ApiError::DataUnavailable`]; other failures that are
/// not the caller's fault are logged and reported as internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    if err.is_constraint_violation() {
        return ApiError::StorageConflict {
            message: err.to_string(),
        };
    }

    match err {
        PersistenceError::Planning(core_err) => translate_core_error(core_err),
        PersistenceError::OverrideRejected(rejection) => translate_override_rejection(rejection),
        PersistenceError::PersonNotFound(person_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Person"),
            message: format!("Person {person_id} does not exist"),
        },
        PersistenceError::EventNotFound(event_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Audit event"),
            message: format!("Event {event_id} does not exist"),
        },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::DatabaseConnectionFailed(message)
        | PersistenceError::DatabaseBusy(message) => ApiError::DataUnavailable { message },
        other if other.is_retryable() => ApiError::DataUnavailable {
            message: other.to_string(),
        },
        other => {
            error!(error = %other, "Unexpected persistence failure");
            ApiError::Internal {
                message: other.to_string(),
            }
        }
    }
}
