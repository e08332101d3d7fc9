// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::gateway::GatewayError;
use duty_roster_domain::DomainError;

/// Errors that can occur while planning roster changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The target period already holds roster rows.
    AlreadyGenerated {
        /// The period that was requested, e.g. `month 2026-03`.
        period: String,
        /// How many rows already exist in the period.
        existing: usize,
    },
    /// The first week of the month holds no rows to replicate.
    NoTemplate {
        /// The month number (1-12).
        month: u8,
        /// The year.
        year: i32,
    },
    /// A batch or single override request is malformed.
    InvalidOverride {
        /// Position of the offending item within the request (0-based).
        index: usize,
        /// Why the item was rejected.
        reason: String,
    },
    /// Personnel or availability data could not be read.
    DataUnavailable {
        /// Description of the failed lookup.
        detail: String,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::AlreadyGenerated { period, existing } => {
                write!(
                    f,
                    "Roster for {period} already exists ({existing} rows); refusing to regenerate"
                )
            }
            Self::NoTemplate { month, year } => {
                write!(
                    f,
                    "No template found in days 1-7 of {year}-{month:02}; generate the month first"
                )
            }
            Self::InvalidOverride { index, reason } => {
                write!(f, "Invalid override item {index}: {reason}")
            }
            Self::DataUnavailable { detail } => {
                write!(f, "Scheduling data unavailable: {detail}")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<GatewayError> for CoreError {
    fn from(err: GatewayError) -> Self {
        Self::DataUnavailable { detail: err.detail }
    }
}
