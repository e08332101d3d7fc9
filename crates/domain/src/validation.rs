// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::DutyRole;

const MAX_NAME_LENGTH: usize = 100;
const MAX_REASON_LENGTH: usize = 500;

/// Validates a person's display name.
///
/// # Errors
///
/// Returns an error if the name is blank or longer than 100 characters.
pub fn validate_display_name(name: &str) -> Result<(), DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::InvalidName(format!(
            "Name cannot exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates the role list of a person being registered.
///
/// # Errors
///
/// Returns an error if no role is given.
pub const fn validate_roles(roles: &[DutyRole]) -> Result<(), DomainError> {
    if roles.is_empty() {
        return Err(DomainError::NoRolesDeclared);
    }
    Ok(())
}

/// Validates the free-text reason attached to an availability declaration.
///
/// # Errors
///
/// Returns an error if the reason is longer than 500 characters.
pub fn validate_reason(reason: &str) -> Result<(), DomainError> {
    if reason.chars().count() > MAX_REASON_LENGTH {
        return Err(DomainError::InvalidReason(format!(
            "Reason cannot exceed {MAX_REASON_LENGTH} characters"
        )));
    }
    Ok(())
}
