// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! Identity is established by the caller's session layer; this module only
//! turns the asserted identity into an [`AuthenticatedActor`] and checks its
//! role before any roster mutation.

use duty_roster_audit::Actor;

use crate::error::AuthError;

/// Actor roles for authorization.
///
/// Roles apply to the operators driving the scheduler, never to the people
/// being rostered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: may generate, replicate, override, and maintain personnel.
    Admin,
    /// Viewer role: read-only access to rosters, personnel, and the audit trail.
    Viewer,
}

impl Role {
    /// Converts this role to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Viewer => "viewer",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            other => Err(AuthError::AuthenticationFailed {
                reason: format!("Unknown role '{other}'"),
            }),
        }
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into an audit Actor.
    ///
    /// The actor id is also written to the `created_by`/`updated_by` columns
    /// of every roster row it touches.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), String::from(self.role.as_str()))
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor is authorized to generate or replicate a roster.
    ///
    /// Only Admin actors may generate rosters.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_generate(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "generate_roster")
    }

    /// Checks if an actor is authorized to override roster slots.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_override(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "override_slot")
    }

    /// Checks if an actor is authorized to register people and record
    /// their availability.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_personnel(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "manage_personnel")
    }

    fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Viewer => Err(AuthError::Unauthorized {
                action: String::from(action),
                required_role: String::from("Admin"),
            }),
        }
    }
}

/// Builds an authenticated actor from the identity asserted by the session
/// layer.
///
/// # Errors
///
/// Returns an error if the actor id is blank or the role is unknown.
pub fn authenticate(actor_id: &str, role: &str) -> Result<AuthenticatedActor, AuthError> {
    let actor_id: &str = actor_id.trim();
    if actor_id.is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        });
    }
    let role: Role = role.parse()?;
    Ok(AuthenticatedActor::new(actor_id.to_string(), role))
}
