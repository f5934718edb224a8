// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use chipwatch_domain::{Account, Role};
use chipwatch_persistence::Persistence;
use tracing::debug;

use crate::error::AuthError;

/// An authenticated caller with an associated role.
///
/// The role is read from the account at authentication time, so a role
/// change takes effect on the caller's next request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The account the caller authenticated as.
    pub account_id: i64,
    /// The role assigned to that account.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `account_id` - The account the caller authenticated as
    /// * `role` - The role assigned to that account
    #[must_use]
    pub const fn new(account_id: i64, role: Role) -> Self {
        Self { account_id, role }
    }
}

/// Verifies credentials against stored accounts.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Authenticates an email and password pair.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The account email
    /// * `password` - The plain-text password
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials do not match an account or the
    /// lookup fails.
    pub fn authenticate(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedActor, AuthError> {
        let account: Account = persistence
            .verify_credentials(email, password)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid email or password"),
            })?;

        debug!(account_id = account.account_id, role = %account.role, "Authenticated");
        Ok(AuthenticatedActor::new(account.account_id, account.role))
    }
}

/// Authorization service for enforcing role-based access control.
///
/// Roles are totally ordered, so every check is a single comparison
/// against the minimum role an action needs.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the caller is authenticated and holds at least `required`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The caller, or `None` for an anonymous request
    /// * `required` - The minimum role for the action
    /// * `action` - The action name, used in the error
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for an anonymous caller and
    /// `Unauthorized` if the caller's role is too low.
    pub fn require_role<'a>(
        actor: Option<&'a AuthenticatedActor>,
        required: Role,
        action: &str,
    ) -> Result<&'a AuthenticatedActor, AuthError> {
        let actor: &AuthenticatedActor = actor.ok_or_else(|| AuthError::AuthenticationFailed {
            reason: String::from("Credentials required"),
        })?;

        if actor.role.satisfies(required) {
            Ok(actor)
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: required.to_string(),
            })
        }
    }

    /// Checks that the caller is anonymous.
    ///
    /// Self-registration is only offered to callers without an account.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the caller is authenticated.
    pub fn require_anonymous(
        actor: Option<&AuthenticatedActor>,
        action: &str,
    ) -> Result<(), AuthError> {
        match actor {
            None => Ok(()),
            Some(_) => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("anonymous"),
            }),
        }
    }

    /// Checks that the caller is acting on its own account or is an admin.
    ///
    /// # Arguments
    ///
    /// * `actor` - The caller, or `None` for an anonymous request
    /// * `account_id` - The account being changed
    /// * `action` - The action name, used in the error
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for an anonymous caller and
    /// `Unauthorized` for anyone else's account unless the caller is an
    /// admin.
    pub fn authorize_self_or_admin<'a>(
        actor: Option<&'a AuthenticatedActor>,
        account_id: i64,
        action: &str,
    ) -> Result<&'a AuthenticatedActor, AuthError> {
        let actor: &AuthenticatedActor = Self::require_role(actor, Role::User, action)?;
        if actor.account_id == account_id || actor.role == Role::Admin {
            Ok(actor)
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: Role::Admin.to_string(),
            })
        }
    }
}
