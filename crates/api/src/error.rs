// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use chipwatch::{CoreError, StoreError};
use chipwatch_domain::DomainError;
use chipwatch_persistence::PersistenceError;

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
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request collides with existing state.
    Conflict {
        /// A human-readable description of the collision.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
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
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

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

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

fn not_found(resource_type: &str, err: &DomainError) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message: err.to_string(),
    }
}

fn rule(rule: &str, err: &DomainError) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: rule.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::InvalidField { field, reason } => ApiError::InvalidInput {
            field: (*field).to_string(),
            message: reason.clone(),
        },
        DomainError::InvalidRole(_) => ApiError::InvalidInput {
            field: String::from("role"),
            message: err.to_string(),
        },
        DomainError::InvalidGender(_) => ApiError::InvalidInput {
            field: String::from("gender"),
            message: err.to_string(),
        },
        DomainError::InvalidLifeStatus(_) => ApiError::InvalidInput {
            field: String::from("lifeStatus"),
            message: err.to_string(),
        },
        DomainError::InvalidLatitude(_) => ApiError::InvalidInput {
            field: String::from("latitude"),
            message: err.to_string(),
        },
        DomainError::InvalidLongitude(_) => ApiError::InvalidInput {
            field: String::from("longitude"),
            message: err.to_string(),
        },
        DomainError::InvalidPolygon(_) => ApiError::InvalidInput {
            field: String::from("areaPoints"),
            message: err.to_string(),
        },
        DomainError::AccountNotFound(_) => not_found("Account", &err),
        DomainError::AnimalNotFound(_) => not_found("Animal", &err),
        DomainError::AnimalTypeNotFound(_) | DomainError::AnimalTypeNotAssigned { .. } => {
            not_found("Animal type", &err)
        }
        DomainError::LocationNotFound(_) => not_found("Location", &err),
        DomainError::AreaNotFound(_) => not_found("Area", &err),
        DomainError::SightingNotFound { .. } => not_found("Visited location", &err),
        DomainError::AnimalTypeAlreadyAssigned { .. } | DomainError::DuplicateAnimalType(_) => {
            ApiError::Conflict {
                message: err.to_string(),
            }
        }
        DomainError::AreaConflict { .. } => rule("area_placement", &err),
        DomainError::LastAnimalType { .. } => rule("animal_keeps_a_type", &err),
        DomainError::AnimalDead(_) => rule("dead_animal_does_not_move", &err),
        DomainError::AnimalResurrection(_) => rule("death_is_final", &err),
        DomainError::RepeatingChippingLocation { .. }
        | DomainError::RepeatingLocation { .. }
        | DomainError::SameLocation { .. }
        | DomainError::RepeatsPreviousLocation { .. }
        | DomainError::RepeatsNextLocation { .. }
        | DomainError::ChippingLocationMatchesFirstSighting { .. } => {
            rule("no_consecutive_repeat", &err)
        }
        DomainError::AnimalHasSightings(_) => rule("animal_without_trail", &err),
        DomainError::LocationInUse(_)
        | DomainError::AnimalTypeInUse(_)
        | DomainError::AccountInUse(_) => rule("unreferenced_delete", &err),
    }
}

/// Translates a core error into an API error.
///
/// Store failures are internal; a lost optimistic race is a conflict the
/// caller may retry.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Store(StoreError::RevisionConflict { animal_id }) => ApiError::Conflict {
            message: format!("Animal {animal_id} was modified concurrently"),
        },
        CoreError::Store(StoreError::Backend(message)) => ApiError::Internal { message },
        CoreError::ConcurrentModification { .. } => ApiError::Conflict {
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Constraint violations surface as client errors; everything else is
/// internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::UniqueViolation(message) => ApiError::Conflict { message },
        PersistenceError::ForeignKeyViolation(message) => ApiError::DomainRuleViolation {
            rule: String::from("referential_integrity"),
            message,
        },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::RevisionConflict { animal_id } => ApiError::Conflict {
            message: format!("Animal {animal_id} was modified concurrently"),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
