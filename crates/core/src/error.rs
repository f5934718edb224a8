// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::DomainError;

use crate::store::StoreError;

/// Errors that can occur while sequencing trail changes or computing
/// analytics.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The trail store failed.
    Store(StoreError),
    /// The animal kept changing underneath every attempt.
    ConcurrentModification {
        /// The contested animal.
        animal_id: i64,
        /// How many attempts were made.
        attempts: u32,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Store(err) => write!(f, "Store error: {err}"),
            Self::ConcurrentModification {
                animal_id,
                attempts,
            } => write!(
                f,
                "Animal {animal_id} was modified concurrently; gave up after {attempts} attempts"
            ),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
