// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{AccountFields, AnimalAttributes, NewAnimal};
use std::collections::HashSet;

/// Validates that a text field contains something other than whitespace.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if `value` is empty or blank.
pub fn validate_non_blank(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidField {
            field,
            reason: String::from("must not be blank"),
        });
    }
    Ok(())
}

/// Validates that a physical measurement is a positive finite number.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if `value` is zero, negative, NaN or
/// infinite.
pub fn validate_positive(field: &'static str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DomainError::InvalidField {
            field,
            reason: format!("must be a positive number, got {value}"),
        });
    }
    Ok(())
}

/// Validates that a referenced record id is positive.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if `id` is zero or negative.
pub fn validate_id(field: &'static str, id: i64) -> Result<(), DomainError> {
    if id <= 0 {
        return Err(DomainError::InvalidField {
            field,
            reason: format!("must be a positive id, got {id}"),
        });
    }
    Ok(())
}

fn is_dotted_word(part: &str) -> bool {
    !part.is_empty()
        && part
            .split('.')
            .all(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Validates the shape of an email address.
///
/// Both the local part and the domain are one or more ASCII alphanumeric
/// words joined by single dots.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if the address does not match.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let valid: bool = match email.split_once('@') {
        Some((local, domain)) => is_dotted_word(local) && is_dotted_word(domain),
        None => false,
    };
    if !valid {
        return Err(DomainError::InvalidField {
            field: "email",
            reason: format!("'{email}' is not a valid email address"),
        });
    }
    Ok(())
}

/// Validates a plain-text password before it is hashed.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if the password is blank.
pub fn validate_password(password: &str) -> Result<(), DomainError> {
    validate_non_blank("password", password)
}

/// Validates the editable fields of an account.
///
/// Does not check email uniqueness; that needs the store.
///
/// # Errors
///
/// Returns an error if a name is blank or the email is malformed.
pub fn validate_account_fields(fields: &AccountFields) -> Result<(), DomainError> {
    validate_non_blank("firstName", &fields.first_name)?;
    validate_non_blank("lastName", &fields.last_name)?;
    validate_email(&fields.email)?;
    Ok(())
}

fn validate_measurements(weight: f64, length: f64, height: f64) -> Result<(), DomainError> {
    validate_positive("weight", weight)?;
    validate_positive("length", length)?;
    validate_positive("height", height)?;
    Ok(())
}

/// Validates the payload for chipping a new animal.
///
/// # Errors
///
/// Returns an error if:
/// - No type is given
/// - A type id is listed twice (`DomainError::DuplicateAnimalType`)
/// - A measurement is not positive
/// - A referenced id is not positive
pub fn validate_new_animal(animal: &NewAnimal) -> Result<(), DomainError> {
    if animal.type_ids.is_empty() {
        return Err(DomainError::InvalidField {
            field: "animalTypes",
            reason: String::from("at least one animal type is required"),
        });
    }

    let mut seen: HashSet<i64> = HashSet::with_capacity(animal.type_ids.len());
    for &type_id in &animal.type_ids {
        validate_id("animalTypes", type_id)?;
        if !seen.insert(type_id) {
            return Err(DomainError::DuplicateAnimalType(type_id));
        }
    }

    validate_measurements(animal.weight, animal.length, animal.height)?;
    validate_id("chipperId", animal.chipper_id)?;
    validate_id("chippingLocationId", animal.chipping_location_id)?;
    Ok(())
}

/// Validates replacement attributes for an existing animal.
///
/// # Errors
///
/// Returns an error if a measurement or referenced id is not positive.
pub fn validate_animal_attributes(attributes: &AnimalAttributes) -> Result<(), DomainError> {
    validate_measurements(attributes.weight, attributes.length, attributes.height)?;
    validate_id("chipperId", attributes.chipper_id)?;
    validate_id("chippingLocationId", attributes.chipping_location_id)?;
    Ok(())
}
