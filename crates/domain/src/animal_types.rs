// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::Animal;

/// Computes the type list of `animal` after adding `type_id`.
///
/// # Errors
///
/// Returns `DomainError::AnimalTypeAlreadyAssigned` if the animal already
/// carries the type.
pub fn plan_type_addition(animal: &Animal, type_id: i64) -> Result<Vec<i64>, DomainError> {
    if animal.has_type(type_id) {
        return Err(DomainError::AnimalTypeAlreadyAssigned {
            animal_id: animal.animal_id,
            type_id,
        });
    }

    let mut type_ids: Vec<i64> = animal.type_ids.clone();
    type_ids.push(type_id);
    Ok(type_ids)
}

/// Computes the type list of `animal` after swapping `old_type_id` for
/// `new_type_id`. The replacement keeps the position of the old type.
///
/// # Errors
///
/// Returns an error if:
/// - The animal does not carry `old_type_id`
/// - The animal already carries `new_type_id`
pub fn plan_type_replacement(
    animal: &Animal,
    old_type_id: i64,
    new_type_id: i64,
) -> Result<Vec<i64>, DomainError> {
    if !animal.has_type(old_type_id) {
        return Err(DomainError::AnimalTypeNotAssigned {
            animal_id: animal.animal_id,
            type_id: old_type_id,
        });
    }
    if animal.has_type(new_type_id) {
        return Err(DomainError::AnimalTypeAlreadyAssigned {
            animal_id: animal.animal_id,
            type_id: new_type_id,
        });
    }

    let type_ids: Vec<i64> = animal
        .type_ids
        .iter()
        .map(|&id| if id == old_type_id { new_type_id } else { id })
        .collect();
    Ok(type_ids)
}

/// Computes the type list of `animal` after removing `type_id`.
///
/// # Errors
///
/// Returns an error if:
/// - The animal does not carry `type_id`
/// - `type_id` is the animal's only type
pub fn plan_type_removal(animal: &Animal, type_id: i64) -> Result<Vec<i64>, DomainError> {
    if !animal.has_type(type_id) {
        return Err(DomainError::AnimalTypeNotAssigned {
            animal_id: animal.animal_id,
            type_id,
        });
    }
    // Rule: an animal always carries at least one type
    if animal.type_ids.len() == 1 {
        return Err(DomainError::LastAnimalType {
            animal_id: animal.animal_id,
            type_id,
        });
    }

    let type_ids: Vec<i64> = animal
        .type_ids
        .iter()
        .copied()
        .filter(|&id| id != type_id)
        .collect();
    Ok(type_ids)
}
