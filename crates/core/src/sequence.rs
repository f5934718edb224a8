// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::{
    Animal, AnimalAttributes, DomainError, Sighting, Trail, apply_attributes,
    plan_type_addition, plan_type_removal, plan_type_replacement, validate_animal_attributes,
};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::command::{TrailCommand, TrailOutcome};
use crate::error::CoreError;
use crate::store::{StoreError, TrailStore};

/// How many times a command is re-validated after losing a revision race.
pub const MAX_MUTATION_ATTEMPTS: u32 = 3;

/// The single store write a validated command turns into.
#[derive(Debug, Clone, PartialEq)]
enum TrailMutation {
    CreateSighting {
        location_id: i64,
        visited_at: OffsetDateTime,
    },
    DeleteSightings(Vec<i64>),
    RelocateSighting {
        sighting_id: i64,
        location_id: i64,
    },
    UpdateAnimal(Animal),
    SetTypes(Vec<i64>),
}

/// Applies a command to one animal.
///
/// The animal and its trail are read, the command is validated against
/// them, and exactly one store mutation carrying the revision that was read
/// is issued. If another writer got there first the whole read-validate-write
/// cycle is repeated, up to [`MAX_MUTATION_ATTEMPTS`] times.
///
/// # Arguments
///
/// * `store` - The trail store
/// * `animal_id` - The animal the command targets
/// * `command` - The requested change
/// * `now` - Timestamp for new sightings and for a first death
///
/// # Errors
///
/// Returns an error if:
/// - A referenced record does not exist
/// - The command breaks a trail, life-status or type rule
/// - The animal changed concurrently on every attempt
/// - The store fails
pub fn apply<S: TrailStore>(
    store: &mut S,
    animal_id: i64,
    command: &TrailCommand,
    now: OffsetDateTime,
) -> Result<TrailOutcome, CoreError> {
    for attempt in 1..=MAX_MUTATION_ATTEMPTS {
        let animal: Animal = store
            .get_animal(animal_id)?
            .ok_or(DomainError::AnimalNotFound(animal_id))?;
        let sightings: Vec<Sighting> = store.get_trail(animal_id)?;
        let trail: Trail<'_> = Trail::new(&animal, sightings);

        let mutation: TrailMutation = match plan(store, &trail, command, now) {
            Ok(mutation) => mutation,
            Err(err) => {
                debug!(
                    animal_id,
                    command = command.name(),
                    error = %err,
                    "Trail command rejected"
                );
                return Err(err);
            }
        };

        match commit(store, animal_id, animal.revision, mutation) {
            Ok(outcome) => {
                info!(
                    animal_id,
                    command = command.name(),
                    attempt,
                    "Trail command applied"
                );
                return Ok(outcome);
            }
            Err(StoreError::RevisionConflict { .. }) => {
                warn!(
                    animal_id,
                    command = command.name(),
                    attempt,
                    "Revision conflict, retrying"
                );
            }
            Err(err) => return Err(CoreError::Store(err)),
        }
    }

    Err(CoreError::ConcurrentModification {
        animal_id,
        attempts: MAX_MUTATION_ATTEMPTS,
    })
}

fn plan<S: TrailStore>(
    store: &mut S,
    trail: &Trail<'_>,
    command: &TrailCommand,
    now: OffsetDateTime,
) -> Result<TrailMutation, CoreError> {
    let animal: &Animal = trail.animal();

    match command {
        TrailCommand::AddSighting { location_id } => {
            trail.check_append(*location_id)?;
            require_location(store, *location_id)?;
            Ok(TrailMutation::CreateSighting {
                location_id: *location_id,
                visited_at: now,
            })
        }
        TrailCommand::DeleteSighting { sighting_id } => {
            let doomed: Vec<i64> = trail.plan_removal(*sighting_id)?;
            Ok(TrailMutation::DeleteSightings(doomed))
        }
        TrailCommand::UpdateSighting {
            sighting_id,
            location_id,
        } => {
            let target: Sighting =
                store
                    .get_sighting(*sighting_id)?
                    .ok_or(DomainError::SightingNotFound {
                        animal_id: animal.animal_id,
                        sighting_id: *sighting_id,
                    })?;
            require_location(store, *location_id)?;
            trail.check_relocation(&target, *location_id)?;
            Ok(TrailMutation::RelocateSighting {
                sighting_id: *sighting_id,
                location_id: *location_id,
            })
        }
        TrailCommand::UpdateAnimal { attributes } => {
            plan_animal_update(store, trail, attributes, now)
        }
        TrailCommand::AddAnimalType { type_id } => {
            require_animal_type(store, *type_id)?;
            Ok(TrailMutation::SetTypes(plan_type_addition(
                animal, *type_id,
            )?))
        }
        TrailCommand::ReplaceAnimalType {
            old_type_id,
            new_type_id,
        } => {
            require_animal_type(store, *old_type_id)?;
            require_animal_type(store, *new_type_id)?;
            Ok(TrailMutation::SetTypes(plan_type_replacement(
                animal,
                *old_type_id,
                *new_type_id,
            )?))
        }
        TrailCommand::RemoveAnimalType { type_id } => {
            require_animal_type(store, *type_id)?;
            Ok(TrailMutation::SetTypes(plan_type_removal(animal, *type_id)?))
        }
    }
}

fn plan_animal_update<S: TrailStore>(
    store: &mut S,
    trail: &Trail<'_>,
    attributes: &AnimalAttributes,
    now: OffsetDateTime,
) -> Result<TrailMutation, CoreError> {
    validate_animal_attributes(attributes)?;
    if store.get_account(attributes.chipper_id)?.is_none() {
        return Err(DomainError::AccountNotFound(attributes.chipper_id).into());
    }
    require_location(store, attributes.chipping_location_id)?;
    trail.check_attributes(attributes)?;

    let updated: Animal = apply_attributes(trail.animal(), attributes, now);
    Ok(TrailMutation::UpdateAnimal(updated))
}

fn require_location<S: TrailStore>(store: &mut S, location_id: i64) -> Result<(), CoreError> {
    if store.get_location(location_id)?.is_none() {
        return Err(DomainError::LocationNotFound(location_id).into());
    }
    Ok(())
}

fn require_animal_type<S: TrailStore>(store: &mut S, type_id: i64) -> Result<(), CoreError> {
    if store.get_animal_type(type_id)?.is_none() {
        return Err(DomainError::AnimalTypeNotFound(type_id).into());
    }
    Ok(())
}

fn commit<S: TrailStore>(
    store: &mut S,
    animal_id: i64,
    expected_revision: i64,
    mutation: TrailMutation,
) -> Result<TrailOutcome, StoreError> {
    match mutation {
        TrailMutation::CreateSighting {
            location_id,
            visited_at,
        } => store
            .create_sighting(animal_id, location_id, visited_at, expected_revision)
            .map(TrailOutcome::SightingCreated),
        TrailMutation::DeleteSightings(sighting_ids) => {
            store.delete_sightings(animal_id, &sighting_ids, expected_revision)?;
            Ok(TrailOutcome::SightingsDeleted(sighting_ids))
        }
        TrailMutation::RelocateSighting {
            sighting_id,
            location_id,
        } => store
            .relocate_sighting(animal_id, sighting_id, location_id, expected_revision)
            .map(TrailOutcome::SightingRelocated),
        TrailMutation::UpdateAnimal(animal) => store
            .update_animal(&animal, expected_revision)
            .map(TrailOutcome::AnimalUpdated),
        TrailMutation::SetTypes(type_ids) => store
            .set_animal_types(animal_id, &type_ids, expected_revision)
            .map(TrailOutcome::AnimalUpdated),
    }
}
