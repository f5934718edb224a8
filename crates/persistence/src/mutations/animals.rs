// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::{Animal, LifeStatus, NewAnimal};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{animal_type_links, animals};
use crate::error::PersistenceError;
use crate::queries;
use crate::timestamps;

/// Bumps the animal's revision if it still equals `expected_revision`.
///
/// Must run inside the transaction that performs the guarded write.
///
/// # Errors
///
/// Returns `RevisionConflict` if another writer advanced the revision, or
/// an error if the update fails.
pub fn claim_revision(
    conn: &mut SqliteConnection,
    animal_id: i64,
    expected_revision: i64,
) -> Result<(), PersistenceError> {
    let claimed: usize = diesel::update(animals::table)
        .filter(animals::animal_id.eq(animal_id))
        .filter(animals::revision.eq(expected_revision))
        .set(animals::revision.eq(animals::revision + 1))
        .execute(conn)?;

    if claimed == 0 {
        warn!(animal_id, expected_revision, "Revision claim lost");
        return Err(PersistenceError::RevisionConflict { animal_id });
    }

    debug!(animal_id, expected_revision, "Revision claimed");
    Ok(())
}

/// Chips a new animal: inserts the animal alive, chipped at `now`, with its
/// types in the given order.
///
/// # Errors
///
/// Returns an error if a referenced account, location or type is missing.
pub fn create_animal(
    conn: &mut SqliteConnection,
    animal: &NewAnimal,
    now: OffsetDateTime,
) -> Result<Animal, PersistenceError> {
    let chipped_at: OffsetDateTime = timestamps::truncate(now);
    let chipped_at_text: String = timestamps::encode(chipped_at)?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(animals::table)
            .values((
                animals::weight.eq(animal.weight),
                animals::length.eq(animal.length),
                animals::height.eq(animal.height),
                animals::gender.eq(animal.gender.as_str()),
                animals::life_status.eq(LifeStatus::Alive.as_str()),
                animals::chipping_date_time.eq(&chipped_at_text),
                animals::chipper_id.eq(animal.chipper_id),
                animals::chipping_location_id.eq(animal.chipping_location_id),
            ))
            .execute(conn)?;
        let animal_id: i64 = conn.get_last_insert_rowid()?;

        insert_type_links(conn, animal_id, &animal.type_ids)?;

        info!(
            animal_id,
            chipper_id = animal.chipper_id,
            chipping_location_id = animal.chipping_location_id,
            "Animal chipped"
        );

        Ok(Animal {
            animal_id,
            type_ids: animal.type_ids.clone(),
            weight: animal.weight,
            length: animal.length,
            height: animal.height,
            gender: animal.gender,
            life_status: LifeStatus::Alive,
            chipping_date_time: chipped_at,
            chipper_id: animal.chipper_id,
            chipping_location_id: animal.chipping_location_id,
            death_date_time: None,
            revision: 0,
        })
    })
}

/// Writes the animal's attributes under the revision guard. Type links
/// are left untouched.
///
/// # Errors
///
/// Returns `RevisionConflict` on a lost race, or an error if the update
/// fails.
pub fn update_animal(
    conn: &mut SqliteConnection,
    animal: &Animal,
    expected_revision: i64,
) -> Result<Animal, PersistenceError> {
    let death_date_time: Option<String> =
        animal.death_date_time.map(timestamps::encode).transpose()?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        claim_revision(conn, animal.animal_id, expected_revision)?;

        diesel::update(animals::table)
            .filter(animals::animal_id.eq(animal.animal_id))
            .set((
                animals::weight.eq(animal.weight),
                animals::length.eq(animal.length),
                animals::height.eq(animal.height),
                animals::gender.eq(animal.gender.as_str()),
                animals::life_status.eq(animal.life_status.as_str()),
                animals::chipper_id.eq(animal.chipper_id),
                animals::chipping_location_id.eq(animal.chipping_location_id),
                animals::death_date_time.eq(&death_date_time),
            ))
            .execute(conn)?;

        reload(conn, animal.animal_id)
    })
}

/// Replaces the animal's type list under the revision guard.
///
/// # Errors
///
/// Returns `RevisionConflict` on a lost race, or an error if a type is
/// missing.
pub fn set_animal_types(
    conn: &mut SqliteConnection,
    animal_id: i64,
    type_ids: &[i64],
    expected_revision: i64,
) -> Result<Animal, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        claim_revision(conn, animal_id, expected_revision)?;

        diesel::delete(animal_type_links::table)
            .filter(animal_type_links::animal_id.eq(animal_id))
            .execute(conn)?;
        insert_type_links(conn, animal_id, type_ids)?;

        info!(animal_id, types = type_ids.len(), "Animal types replaced");
        reload(conn, animal_id)
    })
}

/// Deletes an animal under the revision guard. Type links cascade.
///
/// # Errors
///
/// Returns `RevisionConflict` on a lost race, or an error if sightings
/// still reference the animal.
pub fn delete_animal(
    conn: &mut SqliteConnection,
    animal_id: i64,
    expected_revision: i64,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        claim_revision(conn, animal_id, expected_revision)?;

        diesel::delete(animals::table)
            .filter(animals::animal_id.eq(animal_id))
            .execute(conn)?;

        info!(animal_id, "Animal deleted");
        Ok(())
    })
}

fn insert_type_links(
    conn: &mut SqliteConnection,
    animal_id: i64,
    type_ids: &[i64],
) -> Result<(), PersistenceError> {
    for (position, type_id) in (0_i32..).zip(type_ids) {
        diesel::insert_into(animal_type_links::table)
            .values((
                animal_type_links::animal_id.eq(animal_id),
                animal_type_links::type_id.eq(type_id),
                animal_type_links::position.eq(position),
            ))
            .execute(conn)?;
    }
    Ok(())
}

fn reload(conn: &mut SqliteConnection, animal_id: i64) -> Result<Animal, PersistenceError> {
    queries::animals::get_animal(conn, animal_id)?
        .ok_or_else(|| PersistenceError::NotFound(format!("Animal {animal_id}")))
}
