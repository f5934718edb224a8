// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::AnimalType;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::animal_types;
use crate::error::PersistenceError;

/// Creates an animal type.
///
/// # Errors
///
/// Returns an error if the name is already taken.
pub fn create_animal_type(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<AnimalType, PersistenceError> {
    diesel::insert_into(animal_types::table)
        .values(animal_types::name.eq(name))
        .execute(conn)?;

    let type_id: i64 = conn.get_last_insert_rowid()?;
    info!(type_id, name, "Animal type created");

    Ok(AnimalType {
        type_id,
        name: name.to_string(),
    })
}

/// Renames an animal type.
///
/// # Errors
///
/// Returns an error if the type does not exist or the name is taken.
pub fn update_animal_type(
    conn: &mut SqliteConnection,
    type_id: i64,
    name: &str,
) -> Result<AnimalType, PersistenceError> {
    let updated: usize = diesel::update(animal_types::table)
        .filter(animal_types::type_id.eq(type_id))
        .set(animal_types::name.eq(name))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Animal type {type_id}")));
    }

    info!(type_id, name, "Animal type renamed");
    Ok(AnimalType {
        type_id,
        name: name.to_string(),
    })
}

/// Deletes an animal type.
///
/// # Errors
///
/// Returns an error if the type does not exist or is still assigned.
pub fn delete_animal_type(conn: &mut SqliteConnection, type_id: i64) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(animal_types::table)
        .filter(animal_types::type_id.eq(type_id))
        .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!("Animal type {type_id}")));
    }

    info!(type_id, "Animal type deleted");
    Ok(())
}
