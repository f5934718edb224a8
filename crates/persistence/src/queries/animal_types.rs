// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::AnimalType;
use diesel::SqliteConnection;
use diesel::dsl::exists;
use diesel::prelude::*;

use crate::data_models::AnimalTypeRow;
use crate::diesel_schema::{animal_type_links, animal_types};
use crate::error::PersistenceError;

/// Retrieves an animal type by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_animal_type(
    conn: &mut SqliteConnection,
    type_id: i64,
) -> Result<Option<AnimalType>, PersistenceError> {
    Ok(animal_types::table
        .filter(animal_types::type_id.eq(type_id))
        .select(AnimalTypeRow::as_select())
        .first(conn)
        .optional()?
        .map(AnimalType::from))
}

/// Lists every animal type ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_animal_types(
    conn: &mut SqliteConnection,
) -> Result<Vec<AnimalType>, PersistenceError> {
    let rows: Vec<AnimalTypeRow> = animal_types::table
        .select(AnimalTypeRow::as_select())
        .order(animal_types::type_id.asc())
        .load(conn)?;
    Ok(rows.into_iter().map(AnimalType::from).collect())
}

/// Returns whether any animal carries the type.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn is_animal_type_in_use(
    conn: &mut SqliteConnection,
    type_id: i64,
) -> Result<bool, PersistenceError> {
    Ok(diesel::select(exists(
        animal_type_links::table.filter(animal_type_links::type_id.eq(type_id)),
    ))
    .get_result(conn)?)
}
