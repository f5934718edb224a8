// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::{Coordinates, Location};
use diesel::SqliteConnection;
use diesel::dsl::exists;
use diesel::prelude::*;

use crate::data_models::LocationRow;
use crate::diesel_schema::{animals, locations, sightings};
use crate::error::PersistenceError;

/// Retrieves a location by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the location is not found.
pub fn get_location(
    conn: &mut SqliteConnection,
    location_id: i64,
) -> Result<Option<Location>, PersistenceError> {
    locations::table
        .filter(locations::location_id.eq(location_id))
        .select(LocationRow::as_select())
        .first(conn)
        .optional()?
        .map(LocationRow::into_location)
        .transpose()
}

/// Finds the location stored at exactly these coordinates.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_location(
    conn: &mut SqliteConnection,
    coordinates: &Coordinates,
) -> Result<Option<Location>, PersistenceError> {
    locations::table
        .filter(locations::latitude.eq(coordinates.latitude()))
        .filter(locations::longitude.eq(coordinates.longitude()))
        .select(LocationRow::as_select())
        .first(conn)
        .optional()?
        .map(LocationRow::into_location)
        .transpose()
}

/// Lists every location ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_locations(conn: &mut SqliteConnection) -> Result<Vec<Location>, PersistenceError> {
    let rows: Vec<LocationRow> = locations::table
        .select(LocationRow::as_select())
        .order(locations::location_id.asc())
        .load(conn)?;
    rows.into_iter().map(LocationRow::into_location).collect()
}

/// Returns whether an animal was chipped at, or sighted at, the location.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn is_location_referenced(
    conn: &mut SqliteConnection,
    location_id: i64,
) -> Result<bool, PersistenceError> {
    let chipped_here: bool = diesel::select(exists(
        animals::table.filter(animals::chipping_location_id.eq(location_id)),
    ))
    .get_result(conn)?;
    if chipped_here {
        return Ok(true);
    }

    Ok(diesel::select(exists(
        sightings::table.filter(sightings::location_id.eq(location_id)),
    ))
    .get_result(conn)?)
}
