// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::{Coordinates, Location};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::locations;
use crate::error::PersistenceError;

/// Stores a new location.
///
/// # Errors
///
/// Returns an error if a location already exists at these coordinates.
pub fn create_location(
    conn: &mut SqliteConnection,
    coordinates: Coordinates,
) -> Result<Location, PersistenceError> {
    diesel::insert_into(locations::table)
        .values((
            locations::latitude.eq(coordinates.latitude()),
            locations::longitude.eq(coordinates.longitude()),
        ))
        .execute(conn)?;

    let location_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        location_id,
        latitude = coordinates.latitude(),
        longitude = coordinates.longitude(),
        "Location created"
    );

    Ok(Location {
        location_id,
        coordinates,
    })
}

/// Moves a location to new coordinates.
///
/// # Errors
///
/// Returns an error if the location does not exist or another location
/// already sits at these coordinates.
pub fn update_location(
    conn: &mut SqliteConnection,
    location_id: i64,
    coordinates: Coordinates,
) -> Result<Location, PersistenceError> {
    let updated: usize = diesel::update(locations::table)
        .filter(locations::location_id.eq(location_id))
        .set((
            locations::latitude.eq(coordinates.latitude()),
            locations::longitude.eq(coordinates.longitude()),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Location {location_id}")));
    }

    info!(location_id, "Location updated");
    Ok(Location {
        location_id,
        coordinates,
    })
}

/// Deletes a location.
///
/// # Errors
///
/// Returns an error if the location does not exist or is still referenced.
pub fn delete_location(
    conn: &mut SqliteConnection,
    location_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(locations::table)
        .filter(locations::location_id.eq(location_id))
        .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!("Location {location_id}")));
    }

    info!(location_id, "Location deleted");
    Ok(())
}
