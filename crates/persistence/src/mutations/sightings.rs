// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::Sighting;
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::sightings;
use crate::error::PersistenceError;
use crate::mutations::animals::claim_revision;
use crate::timestamps;

/// Appends a sighting to an animal's trail under the revision guard.
///
/// The returned sighting carries the timestamp as stored.
///
/// # Errors
///
/// Returns `RevisionConflict` on a lost race, or an error if the insert
/// fails.
pub fn create_sighting(
    conn: &mut SqliteConnection,
    animal_id: i64,
    location_id: i64,
    visited_at: OffsetDateTime,
    expected_revision: i64,
) -> Result<Sighting, PersistenceError> {
    let visited_at: OffsetDateTime = timestamps::truncate(visited_at);
    let visited_at_text: String = timestamps::encode(visited_at)?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        claim_revision(conn, animal_id, expected_revision)?;

        diesel::insert_into(sightings::table)
            .values((
                sightings::animal_id.eq(animal_id),
                sightings::location_id.eq(location_id),
                sightings::visited_at.eq(&visited_at_text),
            ))
            .execute(conn)?;
        let sighting_id: i64 = conn.get_last_insert_rowid()?;

        info!(animal_id, sighting_id, location_id, "Sighting recorded");
        Ok(Sighting {
            sighting_id,
            animal_id,
            location_id,
            visited_at,
        })
    })
}

/// Removes sightings from an animal's trail under the revision guard.
///
/// # Errors
///
/// Returns `RevisionConflict` on a lost race, or an error if the delete
/// fails.
pub fn delete_sightings(
    conn: &mut SqliteConnection,
    animal_id: i64,
    sighting_ids: &[i64],
    expected_revision: i64,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        claim_revision(conn, animal_id, expected_revision)?;

        let deleted: usize = diesel::delete(sightings::table)
            .filter(sightings::animal_id.eq(animal_id))
            .filter(sightings::sighting_id.eq_any(sighting_ids))
            .execute(conn)?;

        info!(animal_id, deleted, "Sightings deleted");
        Ok(())
    })
}

/// Points a sighting at another location under the revision guard.
///
/// # Errors
///
/// Returns `RevisionConflict` on a lost race, or `NotFound` if the sighting
/// is not on this animal's trail.
pub fn relocate_sighting(
    conn: &mut SqliteConnection,
    animal_id: i64,
    sighting_id: i64,
    location_id: i64,
    expected_revision: i64,
) -> Result<Sighting, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        claim_revision(conn, animal_id, expected_revision)?;

        let updated: usize = diesel::update(sightings::table)
            .filter(sightings::sighting_id.eq(sighting_id))
            .filter(sightings::animal_id.eq(animal_id))
            .set(sightings::location_id.eq(location_id))
            .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!("Sighting {sighting_id}")));
        }

        info!(animal_id, sighting_id, location_id, "Sighting relocated");
        crate::queries::sightings::get_sighting(conn, sighting_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Sighting {sighting_id}")))
    })
}
