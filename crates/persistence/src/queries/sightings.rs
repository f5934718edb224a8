// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::Sighting;
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::Date;

use crate::data_models::{SightingRow, SightingSearch};
use crate::diesel_schema::sightings;
use crate::error::PersistenceError;
use crate::timestamps;

/// Retrieves a sighting by ID, whichever animal it belongs to.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_sighting(
    conn: &mut SqliteConnection,
    sighting_id: i64,
) -> Result<Option<Sighting>, PersistenceError> {
    sightings::table
        .filter(sightings::sighting_id.eq(sighting_id))
        .select(SightingRow::as_select())
        .first(conn)
        .optional()?
        .map(SightingRow::into_sighting)
        .transpose()
}

/// Returns an animal's trail, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_trail(
    conn: &mut SqliteConnection,
    animal_id: i64,
) -> Result<Vec<Sighting>, PersistenceError> {
    let rows: Vec<SightingRow> = sightings::table
        .filter(sightings::animal_id.eq(animal_id))
        .order((sightings::visited_at.asc(), sightings::sighting_id.asc()))
        .select(SightingRow::as_select())
        .load(conn)?;
    rows.into_iter().map(SightingRow::into_sighting).collect()
}

/// Pages through an animal's trail within inclusive time bounds.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn search_sightings(
    conn: &mut SqliteConnection,
    animal_id: i64,
    search: &SightingSearch,
) -> Result<Vec<Sighting>, PersistenceError> {
    let mut query = sightings::table
        .filter(sightings::animal_id.eq(animal_id))
        .select(SightingRow::as_select())
        .into_boxed();

    if let Some(start) = search.start_date_time {
        query = query.filter(sightings::visited_at.ge(timestamps::encode(start)?));
    }
    if let Some(end) = search.end_date_time {
        query = query.filter(sightings::visited_at.le(timestamps::encode(end)?));
    }

    let rows: Vec<SightingRow> = query
        .order((sightings::visited_at.asc(), sightings::sighting_id.asc()))
        .offset(search.from)
        .limit(search.size)
        .load(conn)?;
    rows.into_iter().map(SightingRow::into_sighting).collect()
}

/// Lists every sighting of every animal recorded on or before `until`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_sightings(
    conn: &mut SqliteConnection,
    until: Option<Date>,
) -> Result<Vec<Sighting>, PersistenceError> {
    let mut query = sightings::table
        .select(SightingRow::as_select())
        .into_boxed();
    if let Some(bound) = until.map(timestamps::end_of_day_bound).transpose()?.flatten() {
        query = query.filter(sightings::visited_at.lt(bound));
    }

    let rows: Vec<SightingRow> = query
        .order((
            sightings::animal_id.asc(),
            sightings::visited_at.asc(),
            sightings::sighting_id.asc(),
        ))
        .load(conn)?;
    rows.into_iter().map(SightingRow::into_sighting).collect()
}
