// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::{BTreeSet, HashMap};

use chipwatch_domain::Animal;
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::Date;
use tracing::debug;

use crate::data_models::{AnimalRow, AnimalSearch};
use crate::diesel_schema::{animal_type_links, animals, sightings};
use crate::error::PersistenceError;
use crate::timestamps;

/// Retrieves an animal with its type IDs in assignment order.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the animal is not found.
pub fn get_animal(
    conn: &mut SqliteConnection,
    animal_id: i64,
) -> Result<Option<Animal>, PersistenceError> {
    let Some(row) = animals::table
        .filter(animals::animal_id.eq(animal_id))
        .select(AnimalRow::as_select())
        .first(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let type_ids: Vec<i64> = get_type_ids(conn, animal_id)?;
    row.into_animal(type_ids).map(Some)
}

/// Returns the animal's type IDs in assignment order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_type_ids(
    conn: &mut SqliteConnection,
    animal_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    Ok(animal_type_links::table
        .filter(animal_type_links::animal_id.eq(animal_id))
        .order(animal_type_links::position.asc())
        .select(animal_type_links::type_id)
        .load(conn)?)
}

/// Searches animals. Chipping time bounds are inclusive; results are
/// ordered by ID and paged with `from`/`size`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn search_animals(
    conn: &mut SqliteConnection,
    search: &AnimalSearch,
) -> Result<Vec<Animal>, PersistenceError> {
    let mut query = animals::table.select(AnimalRow::as_select()).into_boxed();

    if let Some(start) = search.start_date_time {
        query = query.filter(animals::chipping_date_time.ge(timestamps::encode(start)?));
    }
    if let Some(end) = search.end_date_time {
        query = query.filter(animals::chipping_date_time.le(timestamps::encode(end)?));
    }
    if let Some(chipper_id) = search.chipper_id {
        query = query.filter(animals::chipper_id.eq(chipper_id));
    }
    if let Some(location_id) = search.chipping_location_id {
        query = query.filter(animals::chipping_location_id.eq(location_id));
    }
    if let Some(life_status) = search.life_status {
        query = query.filter(animals::life_status.eq(life_status.as_str()));
    }
    if let Some(gender) = search.gender {
        query = query.filter(animals::gender.eq(gender.as_str()));
    }

    let rows: Vec<AnimalRow> = query
        .order(animals::animal_id.asc())
        .offset(search.from)
        .limit(search.size)
        .load(conn)?;

    with_type_ids(conn, rows)
}

/// Upper bound on ids bound into a single `IN (...)` clause, kept well
/// below SQLite's host parameter limit.
const ID_CHUNK: usize = 500;

/// Lists animals that were chipped at one of the locations, or sighted at
/// one of them on or before `until`. Ordered by ID.
///
/// Location IDs are queried in chunks, so any number of them may be passed.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_candidate_animals(
    conn: &mut SqliteConnection,
    location_ids: &[i64],
    until: Option<Date>,
) -> Result<Vec<Animal>, PersistenceError> {
    if location_ids.is_empty() {
        return Ok(Vec::new());
    }

    let bound: Option<String> = until.map(timestamps::end_of_day_bound).transpose()?.flatten();
    let mut candidate_ids: BTreeSet<i64> = BTreeSet::new();
    for chunk in location_ids.chunks(ID_CHUNK) {
        candidate_ids.extend(
            animals::table
                .filter(animals::chipping_location_id.eq_any(chunk))
                .select(animals::animal_id)
                .load::<i64>(conn)?,
        );

        let mut sighted = sightings::table
            .filter(sightings::location_id.eq_any(chunk))
            .select(sightings::animal_id)
            .distinct()
            .into_boxed();
        if let Some(bound) = &bound {
            sighted = sighted.filter(sightings::visited_at.lt(bound.clone()));
        }
        candidate_ids.extend(sighted.load::<i64>(conn)?);
    }

    debug!(
        locations = location_ids.len(),
        candidates = candidate_ids.len(),
        "Resolved analytics candidates"
    );

    let ids: Vec<i64> = candidate_ids.into_iter().collect();
    let mut rows: Vec<AnimalRow> = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(ID_CHUNK) {
        rows.extend(
            animals::table
                .filter(animals::animal_id.eq_any(chunk))
                .select(AnimalRow::as_select())
                .order(animals::animal_id.asc())
                .load(conn)?,
        );
    }

    with_type_ids(conn, rows)
}

/// Attaches type IDs to a batch of animal rows with a single query.
fn with_type_ids(
    conn: &mut SqliteConnection,
    rows: Vec<AnimalRow>,
) -> Result<Vec<Animal>, PersistenceError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.animal_id).collect();
    let mut type_ids: HashMap<i64, Vec<i64>> = HashMap::new();
    for chunk in ids.chunks(ID_CHUNK) {
        let links: Vec<(i64, i64)> = animal_type_links::table
            .filter(animal_type_links::animal_id.eq_any(chunk))
            .order((
                animal_type_links::animal_id.asc(),
                animal_type_links::position.asc(),
            ))
            .select((animal_type_links::animal_id, animal_type_links::type_id))
            .load(conn)?;

        for (animal_id, type_id) in links {
            type_ids.entry(animal_id).or_default().push(type_id);
        }
    }

    rows.into_iter()
        .map(|row| {
            let animal_types: Vec<i64> = type_ids.remove(&row.animal_id).unwrap_or_default();
            row.into_animal(animal_types)
        })
        .collect()
}
