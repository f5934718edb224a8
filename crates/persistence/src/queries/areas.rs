// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;

use chipwatch_domain::{Area, Coordinates};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::AreaPointRow;
use crate::diesel_schema::{area_points, areas};
use crate::error::PersistenceError;

/// Retrieves an area with its vertices in order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_area(
    conn: &mut SqliteConnection,
    area_id: i64,
) -> Result<Option<Area>, PersistenceError> {
    let Some(name) = areas::table
        .filter(areas::area_id.eq(area_id))
        .select(areas::name)
        .first::<String>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let rows: Vec<AreaPointRow> = area_points::table
        .filter(area_points::area_id.eq(area_id))
        .order(area_points::position.asc())
        .select(AreaPointRow::as_select())
        .load(conn)?;

    Ok(Some(Area {
        area_id,
        name,
        points: to_coordinates(rows)?,
    }))
}

/// Lists every area except `exclude`, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_other_areas(
    conn: &mut SqliteConnection,
    exclude: Option<i64>,
) -> Result<Vec<Area>, PersistenceError> {
    let header: Vec<(i64, String)> = areas::table
        .filter(areas::area_id.ne(exclude.unwrap_or(-1)))
        .order(areas::area_id.asc())
        .select((areas::area_id, areas::name))
        .load(conn)?;

    let rows: Vec<AreaPointRow> = area_points::table
        .filter(area_points::area_id.ne(exclude.unwrap_or(-1)))
        .order((area_points::area_id.asc(), area_points::position.asc()))
        .select(AreaPointRow::as_select())
        .load(conn)?;

    let mut points: HashMap<i64, Vec<AreaPointRow>> = HashMap::new();
    for row in rows {
        points.entry(row.area_id).or_default().push(row);
    }

    header
        .into_iter()
        .map(|(area_id, name)| {
            Ok(Area {
                area_id,
                name,
                points: to_coordinates(points.remove(&area_id).unwrap_or_default())?,
            })
        })
        .collect()
}

fn to_coordinates(rows: Vec<AreaPointRow>) -> Result<Vec<Coordinates>, PersistenceError> {
    rows.into_iter()
        .map(|row| {
            Coordinates::new(row.latitude, row.longitude)
                .map_err(|e| PersistenceError::CorruptRow(e.to_string()))
        })
        .collect()
}
