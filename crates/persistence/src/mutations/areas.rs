// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::{Area, Coordinates};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{area_points, areas};
use crate::error::PersistenceError;

/// Stores an area and its vertices in order.
///
/// Polygon validity and placement against other areas are checked by the
/// caller.
///
/// # Errors
///
/// Returns an error if the name is already taken.
pub fn create_area(
    conn: &mut SqliteConnection,
    name: &str,
    points: &[Coordinates],
) -> Result<Area, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(areas::table)
            .values(areas::name.eq(name))
            .execute(conn)?;
        let area_id: i64 = conn.get_last_insert_rowid()?;

        insert_points(conn, area_id, points)?;

        info!(area_id, name, vertices = points.len(), "Area created");
        Ok(Area {
            area_id,
            name: name.to_string(),
            points: points.to_vec(),
        })
    })
}

/// Renames an area and replaces its vertices.
///
/// # Errors
///
/// Returns an error if the area does not exist or the name is taken.
pub fn update_area(
    conn: &mut SqliteConnection,
    area_id: i64,
    name: &str,
    points: &[Coordinates],
) -> Result<Area, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let updated: usize = diesel::update(areas::table)
            .filter(areas::area_id.eq(area_id))
            .set(areas::name.eq(name))
            .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!("Area {area_id}")));
        }

        diesel::delete(area_points::table)
            .filter(area_points::area_id.eq(area_id))
            .execute(conn)?;
        insert_points(conn, area_id, points)?;

        info!(area_id, name, vertices = points.len(), "Area updated");
        Ok(Area {
            area_id,
            name: name.to_string(),
            points: points.to_vec(),
        })
    })
}

/// Deletes an area. Vertices cascade.
///
/// # Errors
///
/// Returns an error if the area does not exist.
pub fn delete_area(conn: &mut SqliteConnection, area_id: i64) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(areas::table)
        .filter(areas::area_id.eq(area_id))
        .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!("Area {area_id}")));
    }

    info!(area_id, "Area deleted");
    Ok(())
}

fn insert_points(
    conn: &mut SqliteConnection,
    area_id: i64,
    points: &[Coordinates],
) -> Result<(), PersistenceError> {
    for (position, point) in (0_i32..).zip(points) {
        diesel::insert_into(area_points::table)
            .values((
                area_points::area_id.eq(area_id),
                area_points::position.eq(position),
                area_points::latitude.eq(point.latitude()),
                area_points::longitude.eq(point.longitude()),
            ))
            .execute(conn)?;
    }
    Ok(())
}
