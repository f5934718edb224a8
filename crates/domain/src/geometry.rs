// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Geometry predicates used by areas and geofence analytics.
//!
//! Coordinates map onto the plane as `x = longitude`, `y = latitude`. All
//! predicates are planar; areas are expected to be small enough that
//! curvature does not matter.

use geo::{Area as _, Contains, Coord, Intersects, LineString, Point, Polygon};

use crate::error::DomainError;
use crate::types::Coordinates;

/// How a candidate area polygon relates to an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaRelation {
    /// Both polygons cover the same region.
    Equal,
    /// The candidate encloses the existing area.
    Contains,
    /// The candidate lies inside the existing area.
    Within,
    /// Interiors overlap or boundaries touch.
    Intersects,
}

impl std::fmt::Display for AreaRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text: &str = match self {
            Self::Equal => "equals",
            Self::Contains => "contains",
            Self::Within => "lies within",
            Self::Intersects => "intersects",
        };
        write!(f, "{text}")
    }
}

fn to_coord(point: &Coordinates) -> Coord<f64> {
    Coord {
        x: point.longitude(),
        y: point.latitude(),
    }
}

/// Builds a simple polygon from the ordered vertices of an area.
///
/// The ring is closed implicitly; callers list each vertex once.
///
/// # Errors
///
/// Returns `DomainError::InvalidPolygon` if:
/// - fewer than three vertices are given
/// - a vertex is repeated
/// - all vertices are collinear
/// - two non-adjacent edges cross or touch
pub fn polygon_from_points(points: &[Coordinates]) -> Result<Polygon<f64>, DomainError> {
    if points.len() < 3 {
        return Err(DomainError::InvalidPolygon(format!(
            "expected at least 3 points, got {}",
            points.len()
        )));
    }

    for (i, first) in points.iter().enumerate() {
        if points[i + 1..].iter().any(|second| second == first) {
            return Err(DomainError::InvalidPolygon(format!(
                "point ({}, {}) is repeated",
                first.latitude(),
                first.longitude()
            )));
        }
    }

    let ring: LineString<f64> = points.iter().map(to_coord).collect();
    let polygon: Polygon<f64> = Polygon::new(ring, vec![]);

    if polygon.unsigned_area() == 0.0 {
        return Err(DomainError::InvalidPolygon(String::from(
            "all points are collinear",
        )));
    }

    let edges: Vec<geo::Line<f64>> = polygon.exterior().lines().collect();
    let edge_count: usize = edges.len();
    for i in 0..edge_count {
        for j in (i + 2)..edge_count {
            // First and last edges share the closing vertex.
            if i == 0 && j == edge_count - 1 {
                continue;
            }
            if edges[i].intersects(&edges[j]) {
                return Err(DomainError::InvalidPolygon(String::from(
                    "polygon edges intersect each other",
                )));
            }
        }
    }

    Ok(polygon)
}

/// Returns whether a point lies inside a polygon or on its boundary.
#[must_use]
pub fn point_in_polygon(point: &Coordinates, polygon: &Polygon<f64>) -> bool {
    polygon.intersects(&Point::from(to_coord(point)))
}

/// Classifies a candidate polygon against an existing one.
///
/// Returns `None` when the polygons are disjoint.
#[must_use]
pub fn relate_areas(candidate: &Polygon<f64>, existing: &Polygon<f64>) -> Option<AreaRelation> {
    if !candidate.intersects(existing) {
        return None;
    }
    let relation: AreaRelation = match (candidate.contains(existing), existing.contains(candidate))
    {
        (true, true) => AreaRelation::Equal,
        (true, false) => AreaRelation::Contains,
        (false, true) => AreaRelation::Within,
        (false, false) => AreaRelation::Intersects,
    };
    Some(relation)
}

/// Checks a candidate area against every other stored area.
///
/// # Arguments
///
/// * `candidate` - The polygon being created or updated
/// * `others` - `(area_id, polygon)` for every other area; the area being
///   updated must not be included
///
/// # Errors
///
/// Returns `DomainError::AreaConflict` for the first area the candidate
/// touches in any way.
pub fn validate_area_placement(
    candidate: &Polygon<f64>,
    others: &[(i64, Polygon<f64>)],
) -> Result<(), DomainError> {
    for (area_id, existing) in others {
        if let Some(relation) = relate_areas(candidate, existing) {
            return Err(DomainError::AreaConflict {
                area_id: *area_id,
                relation,
            });
        }
    }
    Ok(())
}
