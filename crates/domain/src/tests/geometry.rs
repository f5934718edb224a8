// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{coords, unit_square};
use crate::{
    AreaRelation, Coordinates, DomainError, Polygon, point_in_polygon, polygon_from_points,
    relate_areas, validate_area_placement,
};

fn square(min: f64, max: f64) -> Polygon<f64> {
    polygon_from_points(&[
        coords(min, min),
        coords(min, max),
        coords(max, max),
        coords(max, min),
    ])
    .unwrap()
}

#[test]
fn test_unit_square_is_a_valid_polygon() {
    assert!(polygon_from_points(&unit_square()).is_ok());
}

#[test]
fn test_polygon_needs_three_points() {
    let points: Vec<Coordinates> = vec![coords(0.0, 0.0), coords(1.0, 1.0)];

    let result: Result<Polygon<f64>, DomainError> = polygon_from_points(&points);

    assert!(matches!(result, Err(DomainError::InvalidPolygon(_))));
}

#[test]
fn test_polygon_rejects_repeated_point() {
    let points: Vec<Coordinates> = vec![
        coords(0.0, 0.0),
        coords(0.0, 1.0),
        coords(1.0, 1.0),
        coords(0.0, 1.0),
    ];

    assert!(matches!(
        polygon_from_points(&points),
        Err(DomainError::InvalidPolygon(_))
    ));
}

#[test]
fn test_polygon_rejects_collinear_points() {
    let points: Vec<Coordinates> = vec![coords(0.0, 0.0), coords(1.0, 1.0), coords(2.0, 2.0)];

    assert!(matches!(
        polygon_from_points(&points),
        Err(DomainError::InvalidPolygon(_))
    ));
}

#[test]
fn test_polygon_rejects_self_intersection() {
    // A bow tie with one lobe larger than the other so the area is not zero.
    let points: Vec<Coordinates> = vec![
        coords(0.0, 0.0),
        coords(2.0, 2.0),
        coords(2.0, 0.0),
        coords(0.0, 1.0),
    ];

    assert!(matches!(
        polygon_from_points(&points),
        Err(DomainError::InvalidPolygon(_))
    ));
}

#[test]
fn test_point_in_polygon_includes_boundary() {
    let polygon: Polygon<f64> = polygon_from_points(&unit_square()).unwrap();

    assert!(point_in_polygon(&coords(0.5, 0.5), &polygon));
    assert!(point_in_polygon(&coords(0.0, 0.5), &polygon));
    assert!(point_in_polygon(&coords(1.0, 1.0), &polygon));
    assert!(!point_in_polygon(&coords(5.0, 5.0), &polygon));
    assert!(!point_in_polygon(&coords(-0.1, 0.5), &polygon));
}

#[test]
fn test_relate_areas_classifies_every_case() {
    let unit: Polygon<f64> = square(0.0, 1.0);

    assert_eq!(relate_areas(&unit, &square(0.0, 1.0)), Some(AreaRelation::Equal));
    assert_eq!(
        relate_areas(&square(-1.0, 2.0), &unit),
        Some(AreaRelation::Contains)
    );
    assert_eq!(
        relate_areas(&square(0.25, 0.75), &unit),
        Some(AreaRelation::Within)
    );
    assert_eq!(
        relate_areas(&square(0.5, 1.5), &unit),
        Some(AreaRelation::Intersects)
    );
    assert_eq!(relate_areas(&square(3.0, 4.0), &unit), None);
}

#[test]
fn test_relate_areas_treats_shared_edge_as_intersection() {
    let unit: Polygon<f64> = square(0.0, 1.0);
    let neighbour: Polygon<f64> = polygon_from_points(&[
        coords(0.0, 1.0),
        coords(0.0, 2.0),
        coords(1.0, 2.0),
        coords(1.0, 1.0),
    ])
    .unwrap();

    assert_eq!(
        relate_areas(&neighbour, &unit),
        Some(AreaRelation::Intersects)
    );
}

#[test]
fn test_validate_area_placement_reports_first_conflict() {
    let others: Vec<(i64, Polygon<f64>)> = vec![(1, square(10.0, 11.0)), (2, square(0.0, 1.0))];

    assert!(validate_area_placement(&square(20.0, 21.0), &others).is_ok());
    assert_eq!(
        validate_area_placement(&square(0.25, 0.75), &others),
        Err(DomainError::AreaConflict {
            area_id: 2,
            relation: AreaRelation::Within
        })
    );
}
