// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Locations and animal types.

use crate::{
    AnimalTypeRequest, AnimalTypeResponse, ApiError, LocationRequest, LocationResponse,
    add_sighting, create_location, delete_animal_type, delete_location, find_location,
    get_animal_type, get_location, update_animal_type, update_location,
};

use super::helpers::setup;

fn at(latitude: f64, longitude: f64) -> LocationRequest {
    LocationRequest {
        latitude: Some(latitude),
        longitude: Some(longitude),
    }
}

#[test]
fn test_location_lifecycle() {
    let mut fixture = setup();
    let location_id: i64 = fixture.location(45.5, -73.5);

    let found: i64 =
        find_location(&mut fixture.persistence, &at(45.5, -73.5), Some(&fixture.user)).unwrap();
    assert_eq!(found, location_id);

    let moved: LocationResponse = update_location(
        &mut fixture.persistence,
        location_id,
        &at(46.0, -73.0),
        Some(&fixture.chipper),
    )
    .unwrap();
    assert!((moved.latitude - 46.0).abs() < f64::EPSILON);

    let result = find_location(&mut fixture.persistence, &at(45.5, -73.5), Some(&fixture.user));
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));

    delete_location(&mut fixture.persistence, location_id, Some(&fixture.admin)).unwrap();
    let result = get_location(&mut fixture.persistence, location_id, Some(&fixture.user));
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_location_rejects_duplicates_and_bad_coordinates() {
    let mut fixture = setup();
    let first: i64 = fixture.location(1.0, 1.0);
    let second: i64 = fixture.location(2.0, 2.0);

    let chipper = Some(&fixture.chipper);
    let result = create_location(&mut fixture.persistence, &at(1.0, 1.0), chipper);
    assert!(matches!(result, Err(ApiError::Conflict { .. })));

    let result = update_location(&mut fixture.persistence, second, &at(1.0, 1.0), chipper);
    assert!(matches!(result, Err(ApiError::Conflict { .. })));

    let result = update_location(&mut fixture.persistence, first, &at(91.0, 1.0), chipper);
    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "latitude"));

    let missing: LocationRequest = LocationRequest {
        latitude: Some(1.0),
        longitude: None,
    };
    let result = create_location(&mut fixture.persistence, &missing, chipper);
    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "longitude"));
}

#[test]
fn test_referenced_location_cannot_be_deleted() {
    let mut fixture = setup();
    let chipping: i64 = fixture.location(1.0, 1.0);
    let visited: i64 = fixture.location(2.0, 2.0);
    let type_id: i64 = fixture.animal_type("wolf");
    let animal_id: i64 = fixture.animal(&[type_id], chipping).id;
    add_sighting(&mut fixture.persistence, animal_id, visited, Some(&fixture.chipper)).unwrap();

    for location_id in [chipping, visited] {
        let result = delete_location(&mut fixture.persistence, location_id, Some(&fixture.admin));
        assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));
    }
}

#[test]
fn test_animal_type_lifecycle() {
    let mut fixture = setup();
    let type_id: i64 = fixture.animal_type("wolf");

    let renamed: AnimalTypeResponse = update_animal_type(
        &mut fixture.persistence,
        type_id,
        &AnimalTypeRequest {
            name: Some(String::from("grey wolf")),
        },
        Some(&fixture.chipper),
    )
    .unwrap();
    assert_eq!(renamed.name, "grey wolf");

    let fetched: AnimalTypeResponse =
        get_animal_type(&mut fixture.persistence, type_id, Some(&fixture.user)).unwrap();
    assert_eq!(fetched, renamed);

    delete_animal_type(&mut fixture.persistence, type_id, Some(&fixture.admin)).unwrap();
    let result = get_animal_type(&mut fixture.persistence, type_id, Some(&fixture.user));
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_animal_type_name_rules() {
    let mut fixture = setup();
    let wolf: i64 = fixture.animal_type("wolf");
    let fox: i64 = fixture.animal_type("fox");

    let result = update_animal_type(
        &mut fixture.persistence,
        fox,
        &AnimalTypeRequest {
            name: Some(String::from("wolf")),
        },
        Some(&fixture.chipper),
    );
    assert!(matches!(result, Err(ApiError::Conflict { .. })));

    let result = update_animal_type(
        &mut fixture.persistence,
        wolf,
        &AnimalTypeRequest {
            name: Some(String::from("  ")),
        },
        Some(&fixture.chipper),
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "type"));
}

#[test]
fn test_carried_animal_type_cannot_be_deleted() {
    let mut fixture = setup();
    let location_id: i64 = fixture.location(1.0, 1.0);
    let type_id: i64 = fixture.animal_type("wolf");
    fixture.animal(&[type_id], location_id);

    let result = delete_animal_type(&mut fixture.persistence, type_id, Some(&fixture.admin));

    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));
}
