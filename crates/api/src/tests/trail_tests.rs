// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sightings and animal type assignments through the trail engine.

use crate::{
    AnimalResponse, ApiError, ReplaceAnimalTypeRequest, SightingResponse, SightingSearchQuery,
    UpdateAnimalRequest, UpdateSightingRequest, add_animal_type, add_sighting, delete_sighting,
    get_animal, list_sightings, remove_animal_type, replace_animal_type, update_animal,
    update_sighting,
};

use super::helpers::{Fixture, setup};

/// Three locations and one wolf chipped at the first.
fn tracked_wolf() -> (Fixture, [i64; 3], i64) {
    let mut fixture: Fixture = setup();
    let locations: [i64; 3] = [
        fixture.location(1.0, 1.0),
        fixture.location(2.0, 2.0),
        fixture.location(3.0, 3.0),
    ];
    let wolf: i64 = fixture.animal_type("wolf");
    let animal_id: i64 = fixture.animal(&[wolf], locations[0]).id;
    (fixture, locations, animal_id)
}

fn sight(fixture: &mut Fixture, animal_id: i64, location_id: i64) -> SightingResponse {
    add_sighting(
        &mut fixture.persistence,
        animal_id,
        location_id,
        Some(&fixture.chipper),
    )
    .unwrap()
}

#[test]
fn test_add_sighting_rejects_repeats() {
    let (mut fixture, [home, river, _], animal_id) = tracked_wolf();

    let result = add_sighting(&mut fixture.persistence, animal_id, home, Some(&fixture.chipper));
    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));

    let sighting: SightingResponse = sight(&mut fixture, animal_id, river);
    assert_eq!(sighting.location_point_id, river);

    let result = add_sighting(&mut fixture.persistence, animal_id, river, Some(&fixture.chipper));
    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));

    let result = add_sighting(&mut fixture.persistence, animal_id, 404, Some(&fixture.chipper));
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_dead_animal_cannot_be_sighted() {
    let (mut fixture, [home, river, _], animal_id) = tracked_wolf();
    let request: UpdateAnimalRequest = UpdateAnimalRequest {
        weight: Some(40.0),
        length: Some(1.5),
        height: Some(0.8),
        gender: Some(String::from("FEMALE")),
        life_status: Some(String::from("DEAD")),
        chipper_id: Some(fixture.chipper.account_id),
        chipping_location_id: Some(home),
    };
    update_animal(&mut fixture.persistence, animal_id, &request, Some(&fixture.chipper)).unwrap();

    let result = add_sighting(&mut fixture.persistence, animal_id, river, Some(&fixture.chipper));

    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));
}

#[test]
fn test_delete_first_sighting_cascades_to_chipping_repeat() {
    let (mut fixture, [home, river, forest], animal_id) = tracked_wolf();
    let first: i64 = sight(&mut fixture, animal_id, river).id;
    let second: i64 = sight(&mut fixture, animal_id, home).id;
    let third: i64 = sight(&mut fixture, animal_id, forest).id;

    let deleted: Vec<i64> =
        delete_sighting(&mut fixture.persistence, animal_id, first, Some(&fixture.admin)).unwrap();
    assert_eq!(deleted, vec![first, second]);

    let animal: AnimalResponse =
        get_animal(&mut fixture.persistence, animal_id, Some(&fixture.user)).unwrap();
    assert_eq!(animal.visited_locations, vec![third]);
}

#[test]
fn test_delete_unknown_sighting_is_not_found() {
    let (mut fixture, _, animal_id) = tracked_wolf();

    let result = delete_sighting(&mut fixture.persistence, animal_id, 404, Some(&fixture.admin));

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_update_sighting_checks_neighbours() {
    let (mut fixture, [home, river, forest], animal_id) = tracked_wolf();
    let first: i64 = sight(&mut fixture, animal_id, river).id;
    sight(&mut fixture, animal_id, forest);

    let relocate = |sighting_id: i64, location_id: i64| UpdateSightingRequest {
        visited_location_point_id: Some(sighting_id),
        location_point_id: Some(location_id),
    };

    for location_id in [home, river, forest] {
        let result = update_sighting(
            &mut fixture.persistence,
            animal_id,
            &relocate(first, location_id),
            Some(&fixture.chipper),
        );
        assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));
    }

    let other: i64 = fixture.location(4.0, 4.0);
    let moved: SightingResponse = update_sighting(
        &mut fixture.persistence,
        animal_id,
        &relocate(first, other),
        Some(&fixture.chipper),
    )
    .unwrap();
    assert_eq!(moved.id, first);
    assert_eq!(moved.location_point_id, other);

    let missing: UpdateSightingRequest = UpdateSightingRequest {
        visited_location_point_id: None,
        location_point_id: Some(other),
    };
    let result = update_sighting(
        &mut fixture.persistence,
        animal_id,
        &missing,
        Some(&fixture.chipper),
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_list_sightings_pages_oldest_first() {
    let (mut fixture, [home, river, forest], animal_id) = tracked_wolf();
    let first: i64 = sight(&mut fixture, animal_id, river).id;
    let second: i64 = sight(&mut fixture, animal_id, forest).id;
    let third: i64 = sight(&mut fixture, animal_id, home).id;

    let all: Vec<SightingResponse> = list_sightings(
        &mut fixture.persistence,
        animal_id,
        &SightingSearchQuery::default(),
        Some(&fixture.user),
    )
    .unwrap();
    let ids: Vec<i64> = all.iter().map(|sighting| sighting.id).collect();
    assert_eq!(ids, vec![first, second, third]);

    let query: SightingSearchQuery = SightingSearchQuery {
        from: Some(1),
        size: Some(1),
        ..SightingSearchQuery::default()
    };
    let page: Vec<SightingResponse> =
        list_sightings(&mut fixture.persistence, animal_id, &query, Some(&fixture.user)).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, second);

    let result = list_sightings(
        &mut fixture.persistence,
        404,
        &SightingSearchQuery::default(),
        Some(&fixture.user),
    );
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_animal_type_assignment_rules() {
    let (mut fixture, _, animal_id) = tracked_wolf();
    let wolf: i64 = get_animal(&mut fixture.persistence, animal_id, Some(&fixture.user))
        .unwrap()
        .animal_types[0];
    let fox: i64 = fixture.animal_type("fox");
    let dog: i64 = fixture.animal_type("dog");

    let result = remove_animal_type(
        &mut fixture.persistence,
        animal_id,
        wolf,
        Some(&fixture.chipper),
    );
    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));

    let animal: AnimalResponse =
        add_animal_type(&mut fixture.persistence, animal_id, fox, Some(&fixture.chipper)).unwrap();
    assert_eq!(animal.animal_types, vec![wolf, fox]);

    let result =
        add_animal_type(&mut fixture.persistence, animal_id, fox, Some(&fixture.chipper));
    assert!(matches!(result, Err(ApiError::Conflict { .. })));

    let swap = |old_type_id: i64, new_type_id: i64| ReplaceAnimalTypeRequest {
        old_type_id: Some(old_type_id),
        new_type_id: Some(new_type_id),
    };

    let animal: AnimalResponse = replace_animal_type(
        &mut fixture.persistence,
        animal_id,
        &swap(wolf, dog),
        Some(&fixture.chipper),
    )
    .unwrap();
    assert_eq!(animal.animal_types, vec![dog, fox]);

    let result = replace_animal_type(
        &mut fixture.persistence,
        animal_id,
        &swap(wolf, dog),
        Some(&fixture.chipper),
    );
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));

    let result = replace_animal_type(
        &mut fixture.persistence,
        animal_id,
        &swap(dog, fox),
        Some(&fixture.chipper),
    );
    assert!(matches!(result, Err(ApiError::Conflict { .. })));

    let animal: AnimalResponse =
        remove_animal_type(&mut fixture.persistence, animal_id, dog, Some(&fixture.chipper))
            .unwrap();
    assert_eq!(animal.animal_types, vec![fox]);

    let result = add_animal_type(&mut fixture.persistence, animal_id, 404, Some(&fixture.chipper));
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}
