// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;

use crate::tests::helpers::{CHIPPED_AT, create_test_animal, create_test_sightings};
use crate::{
    Animal, AnimalType, AreaAnalytics, DateWindow, PositionInfo, Trail, TrailClassification,
    classify_positions, position_infos,
};
use time::Duration;
use time::macros::date;

const INSIDE: i64 = 1;
const INSIDE_TOO: i64 = 2;
const OUTSIDE: i64 = 10;
const OUTSIDE_TOO: i64 = 11;

fn in_area() -> HashSet<i64> {
    HashSet::from([INSIDE, INSIDE_TOO])
}

fn classify(animal: &Animal, locations: &[i64], window: &DateWindow) -> TrailClassification {
    let trail: Trail<'_> = Trail::new(animal, create_test_sightings(animal.animal_id, locations));
    classify_positions(&position_infos(&trail, &in_area(), window))
}

fn wolf() -> AnimalType {
    AnimalType {
        type_id: 1,
        name: String::from("wolf"),
    }
}

fn fox() -> AnimalType {
    AnimalType {
        type_id: 2,
        name: String::from("fox"),
    }
}

#[test]
fn test_date_window_bounds() {
    let window: DateWindow =
        DateWindow::new(Some(date!(2026 - 03 - 01)), Some(date!(2026 - 03 - 03)));

    // Start is exclusive by calendar date.
    assert!(!window.is_after_start(CHIPPED_AT));
    assert!(window.is_after_start(CHIPPED_AT + Duration::days(1)));
    // End covers the whole day.
    assert!(window.admits_until_end(CHIPPED_AT + Duration::days(2) + Duration::hours(15)));
    assert!(!window.admits_until_end(CHIPPED_AT + Duration::days(3)));

    let open: DateWindow = DateWindow::default();
    assert!(open.is_after_start(CHIPPED_AT));
    assert!(open.admits_until_end(CHIPPED_AT));
}

#[test]
fn test_classify_empty_sequence() {
    assert_eq!(classify_positions(&[]), TrailClassification::default());
}

#[test]
fn test_chipped_inside_without_sightings_is_only_present() {
    let animal: Animal = create_test_animal(1, INSIDE);

    let classification: TrailClassification = classify(&animal, &[], &DateWindow::default());

    assert_eq!(
        classification,
        TrailClassification {
            currently_in_area: true,
            arrived: false,
            gone: false,
        }
    );
}

#[test]
fn test_entering_after_start_is_an_arrival() {
    let animal: Animal = create_test_animal(1, OUTSIDE);
    let window: DateWindow = DateWindow::new(Some(date!(2026 - 03 - 01)), None);

    let classification: TrailClassification = classify(&animal, &[INSIDE], &window);

    assert!(classification.arrived);
    assert!(classification.currently_in_area);
    assert!(!classification.gone);
}

#[test]
fn test_entering_on_start_date_is_not_an_arrival() {
    let animal: Animal = create_test_animal(1, OUTSIDE);
    // The only sighting is on 2026-03-02.
    let window: DateWindow = DateWindow::new(Some(date!(2026 - 03 - 02)), None);

    let classification: TrailClassification = classify(&animal, &[INSIDE], &window);

    assert!(!classification.arrived);
    assert!(classification.currently_in_area);
}

#[test]
fn test_leaving_after_start_is_a_departure() {
    let animal: Animal = create_test_animal(1, OUTSIDE);
    let window: DateWindow = DateWindow::new(Some(date!(2026 - 03 - 01)), None);

    let classification: TrailClassification =
        classify(&animal, &[INSIDE, OUTSIDE_TOO], &window);

    assert!(classification.gone);
    assert!(classification.arrived);
    assert!(!classification.currently_in_area);
}

#[test]
fn test_moving_between_inside_locations_counts_as_arrival() {
    let animal: Animal = create_test_animal(1, INSIDE);

    let classification: TrailClassification =
        classify(&animal, &[INSIDE_TOO], &DateWindow::default());

    assert!(classification.arrived);
    assert!(classification.currently_in_area);
    assert!(!classification.gone);
}

#[test]
fn test_end_date_truncates_the_route() {
    let animal: Animal = create_test_animal(1, INSIDE);
    // Sightings fall on 03-02 and 03-03; the second is cut off.
    let window: DateWindow = DateWindow::new(None, Some(date!(2026 - 03 - 02)));

    let classification: TrailClassification = classify(&animal, &[OUTSIDE, INSIDE_TOO], &window);

    assert!(!classification.currently_in_area);
    assert!(classification.gone);
    assert!(!classification.arrived);
}

#[test]
fn test_chipping_position_survives_end_date() {
    let animal: Animal = create_test_animal(1, INSIDE);
    let window: DateWindow = DateWindow::new(None, Some(date!(2020 - 01 - 01)));
    let trail: Trail<'_> = Trail::new(&animal, create_test_sightings(1, &[OUTSIDE]));

    let infos: Vec<PositionInfo> = position_infos(&trail, &in_area(), &window);

    assert_eq!(
        infos,
        vec![PositionInfo {
            in_area: true,
            in_window: true
        }]
    );
}

#[test]
fn test_inverted_window_matches_nothing() {
    let window: DateWindow =
        DateWindow::new(Some(date!(2026 - 03 - 05)), Some(date!(2026 - 03 - 01)));
    assert!(window.is_inverted());
    let same_day: DateWindow =
        DateWindow::new(Some(date!(2026 - 03 - 01)), Some(date!(2026 - 03 - 01)));
    assert!(!same_day.is_inverted());
    assert!(!DateWindow::new(Some(date!(2026 - 03 - 05)), None).is_inverted());

    // Chipped inside, left, then came back.
    let animal: Animal = create_test_animal(1, INSIDE);
    let trail: Trail<'_> = Trail::new(&animal, create_test_sightings(1, &[OUTSIDE, INSIDE]));

    assert!(position_infos(&trail, &in_area(), &window).is_empty());
    assert!(classify(&animal, &[OUTSIDE, INSIDE], &window).is_empty());
}

#[test]
fn test_left_and_gone_with_sightings_outside_only() {
    // Chipped inside, then seen twice outside.
    let animal: Animal = create_test_animal(1, INSIDE);

    let classification: TrailClassification =
        classify(&animal, &[OUTSIDE, OUTSIDE_TOO], &DateWindow::default());

    assert_eq!(
        classification,
        TrailClassification {
            currently_in_area: false,
            arrived: false,
            gone: true,
        }
    );
}

#[test]
fn test_record_skips_untouched_animals() {
    let mut analytics: AreaAnalytics = AreaAnalytics::default();

    analytics.record(&[wolf()], TrailClassification::default());

    assert_eq!(analytics, AreaAnalytics::default());
}

#[test]
fn test_record_sums_per_type_in_first_seen_order() {
    let mut analytics: AreaAnalytics = AreaAnalytics::default();

    analytics.record(
        &[fox()],
        TrailClassification {
            currently_in_area: true,
            arrived: true,
            gone: false,
        },
    );
    analytics.record(
        &[wolf(), fox()],
        TrailClassification {
            currently_in_area: false,
            arrived: true,
            gone: true,
        },
    );

    assert_eq!(analytics.total_quantity_animals, 1);
    assert_eq!(analytics.total_animals_arrived, 2);
    assert_eq!(analytics.total_animals_gone, 1);

    let names: Vec<&str> = analytics
        .animals_analytics
        .iter()
        .map(|entry| entry.type_name.as_str())
        .collect();
    assert_eq!(names, vec!["fox", "wolf"]);

    let fox_entry = &analytics.animals_analytics[0];
    assert_eq!(fox_entry.quantity_animals, 1);
    assert_eq!(fox_entry.animals_arrived, 2);
    assert_eq!(fox_entry.animals_gone, 1);

    let wolf_entry = &analytics.animals_analytics[1];
    assert_eq!(wolf_entry.quantity_animals, 0);
    assert_eq!(wolf_entry.animals_arrived, 1);
    assert_eq!(wolf_entry.animals_gone, 1);
}
