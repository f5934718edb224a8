// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Animal, Coordinates, Gender, LifeStatus, Sighting};
use time::OffsetDateTime;
use time::macros::datetime;

pub const CHIPPED_AT: OffsetDateTime = datetime!(2026-03-01 08:00 UTC);

pub fn create_test_animal(animal_id: i64, chipping_location_id: i64) -> Animal {
    Animal {
        animal_id,
        type_ids: vec![1],
        weight: 12.5,
        length: 1.1,
        height: 0.6,
        gender: Gender::Female,
        life_status: LifeStatus::Alive,
        chipping_date_time: CHIPPED_AT,
        chipper_id: 1,
        chipping_location_id,
        death_date_time: None,
        revision: 0,
    }
}

/// Sightings one day apart, ids starting at 100, in the order given.
pub fn create_test_sightings(animal_id: i64, location_ids: &[i64]) -> Vec<Sighting> {
    location_ids
        .iter()
        .zip(1_i64..)
        .map(|(&location_id, offset)| Sighting {
            sighting_id: 99 + offset,
            animal_id,
            location_id,
            visited_at: CHIPPED_AT + time::Duration::days(offset),
        })
        .collect()
}

pub fn coords(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates::new(latitude, longitude).unwrap()
}

pub fn unit_square() -> Vec<Coordinates> {
    vec![
        coords(0.0, 0.0),
        coords(0.0, 1.0),
        coords(1.0, 1.0),
        coords(1.0, 0.0),
    ]
}
