// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::{
    Account, AccountFields, Animal, Coordinates, Gender, Location, NewAnimal, Role,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::Persistence;

pub const CHIPPED_AT: OffsetDateTime = datetime!(2026-03-01 08:00 UTC);

/// Cheapest cost bcrypt accepts; keeps the suite fast.
pub const TEST_HASH_COST: u32 = 4;

pub fn new_store() -> Persistence {
    Persistence::new_in_memory()
        .unwrap()
        .with_password_hash_cost(TEST_HASH_COST)
}

pub fn account_fields(first_name: &str, last_name: &str, email: &str) -> AccountFields {
    AccountFields {
        first_name: String::from(first_name),
        last_name: String::from(last_name),
        email: String::from(email),
    }
}

pub fn seed_chipper(persistence: &mut Persistence) -> Account {
    persistence
        .create_account(
            &account_fields("Ada", "Ranger", "ada@park.org"),
            "secret",
            Role::Chipper,
        )
        .unwrap()
}

pub fn seed_location(persistence: &mut Persistence, latitude: f64, longitude: f64) -> Location {
    persistence
        .create_location(Coordinates::new(latitude, longitude).unwrap())
        .unwrap()
}

pub fn new_animal(type_ids: &[i64], chipper_id: i64, chipping_location_id: i64) -> NewAnimal {
    NewAnimal {
        type_ids: type_ids.to_vec(),
        weight: 40.0,
        length: 1.5,
        height: 0.8,
        gender: Gender::Female,
        chipper_id,
        chipping_location_id,
    }
}

pub fn seed_animal_type(persistence: &mut Persistence, name: &str) -> i64 {
    persistence.create_animal_type(name).unwrap().type_id
}

/// Chips an animal of one type at `CHIPPED_AT`.
pub fn seed_animal(
    persistence: &mut Persistence,
    type_id: i64,
    chipper_id: i64,
    location_id: i64,
) -> Animal {
    persistence
        .create_animal(&new_animal(&[type_id], chipper_id, location_id), CHIPPED_AT)
        .unwrap()
}
