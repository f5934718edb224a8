// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use chipwatch_domain::{Account, AccountFields, Role};
use chipwatch_persistence::Persistence;

use crate::{
    AnimalResponse, AnimalTypeRequest, AuthenticatedActor, CreateAnimalRequest, LocationRequest,
    create_animal, create_animal_type, create_location,
};

/// Cheapest cost bcrypt accepts; keeps the suite fast.
const TEST_HASH_COST: u32 = 4;

/// A fresh database with one account per role.
pub struct Fixture {
    pub persistence: Persistence,
    pub admin: AuthenticatedActor,
    pub chipper: AuthenticatedActor,
    pub user: AuthenticatedActor,
}

fn seed_account(
    persistence: &mut Persistence,
    first_name: &str,
    role: Role,
) -> AuthenticatedActor {
    let fields: AccountFields = AccountFields {
        first_name: String::from(first_name),
        last_name: String::from("Tester"),
        email: format!("{}@park.org", first_name.to_lowercase()),
    };
    let account: Account = persistence
        .create_account(&fields, "secret", role)
        .expect("Failed to seed account");
    AuthenticatedActor::new(account.account_id, account.role)
}

pub fn setup() -> Fixture {
    let mut persistence: Persistence = Persistence::new_in_memory()
        .expect("Failed to create persistence")
        .with_password_hash_cost(TEST_HASH_COST);
    let admin: AuthenticatedActor = seed_account(&mut persistence, "Admin", Role::Admin);
    let chipper: AuthenticatedActor = seed_account(&mut persistence, "Chipper", Role::Chipper);
    let user: AuthenticatedActor = seed_account(&mut persistence, "User", Role::User);
    Fixture {
        persistence,
        admin,
        chipper,
        user,
    }
}

impl Fixture {
    pub fn location(&mut self, latitude: f64, longitude: f64) -> i64 {
        let request: LocationRequest = LocationRequest {
            latitude: Some(latitude),
            longitude: Some(longitude),
        };
        create_location(&mut self.persistence, &request, Some(&self.chipper))
            .expect("Failed to create location")
            .id
    }

    pub fn animal_type(&mut self, name: &str) -> i64 {
        let request: AnimalTypeRequest = AnimalTypeRequest {
            name: Some(String::from(name)),
        };
        create_animal_type(&mut self.persistence, &request, Some(&self.chipper))
            .expect("Failed to create animal type")
            .id
    }

    pub fn animal(&mut self, type_ids: &[i64], chipping_location_id: i64) -> AnimalResponse {
        let request: CreateAnimalRequest =
            animal_request(type_ids, self.chipper.account_id, chipping_location_id);
        create_animal(&mut self.persistence, &request, Some(&self.chipper))
            .expect("Failed to create animal")
    }
}

pub fn animal_request(
    type_ids: &[i64],
    chipper_id: i64,
    chipping_location_id: i64,
) -> CreateAnimalRequest {
    CreateAnimalRequest {
        animal_types: Some(type_ids.to_vec()),
        weight: Some(40.0),
        length: Some(1.5),
        height: Some(0.8),
        gender: Some(String::from("FEMALE")),
        chipper_id: Some(chipper_id),
        chipping_location_id: Some(chipping_location_id),
    }
}
