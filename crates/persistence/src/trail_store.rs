// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The trail store contract over `SQLite`.

use chipwatch::{StoreError, TrailStore};
use chipwatch_domain::{Account, Animal, AnimalType, Area, Location, Sighting};
use time::{Date, OffsetDateTime};

use crate::{Persistence, mutations, queries};

impl TrailStore for Persistence {
    fn get_animal(&mut self, animal_id: i64) -> Result<Option<Animal>, StoreError> {
        Ok(queries::animals::get_animal(&mut self.conn, animal_id)?)
    }

    fn get_trail(&mut self, animal_id: i64) -> Result<Vec<Sighting>, StoreError> {
        Ok(queries::sightings::get_trail(&mut self.conn, animal_id)?)
    }

    fn get_sighting(&mut self, sighting_id: i64) -> Result<Option<Sighting>, StoreError> {
        Ok(queries::sightings::get_sighting(&mut self.conn, sighting_id)?)
    }

    fn get_location(&mut self, location_id: i64) -> Result<Option<Location>, StoreError> {
        Ok(queries::locations::get_location(&mut self.conn, location_id)?)
    }

    fn get_account(&mut self, account_id: i64) -> Result<Option<Account>, StoreError> {
        Ok(queries::accounts::get_account(&mut self.conn, account_id)?)
    }

    fn get_animal_type(&mut self, type_id: i64) -> Result<Option<AnimalType>, StoreError> {
        Ok(queries::animal_types::get_animal_type(&mut self.conn, type_id)?)
    }

    fn get_area(&mut self, area_id: i64) -> Result<Option<Area>, StoreError> {
        Ok(queries::areas::get_area(&mut self.conn, area_id)?)
    }

    fn create_sighting(
        &mut self,
        animal_id: i64,
        location_id: i64,
        visited_at: OffsetDateTime,
        expected_revision: i64,
    ) -> Result<Sighting, StoreError> {
        Ok(mutations::sightings::create_sighting(
            &mut self.conn,
            animal_id,
            location_id,
            visited_at,
            expected_revision,
        )?)
    }

    fn delete_sightings(
        &mut self,
        animal_id: i64,
        sighting_ids: &[i64],
        expected_revision: i64,
    ) -> Result<(), StoreError> {
        Ok(mutations::sightings::delete_sightings(
            &mut self.conn,
            animal_id,
            sighting_ids,
            expected_revision,
        )?)
    }

    fn relocate_sighting(
        &mut self,
        animal_id: i64,
        sighting_id: i64,
        location_id: i64,
        expected_revision: i64,
    ) -> Result<Sighting, StoreError> {
        Ok(mutations::sightings::relocate_sighting(
            &mut self.conn,
            animal_id,
            sighting_id,
            location_id,
            expected_revision,
        )?)
    }

    fn update_animal(
        &mut self,
        animal: &Animal,
        expected_revision: i64,
    ) -> Result<Animal, StoreError> {
        Ok(mutations::animals::update_animal(
            &mut self.conn,
            animal,
            expected_revision,
        )?)
    }

    fn set_animal_types(
        &mut self,
        animal_id: i64,
        type_ids: &[i64],
        expected_revision: i64,
    ) -> Result<Animal, StoreError> {
        Ok(mutations::animals::set_animal_types(
            &mut self.conn,
            animal_id,
            type_ids,
            expected_revision,
        )?)
    }

    fn list_locations(&mut self) -> Result<Vec<Location>, StoreError> {
        Ok(queries::locations::list_locations(&mut self.conn)?)
    }

    fn list_animal_types(&mut self) -> Result<Vec<AnimalType>, StoreError> {
        Ok(queries::animal_types::list_animal_types(&mut self.conn)?)
    }

    fn list_sightings(&mut self, until: Option<Date>) -> Result<Vec<Sighting>, StoreError> {
        Ok(queries::sightings::list_sightings(&mut self.conn, until)?)
    }

    fn list_candidate_animals(
        &mut self,
        location_ids: &[i64],
        until: Option<Date>,
    ) -> Result<Vec<Animal>, StoreError> {
        Ok(queries::animals::list_candidate_animals(
            &mut self.conn,
            location_ids,
            until,
        )?)
    }
}
