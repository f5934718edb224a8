// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use crate::{StoreError, TrailStore};
use chipwatch_domain::{
    Account, Animal, AnimalType, Area, Coordinates, Gender, LifeStatus, Location, Role, Sighting,
    trail_order,
};
use time::macros::datetime;
use time::{Date, Duration, OffsetDateTime};

pub const CHIPPED_AT: OffsetDateTime = datetime!(2026-03-01 08:00 UTC);
pub const CHIPPER_ID: i64 = 1;

/// In-memory trail store used by the engine tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub accounts: BTreeMap<i64, Account>,
    pub animals: BTreeMap<i64, Animal>,
    pub animal_types: BTreeMap<i64, AnimalType>,
    pub locations: BTreeMap<i64, Location>,
    pub sightings: BTreeMap<i64, Sighting>,
    pub areas: BTreeMap<i64, Area>,
    next_sighting_id: i64,
    /// Number of upcoming mutations that lose a race against another writer.
    pub conflicts_to_inject: u32,
    /// Number of mutations that reached the store, including refused ones.
    pub mutation_calls: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        let mut store: Self = Self {
            next_sighting_id: 1,
            ..Self::default()
        };
        store.accounts.insert(
            CHIPPER_ID,
            Account {
                account_id: CHIPPER_ID,
                first_name: String::from("Ada"),
                last_name: String::from("Ranger"),
                email: String::from("ada@park.org"),
                role: Role::Chipper,
            },
        );
        store.add_animal_type(1, "wolf");
        store
    }

    pub fn add_location(&mut self, location_id: i64, latitude: f64, longitude: f64) {
        self.locations.insert(
            location_id,
            Location {
                location_id,
                coordinates: Coordinates::new(latitude, longitude).unwrap(),
            },
        );
    }

    pub fn add_animal_type(&mut self, type_id: i64, name: &str) {
        self.animal_types.insert(
            type_id,
            AnimalType {
                type_id,
                name: String::from(name),
            },
        );
    }

    pub fn add_animal(&mut self, animal_id: i64, chipping_location_id: i64) {
        self.animals.insert(
            animal_id,
            Animal {
                animal_id,
                type_ids: vec![1],
                weight: 40.0,
                length: 1.5,
                height: 0.8,
                gender: Gender::Male,
                life_status: LifeStatus::Alive,
                chipping_date_time: CHIPPED_AT,
                chipper_id: CHIPPER_ID,
                chipping_location_id,
                death_date_time: None,
                revision: 0,
            },
        );
    }

    /// Inserts a sighting directly, bypassing the engine rules.
    pub fn seed_sighting(&mut self, animal_id: i64, location_id: i64, days_after_chipping: i64) {
        let sighting_id: i64 = self.next_sighting_id;
        self.next_sighting_id += 1;
        self.sightings.insert(
            sighting_id,
            Sighting {
                sighting_id,
                animal_id,
                location_id,
                visited_at: CHIPPED_AT + Duration::days(days_after_chipping),
            },
        );
    }

    pub fn add_area(&mut self, area_id: i64, points: &[(f64, f64)]) {
        self.areas.insert(
            area_id,
            Area {
                area_id,
                name: format!("area-{area_id}"),
                points: points
                    .iter()
                    .map(|&(lat, lon)| Coordinates::new(lat, lon).unwrap())
                    .collect(),
            },
        );
    }

    pub fn trail_locations(&self, animal_id: i64) -> Vec<i64> {
        let mut trail: Vec<Sighting> = self
            .sightings
            .values()
            .filter(|s| s.animal_id == animal_id)
            .copied()
            .collect();
        trail.sort_by_key(trail_order);
        trail.iter().map(|s| s.location_id).collect()
    }

    pub fn trail_ids(&self, animal_id: i64) -> Vec<i64> {
        let mut trail: Vec<Sighting> = self
            .sightings
            .values()
            .filter(|s| s.animal_id == animal_id)
            .copied()
            .collect();
        trail.sort_by_key(trail_order);
        trail.iter().map(|s| s.sighting_id).collect()
    }

    /// Checks the revision and bumps it, simulating a concurrent writer
    /// while conflicts remain to be injected.
    fn claim(&mut self, animal_id: i64, expected_revision: i64) -> Result<(), StoreError> {
        self.mutation_calls += 1;
        let animal: &mut Animal = self
            .animals
            .get_mut(&animal_id)
            .ok_or_else(|| StoreError::Backend(format!("no animal {animal_id}")))?;

        if self.conflicts_to_inject > 0 {
            self.conflicts_to_inject -= 1;
            animal.revision += 1;
            return Err(StoreError::RevisionConflict { animal_id });
        }
        if animal.revision != expected_revision {
            return Err(StoreError::RevisionConflict { animal_id });
        }
        animal.revision += 1;
        Ok(())
    }
}

impl TrailStore for MemoryStore {
    fn get_animal(&mut self, animal_id: i64) -> Result<Option<Animal>, StoreError> {
        Ok(self.animals.get(&animal_id).cloned())
    }

    fn get_trail(&mut self, animal_id: i64) -> Result<Vec<Sighting>, StoreError> {
        let mut trail: Vec<Sighting> = self
            .sightings
            .values()
            .filter(|s| s.animal_id == animal_id)
            .copied()
            .collect();
        trail.sort_by_key(trail_order);
        Ok(trail)
    }

    fn get_sighting(&mut self, sighting_id: i64) -> Result<Option<Sighting>, StoreError> {
        Ok(self.sightings.get(&sighting_id).copied())
    }

    fn get_location(&mut self, location_id: i64) -> Result<Option<Location>, StoreError> {
        Ok(self.locations.get(&location_id).copied())
    }

    fn get_account(&mut self, account_id: i64) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(&account_id).cloned())
    }

    fn get_animal_type(&mut self, type_id: i64) -> Result<Option<AnimalType>, StoreError> {
        Ok(self.animal_types.get(&type_id).cloned())
    }

    fn get_area(&mut self, area_id: i64) -> Result<Option<Area>, StoreError> {
        Ok(self.areas.get(&area_id).cloned())
    }

    fn create_sighting(
        &mut self,
        animal_id: i64,
        location_id: i64,
        visited_at: OffsetDateTime,
        expected_revision: i64,
    ) -> Result<Sighting, StoreError> {
        self.claim(animal_id, expected_revision)?;
        let sighting_id: i64 = self.next_sighting_id;
        self.next_sighting_id += 1;
        let sighting: Sighting = Sighting {
            sighting_id,
            animal_id,
            location_id,
            visited_at,
        };
        self.sightings.insert(sighting_id, sighting);
        Ok(sighting)
    }

    fn delete_sightings(
        &mut self,
        animal_id: i64,
        sighting_ids: &[i64],
        expected_revision: i64,
    ) -> Result<(), StoreError> {
        self.claim(animal_id, expected_revision)?;
        for sighting_id in sighting_ids {
            self.sightings.remove(sighting_id);
        }
        Ok(())
    }

    fn relocate_sighting(
        &mut self,
        animal_id: i64,
        sighting_id: i64,
        location_id: i64,
        expected_revision: i64,
    ) -> Result<Sighting, StoreError> {
        self.claim(animal_id, expected_revision)?;
        let sighting: &mut Sighting = self
            .sightings
            .get_mut(&sighting_id)
            .ok_or_else(|| StoreError::Backend(format!("no sighting {sighting_id}")))?;
        sighting.location_id = location_id;
        Ok(*sighting)
    }

    fn update_animal(
        &mut self,
        animal: &Animal,
        expected_revision: i64,
    ) -> Result<Animal, StoreError> {
        self.claim(animal.animal_id, expected_revision)?;
        let stored: &mut Animal = self.animals.get_mut(&animal.animal_id).unwrap();
        let revision: i64 = stored.revision;
        let type_ids: Vec<i64> = stored.type_ids.clone();
        *stored = Animal {
            revision,
            type_ids,
            ..animal.clone()
        };
        Ok(stored.clone())
    }

    fn set_animal_types(
        &mut self,
        animal_id: i64,
        type_ids: &[i64],
        expected_revision: i64,
    ) -> Result<Animal, StoreError> {
        self.claim(animal_id, expected_revision)?;
        let stored: &mut Animal = self.animals.get_mut(&animal_id).unwrap();
        stored.type_ids = type_ids.to_vec();
        Ok(stored.clone())
    }

    fn list_locations(&mut self) -> Result<Vec<Location>, StoreError> {
        Ok(self.locations.values().copied().collect())
    }

    fn list_animal_types(&mut self) -> Result<Vec<AnimalType>, StoreError> {
        Ok(self.animal_types.values().cloned().collect())
    }

    fn list_sightings(&mut self, until: Option<Date>) -> Result<Vec<Sighting>, StoreError> {
        Ok(self
            .sightings
            .values()
            .filter(|s| until.is_none_or(|end| s.visited_at.date() <= end))
            .copied()
            .collect())
    }

    fn list_candidate_animals(
        &mut self,
        location_ids: &[i64],
        until: Option<Date>,
    ) -> Result<Vec<Animal>, StoreError> {
        let sighted: Vec<i64> = self
            .list_sightings(until)?
            .iter()
            .filter(|s| location_ids.contains(&s.location_id))
            .map(|s| s.animal_id)
            .collect();
        Ok(self
            .animals
            .values()
            .filter(|a| {
                location_ids.contains(&a.chipping_location_id) || sighted.contains(&a.animal_id)
            })
            .cloned()
            .collect())
    }
}
