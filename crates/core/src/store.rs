// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::{Account, Animal, AnimalType, Area, Location, Sighting};
use time::{Date, OffsetDateTime};

/// Failures reported by a [`TrailStore`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The animal's revision moved on since it was read.
    #[error("animal {animal_id} was modified since it was read")]
    RevisionConflict {
        /// The contested animal.
        animal_id: i64,
    },
    /// Any other backend failure.
    #[error("{0}")]
    Backend(String),
}

/// Storage the engine reads trails from and writes trail changes to.
///
/// Every mutation names the animal it belongs to and the revision the
/// caller read. An implementation must apply the change and advance the
/// revision atomically, and must refuse with
/// [`StoreError::RevisionConflict`] when the stored revision differs.
/// Methods take `&mut self` because backends hold a single connection.
pub trait TrailStore {
    /// Looks up an animal, including its type ids and current revision.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get_animal(&mut self, animal_id: i64) -> Result<Option<Animal>, StoreError>;

    /// Returns every sighting of an animal, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get_trail(&mut self, animal_id: i64) -> Result<Vec<Sighting>, StoreError>;

    /// Looks up a sighting by id regardless of the animal it belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get_sighting(&mut self, sighting_id: i64) -> Result<Option<Sighting>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get_location(&mut self, location_id: i64) -> Result<Option<Location>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get_account(&mut self, account_id: i64) -> Result<Option<Account>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get_animal_type(&mut self, type_id: i64) -> Result<Option<AnimalType>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get_area(&mut self, area_id: i64) -> Result<Option<Area>, StoreError>;

    /// Appends a sighting to an animal's trail.
    ///
    /// # Errors
    ///
    /// Returns an error on revision conflict or backend failure.
    fn create_sighting(
        &mut self,
        animal_id: i64,
        location_id: i64,
        visited_at: OffsetDateTime,
        expected_revision: i64,
    ) -> Result<Sighting, StoreError>;

    /// Deletes one or more sightings of an animal in a single write.
    ///
    /// # Errors
    ///
    /// Returns an error on revision conflict or backend failure.
    fn delete_sightings(
        &mut self,
        animal_id: i64,
        sighting_ids: &[i64],
        expected_revision: i64,
    ) -> Result<(), StoreError>;

    /// Points an existing sighting at a different location.
    ///
    /// # Errors
    ///
    /// Returns an error on revision conflict or backend failure.
    fn relocate_sighting(
        &mut self,
        animal_id: i64,
        sighting_id: i64,
        location_id: i64,
        expected_revision: i64,
    ) -> Result<Sighting, StoreError>;

    /// Overwrites an animal's attributes and returns it with its new
    /// revision. Type ids are not touched.
    ///
    /// # Errors
    ///
    /// Returns an error on revision conflict or backend failure.
    fn update_animal(
        &mut self,
        animal: &Animal,
        expected_revision: i64,
    ) -> Result<Animal, StoreError>;

    /// Replaces an animal's type list and returns it with its new revision.
    ///
    /// # Errors
    ///
    /// Returns an error on revision conflict or backend failure.
    fn set_animal_types(
        &mut self,
        animal_id: i64,
        type_ids: &[i64],
        expected_revision: i64,
    ) -> Result<Animal, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn list_locations(&mut self) -> Result<Vec<Location>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn list_animal_types(&mut self) -> Result<Vec<AnimalType>, StoreError>;

    /// Returns every sighting dated on or before `until`, or all of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn list_sightings(&mut self, until: Option<Date>) -> Result<Vec<Sighting>, StoreError>;

    /// Returns, ordered by id, every animal that was chipped at one of
    /// `location_ids` or was sighted at one of them on or before `until`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn list_candidate_animals(
        &mut self,
        location_ids: &[i64],
        until: Option<Date>,
    ) -> Result<Vec<Animal>, StoreError>;
}
