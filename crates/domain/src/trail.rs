// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Movement trail rules.
//!
//! An animal's logical route is its chipping location followed by its
//! sightings, oldest first. No two neighbouring positions on that route may
//! reference the same location. The functions here only decide; they never
//! write. Callers load the animal and its trail, ask the trail whether a
//! change is allowed, and then issue exactly one store mutation.

use time::OffsetDateTime;

use crate::error::DomainError;
use crate::types::{Animal, AnimalAttributes, LifeStatus, Sighting};

/// One position on an animal's route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The chipping location, always first.
    Chipping {
        /// Where the animal was chipped.
        location_id: i64,
    },
    /// A recorded sighting.
    Sighting {
        /// The sighting record.
        sighting_id: i64,
        /// Where the animal was seen.
        location_id: i64,
    },
}

impl Position {
    #[must_use]
    pub const fn location_id(&self) -> i64 {
        match self {
            Self::Chipping { location_id } | Self::Sighting { location_id, .. } => *location_id,
        }
    }
}

/// Sort key that defines trail order.
#[must_use]
pub fn trail_order(sighting: &Sighting) -> (OffsetDateTime, i64) {
    (sighting.visited_at, sighting.sighting_id)
}

/// An animal together with its sightings in trail order.
#[derive(Debug, Clone)]
pub struct Trail<'a> {
    animal: &'a Animal,
    sightings: Vec<Sighting>,
}

impl<'a> Trail<'a> {
    /// Builds a trail, ordering the sightings oldest first.
    ///
    /// Sightings belonging to other animals are discarded.
    #[must_use]
    pub fn new(animal: &'a Animal, mut sightings: Vec<Sighting>) -> Self {
        sightings.retain(|sighting| sighting.animal_id == animal.animal_id);
        sightings.sort_by_key(trail_order);
        Self { animal, sightings }
    }

    #[must_use]
    pub const fn animal(&self) -> &Animal {
        self.animal
    }

    #[must_use]
    pub fn sightings(&self) -> &[Sighting] {
        &self.sightings
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sightings.is_empty()
    }

    /// Returns the full route, chipping location first.
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = Vec::with_capacity(self.sightings.len() + 1);
        positions.push(Position::Chipping {
            location_id: self.animal.chipping_location_id,
        });
        positions.extend(self.sightings.iter().map(|sighting| Position::Sighting {
            sighting_id: sighting.sighting_id,
            location_id: sighting.location_id,
        }));
        positions
    }

    fn index_of(&self, sighting_id: i64) -> Result<usize, DomainError> {
        self.sightings
            .iter()
            .position(|sighting| sighting.sighting_id == sighting_id)
            .ok_or(DomainError::SightingNotFound {
                animal_id: self.animal.animal_id,
                sighting_id,
            })
    }

    /// Decides whether a new sighting at `location_id` may be appended.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The animal is dead
    /// - The trail is empty and the location is the chipping location
    /// - The location equals the latest sighting's location
    pub fn check_append(&self, location_id: i64) -> Result<(), DomainError> {
        if self.animal.is_dead() {
            return Err(DomainError::AnimalDead(self.animal.animal_id));
        }

        match self.sightings.last() {
            None if self.animal.chipping_location_id == location_id => {
                Err(DomainError::RepeatingChippingLocation {
                    animal_id: self.animal.animal_id,
                    location_id,
                })
            }
            Some(last) if last.location_id == location_id => Err(DomainError::RepeatingLocation {
                animal_id: self.animal.animal_id,
                location_id,
            }),
            _ => Ok(()),
        }
    }

    /// Returns the ids of every sighting to delete when removing `sighting_id`.
    ///
    /// The target always comes first. When the target is the oldest sighting
    /// and the second oldest sits at the chipping location, the second oldest
    /// is removed with it. No other neighbourhood is repaired.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SightingNotFound` if the sighting is not on this
    /// trail.
    pub fn plan_removal(&self, sighting_id: i64) -> Result<Vec<i64>, DomainError> {
        let index: usize = self.index_of(sighting_id)?;
        let mut doomed: Vec<i64> = vec![sighting_id];

        if index == 0
            && let Some(second) = self.sightings.get(1)
            && second.location_id == self.animal.chipping_location_id
        {
            doomed.push(second.sighting_id);
        }

        Ok(doomed)
    }

    /// Decides whether `target` may be moved to `new_location_id`.
    ///
    /// `target` is the stored sighting as looked up by id; it may belong to
    /// another animal, in which case it is reported as not found.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The sighting already points at `new_location_id`
    /// - The sighting is not on this trail
    /// - The previous position (the chipping location for the oldest
    ///   sighting) is at `new_location_id`
    /// - The next sighting is at `new_location_id`
    pub fn check_relocation(
        &self,
        target: &Sighting,
        new_location_id: i64,
    ) -> Result<(), DomainError> {
        if target.location_id == new_location_id {
            return Err(DomainError::SameLocation {
                sighting_id: target.sighting_id,
                location_id: new_location_id,
            });
        }

        let index: usize = self.index_of(target.sighting_id)?;
        let positions: Vec<Position> = self.positions();

        // positions[index] precedes the target, positions[index + 2] follows it
        match positions[index] {
            Position::Chipping { location_id } if location_id == new_location_id => {
                return Err(DomainError::RepeatingChippingLocation {
                    animal_id: self.animal.animal_id,
                    location_id,
                });
            }
            Position::Sighting { location_id, .. } if location_id == new_location_id => {
                return Err(DomainError::RepeatsPreviousLocation {
                    sighting_id: target.sighting_id,
                    location_id,
                });
            }
            _ => {}
        }

        if let Some(next) = positions.get(index + 2)
            && next.location_id() == new_location_id
        {
            return Err(DomainError::RepeatsNextLocation {
                sighting_id: target.sighting_id,
                location_id: new_location_id,
            });
        }

        Ok(())
    }

    /// Decides whether the animal may take on `attributes`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The animal is dead and `attributes` would make it alive
    /// - The new chipping location equals the oldest sighting's location
    pub fn check_attributes(&self, attributes: &AnimalAttributes) -> Result<(), DomainError> {
        if self.animal.is_dead() && attributes.life_status == LifeStatus::Alive {
            return Err(DomainError::AnimalResurrection(self.animal.animal_id));
        }

        if let Some(first) = self.sightings.first()
            && first.location_id == attributes.chipping_location_id
        {
            return Err(DomainError::ChippingLocationMatchesFirstSighting {
                animal_id: self.animal.animal_id,
                location_id: first.location_id,
            });
        }

        Ok(())
    }

    /// Decides whether the animal may be deleted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AnimalHasSightings` while the trail is non-empty.
    pub fn check_deletable(&self) -> Result<(), DomainError> {
        if self.sightings.is_empty() {
            Ok(())
        } else {
            Err(DomainError::AnimalHasSightings(self.animal.animal_id))
        }
    }
}

/// Produces the animal as it looks after `attributes` are applied.
///
/// The death timestamp is stamped with `now` the first time the animal is
/// dead and is never overwritten afterwards.
#[must_use]
pub fn apply_attributes(
    animal: &Animal,
    attributes: &AnimalAttributes,
    now: OffsetDateTime,
) -> Animal {
    let mut updated: Animal = animal.clone();
    updated.weight = attributes.weight;
    updated.length = attributes.length;
    updated.height = attributes.height;
    updated.gender = attributes.gender;
    updated.life_status = attributes.life_status;
    updated.chipper_id = attributes.chipper_id;
    updated.chipping_location_id = attributes.chipping_location_id;

    if updated.is_dead() && updated.death_date_time.is_none() {
        updated.death_date_time = Some(now);
    }

    updated
}
