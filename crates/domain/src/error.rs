// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::geometry::AreaRelation;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A scalar field failed validation.
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// Unknown account role.
    InvalidRole(String),
    /// Unknown animal gender.
    InvalidGender(String),
    /// Unknown animal life status.
    InvalidLifeStatus(String),
    /// Latitude outside [-90, 90] or not finite.
    InvalidLatitude(f64),
    /// Longitude outside [-180, 180] or not finite.
    InvalidLongitude(f64),
    /// The polygon of an area is malformed.
    InvalidPolygon(String),
    /// An area polygon collides with an existing area.
    AreaConflict {
        /// The existing area that was hit.
        area_id: i64,
        /// How the candidate relates to it.
        relation: AreaRelation,
    },
    /// Account does not exist.
    AccountNotFound(i64),
    /// Animal does not exist.
    AnimalNotFound(i64),
    /// Animal type does not exist.
    AnimalTypeNotFound(i64),
    /// Location does not exist.
    LocationNotFound(i64),
    /// Area does not exist.
    AreaNotFound(i64),
    /// Sighting does not exist or belongs to another animal.
    SightingNotFound {
        /// The animal whose trail was searched.
        animal_id: i64,
        /// The sighting that was requested.
        sighting_id: i64,
    },
    /// The animal does not carry the given type.
    AnimalTypeNotAssigned {
        /// The animal.
        animal_id: i64,
        /// The type that is missing.
        type_id: i64,
    },
    /// The animal already carries the given type.
    AnimalTypeAlreadyAssigned {
        /// The animal.
        animal_id: i64,
        /// The duplicated type.
        type_id: i64,
    },
    /// The same type id was listed twice for one animal.
    DuplicateAnimalType(i64),
    /// Removing this type would leave the animal without any type.
    LastAnimalType {
        /// The animal.
        animal_id: i64,
        /// The only remaining type.
        type_id: i64,
    },
    /// Sightings cannot be recorded for a dead animal.
    AnimalDead(i64),
    /// A dead animal cannot be brought back to life.
    AnimalResurrection(i64),
    /// The new position would repeat the chipping location.
    RepeatingChippingLocation {
        /// The animal.
        animal_id: i64,
        /// The repeated location.
        location_id: i64,
    },
    /// The new sighting repeats the last recorded location.
    RepeatingLocation {
        /// The animal.
        animal_id: i64,
        /// The repeated location.
        location_id: i64,
    },
    /// The sighting already points at this location.
    SameLocation {
        /// The sighting being updated.
        sighting_id: i64,
        /// Its current location.
        location_id: i64,
    },
    /// The new location repeats the previous position on the trail.
    RepeatsPreviousLocation {
        /// The sighting being updated.
        sighting_id: i64,
        /// The repeated location.
        location_id: i64,
    },
    /// The new location repeats the next position on the trail.
    RepeatsNextLocation {
        /// The sighting being updated.
        sighting_id: i64,
        /// The repeated location.
        location_id: i64,
    },
    /// The new chipping location equals the first sighting's location.
    ChippingLocationMatchesFirstSighting {
        /// The animal.
        animal_id: i64,
        /// The clashing location.
        location_id: i64,
    },
    /// The animal still has sightings and cannot be deleted.
    AnimalHasSightings(i64),
    /// The location is referenced by an animal or a sighting.
    LocationInUse(i64),
    /// The animal type is still assigned to at least one animal.
    AnimalTypeInUse(i64),
    /// The account is the chipper of at least one animal.
    AccountInUse(i64),
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField { field, reason } => write!(f, "Invalid {field}: {reason}"),
            Self::InvalidRole(role) => write!(f, "Unknown role '{role}'"),
            Self::InvalidGender(gender) => write!(f, "Unknown gender '{gender}'"),
            Self::InvalidLifeStatus(status) => write!(f, "Unknown life status '{status}'"),
            Self::InvalidLatitude(value) => {
                write!(f, "Latitude {value} is outside the range [-90, 90]")
            }
            Self::InvalidLongitude(value) => {
                write!(f, "Longitude {value} is outside the range [-180, 180]")
            }
            Self::InvalidPolygon(reason) => write!(f, "Invalid area polygon: {reason}"),
            Self::AreaConflict { area_id, relation } => {
                write!(f, "Area polygon {relation} area {area_id}")
            }
            Self::AccountNotFound(id) => write!(f, "Account {id} not found"),
            Self::AnimalNotFound(id) => write!(f, "Animal {id} not found"),
            Self::AnimalTypeNotFound(id) => write!(f, "Animal type {id} not found"),
            Self::LocationNotFound(id) => write!(f, "Location {id} not found"),
            Self::AreaNotFound(id) => write!(f, "Area {id} not found"),
            Self::SightingNotFound {
                animal_id,
                sighting_id,
            } => {
                write!(
                    f,
                    "Sighting {sighting_id} not found on the trail of animal {animal_id}"
                )
            }
            Self::AnimalTypeNotAssigned { animal_id, type_id } => {
                write!(f, "Animal {animal_id} does not have type {type_id}")
            }
            Self::AnimalTypeAlreadyAssigned { animal_id, type_id } => {
                write!(f, "Animal {animal_id} already has type {type_id}")
            }
            Self::DuplicateAnimalType(type_id) => {
                write!(f, "Animal type {type_id} is listed more than once")
            }
            Self::LastAnimalType { animal_id, type_id } => {
                write!(
                    f,
                    "Type {type_id} is the only type of animal {animal_id} and cannot be removed"
                )
            }
            Self::AnimalDead(id) => write!(f, "Animal {id} is dead"),
            Self::AnimalResurrection(id) => {
                write!(f, "Animal {id} is dead and cannot become alive again")
            }
            Self::RepeatingChippingLocation {
                animal_id,
                location_id,
            } => {
                write!(
                    f,
                    "Location {location_id} repeats the chipping location of animal {animal_id}"
                )
            }
            Self::RepeatingLocation {
                animal_id,
                location_id,
            } => {
                write!(
                    f,
                    "Location {location_id} repeats the last location of animal {animal_id}"
                )
            }
            Self::SameLocation {
                sighting_id,
                location_id,
            } => {
                write!(
                    f,
                    "Sighting {sighting_id} already points at location {location_id}"
                )
            }
            Self::RepeatsPreviousLocation {
                sighting_id,
                location_id,
            } => {
                write!(
                    f,
                    "Location {location_id} repeats the position before sighting {sighting_id}"
                )
            }
            Self::RepeatsNextLocation {
                sighting_id,
                location_id,
            } => {
                write!(
                    f,
                    "Location {location_id} repeats the position after sighting {sighting_id}"
                )
            }
            Self::ChippingLocationMatchesFirstSighting {
                animal_id,
                location_id,
            } => {
                write!(
                    f,
                    "Chipping location {location_id} equals the first sighting of animal {animal_id}"
                )
            }
            Self::AnimalHasSightings(id) => {
                write!(f, "Animal {id} has recorded sightings and cannot be deleted")
            }
            Self::LocationInUse(id) => {
                write!(f, "Location {id} is referenced by animals or sightings")
            }
            Self::AnimalTypeInUse(id) => {
                write!(f, "Animal type {id} is assigned to at least one animal")
            }
            Self::AccountInUse(id) => {
                write!(f, "Account {id} is the chipper of at least one animal")
            }
        }
    }
}

impl std::error::Error for DomainError {}
