// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Role of an account.
///
/// Roles are totally ordered: `Admin > Chipper > User`. An operation that
/// requires a role is permitted for that role and every role above it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Read access and self-service on the own account.
    #[default]
    User,
    /// May chip animals and record their movements.
    Chipper,
    /// Full structural authority, including deletions and areas.
    Admin,
}

impl Role {
    /// Returns the wire representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Chipper => "CHIPPER",
            Self::Admin => "ADMIN",
        }
    }

    /// Returns whether this role meets the `required` minimum.
    #[must_use]
    pub fn satisfies(self, required: Self) -> bool {
        self >= required
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "CHIPPER" => Ok(Self::Chipper),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Life status of an animal. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LifeStatus {
    #[default]
    Alive,
    Dead,
}

impl LifeStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alive => "ALIVE",
            Self::Dead => "DEAD",
        }
    }
}

impl FromStr for LifeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALIVE" => Ok(Self::Alive),
            "DEAD" => Ok(Self::Dead),
            _ => Err(DomainError::InvalidLifeStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for LifeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Other => "OTHER",
        }
    }
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Self::Male),
            "FEMALE" => Ok(Self::Female),
            "OTHER" => Ok(Self::Other),
            _ => Err(DomainError::InvalidGender(s.to_string())),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Creates a point after range-checking both axes.
    ///
    /// # Arguments
    ///
    /// * `latitude` - Degrees north, within [-90, 90]
    /// * `longitude` - Degrees east, within [-180, 180]
    ///
    /// # Errors
    ///
    /// Returns an error if either value is not finite or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A stored geographic point. Coordinates are unique across locations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub location_id: i64,
    pub coordinates: Coordinates,
}

/// Editable fields of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub account_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

/// A named classification such as "wolf" or "fox".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnimalType {
    pub type_id: i64,
    pub name: String,
}

/// A chipped animal.
///
/// The chipping location is the logical first position of the animal's
/// route; sightings follow it in time order. `revision` increases with every
/// committed change to the animal or its trail and is used to detect
/// concurrent modification.
#[derive(Debug, Clone, PartialEq)]
pub struct Animal {
    pub animal_id: i64,
    pub type_ids: Vec<i64>,
    pub weight: f64,
    pub length: f64,
    pub height: f64,
    pub gender: Gender,
    pub life_status: LifeStatus,
    pub chipping_date_time: OffsetDateTime,
    pub chipper_id: i64,
    pub chipping_location_id: i64,
    pub death_date_time: Option<OffsetDateTime>,
    pub revision: i64,
}

impl Animal {
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.life_status == LifeStatus::Dead
    }

    #[must_use]
    pub fn has_type(&self, type_id: i64) -> bool {
        self.type_ids.contains(&type_id)
    }
}

/// Payload for chipping a new animal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnimal {
    pub type_ids: Vec<i64>,
    pub weight: f64,
    pub length: f64,
    pub height: f64,
    pub gender: Gender,
    pub chipper_id: i64,
    pub chipping_location_id: i64,
}

/// Replacement attributes for an existing animal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimalAttributes {
    pub weight: f64,
    pub length: f64,
    pub height: f64,
    pub gender: Gender,
    pub life_status: LifeStatus,
    pub chipper_id: i64,
    pub chipping_location_id: i64,
}

/// A timestamped observation of an animal at a location, after chipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sighting {
    pub sighting_id: i64,
    pub animal_id: i64,
    pub location_id: i64,
    pub visited_at: OffsetDateTime,
}

/// A named polygon used for geofence analytics.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub area_id: i64,
    pub name: String,
    pub points: Vec<Coordinates>,
}
