// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use chipwatch_domain::{
    Account, Animal, AnimalType, Coordinates, Gender, LifeStatus, Location, Role, Sighting,
};
use diesel::prelude::*;
use time::OffsetDateTime;

use crate::diesel_schema::{accounts, animal_types, animals, area_points, locations, sightings};
use crate::error::PersistenceError;
use crate::timestamps;

/// Filters for account search. Text filters match case-insensitive
/// substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountSearch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub from: i64,
    pub size: i64,
}

/// Filters for animal search. Chipping time bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimalSearch {
    pub start_date_time: Option<OffsetDateTime>,
    pub end_date_time: Option<OffsetDateTime>,
    pub chipper_id: Option<i64>,
    pub chipping_location_id: Option<i64>,
    pub life_status: Option<LifeStatus>,
    pub gender: Option<Gender>,
    pub from: i64,
    pub size: i64,
}

/// Filters for one animal's sightings. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SightingSearch {
    pub start_date_time: Option<OffsetDateTime>,
    pub end_date_time: Option<OffsetDateTime>,
    pub from: i64,
    pub size: i64,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = accounts)]
pub struct AccountRow {
    pub account_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl AccountRow {
    pub fn into_account(self) -> Result<Account, PersistenceError> {
        Ok(Account {
            account_id: self.account_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            role: Role::from_str(&self.role)
                .map_err(|e| PersistenceError::CorruptRow(e.to_string()))?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = locations)]
pub struct LocationRow {
    pub location_id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationRow {
    pub fn into_location(self) -> Result<Location, PersistenceError> {
        Ok(Location {
            location_id: self.location_id,
            coordinates: Coordinates::new(self.latitude, self.longitude)
                .map_err(|e| PersistenceError::CorruptRow(e.to_string()))?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = animal_types)]
pub struct AnimalTypeRow {
    pub type_id: i64,
    pub name: String,
}

impl From<AnimalTypeRow> for AnimalType {
    fn from(row: AnimalTypeRow) -> Self {
        Self {
            type_id: row.type_id,
            name: row.name,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = animals)]
pub struct AnimalRow {
    pub animal_id: i64,
    pub weight: f64,
    pub length: f64,
    pub height: f64,
    pub gender: String,
    pub life_status: String,
    pub chipping_date_time: String,
    pub chipper_id: i64,
    pub chipping_location_id: i64,
    pub death_date_time: Option<String>,
    pub revision: i64,
}

impl AnimalRow {
    /// Builds the domain animal; type ids are loaded separately.
    pub fn into_animal(self, type_ids: Vec<i64>) -> Result<Animal, PersistenceError> {
        Ok(Animal {
            animal_id: self.animal_id,
            type_ids,
            weight: self.weight,
            length: self.length,
            height: self.height,
            gender: Gender::from_str(&self.gender)
                .map_err(|e| PersistenceError::CorruptRow(e.to_string()))?,
            life_status: LifeStatus::from_str(&self.life_status)
                .map_err(|e| PersistenceError::CorruptRow(e.to_string()))?,
            chipping_date_time: timestamps::decode(&self.chipping_date_time)?,
            chipper_id: self.chipper_id,
            chipping_location_id: self.chipping_location_id,
            death_date_time: self
                .death_date_time
                .as_deref()
                .map(timestamps::decode)
                .transpose()?,
            revision: self.revision,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = sightings)]
pub struct SightingRow {
    pub sighting_id: i64,
    pub animal_id: i64,
    pub location_id: i64,
    pub visited_at: String,
}

impl SightingRow {
    pub fn into_sighting(self) -> Result<Sighting, PersistenceError> {
        Ok(Sighting {
            sighting_id: self.sighting_id,
            animal_id: self.animal_id,
            location_id: self.location_id,
            visited_at: timestamps::decode(&self.visited_at)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = area_points)]
pub struct AreaPointRow {
    pub area_id: i64,
    pub position: i32,
    pub latitude: f64,
    pub longitude: f64,
}
