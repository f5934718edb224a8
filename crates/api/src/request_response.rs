// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Every DTO uses camelCase on the wire. Request fields the caller must send
//! are still `Option`s so that a missing value is reported as invalid input
//! by the handler instead of being rejected by the deserializer.

use serde::{Deserialize, Serialize};

/// Default page offset for search endpoints.
pub const DEFAULT_FROM: i64 = 0;
/// Default page size for search endpoints.
pub const DEFAULT_SIZE: i64 = 10;

// ============================================================================
// Accounts
// ============================================================================

/// API request to register, create or update an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Only honoured when an administrator creates or updates an account.
    pub role: Option<String>,
}

/// API response describing an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

/// Query parameters for account search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSearchQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

// ============================================================================
// Locations
// ============================================================================

/// API request to create or move a location; also the lookup query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

// ============================================================================
// Animal types
// ============================================================================

/// API request to create or rename an animal type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalTypeRequest {
    #[serde(rename = "type")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalTypeResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub name: String,
}

/// API request to swap one of an animal's types for another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceAnimalTypeRequest {
    pub old_type_id: Option<i64>,
    pub new_type_id: Option<i64>,
}

// ============================================================================
// Animals
// ============================================================================

/// API request to chip a new animal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnimalRequest {
    pub animal_types: Option<Vec<i64>>,
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub chipper_id: Option<i64>,
    pub chipping_location_id: Option<i64>,
}

/// API request to replace an animal's attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnimalRequest {
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub life_status: Option<String>,
    pub chipper_id: Option<i64>,
    pub chipping_location_id: Option<i64>,
}

/// API response describing an animal, its types and its trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalResponse {
    pub id: i64,
    pub animal_types: Vec<i64>,
    pub weight: f64,
    pub length: f64,
    pub height: f64,
    pub gender: String,
    pub life_status: String,
    /// RFC 3339.
    pub chipping_date_time: String,
    pub chipper_id: i64,
    pub chipping_location_id: i64,
    /// Sighting IDs, oldest first.
    pub visited_locations: Vec<i64>,
    /// RFC 3339; absent while the animal is alive.
    pub death_date_time: Option<String>,
}

/// Query parameters for animal search. Date-times are RFC 3339.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalSearchQuery {
    pub start_date_time: Option<String>,
    pub end_date_time: Option<String>,
    pub chipper_id: Option<i64>,
    pub chipping_location_id: Option<i64>,
    pub life_status: Option<String>,
    pub gender: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

// ============================================================================
// Sightings
// ============================================================================

/// API response describing one sighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingResponse {
    pub id: i64,
    /// RFC 3339.
    pub date_time_of_visit_location_point: String,
    pub location_point_id: i64,
}

/// API request to point a sighting at another location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSightingRequest {
    pub visited_location_point_id: Option<i64>,
    pub location_point_id: Option<i64>,
}

/// Query parameters for listing an animal's sightings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingSearchQuery {
    pub start_date_time: Option<String>,
    pub end_date_time: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

// ============================================================================
// Areas
// ============================================================================

/// A polygon vertex in an area request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaPointRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// API request to create or replace an area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaRequest {
    pub name: Option<String>,
    pub area_points: Option<Vec<AreaPointRequest>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaPointResponse {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaResponse {
    pub id: i64,
    pub name: String,
    pub area_points: Vec<AreaPointResponse>,
}

/// Query parameters for area analytics. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaAnalyticsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Per-type counts in an analytics response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalTypeAnalyticsResponse {
    pub animal_type: String,
    pub animal_type_id: i64,
    pub quantity_animals: u64,
    pub animals_arrived: u64,
    pub animals_gone: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaAnalyticsResponse {
    pub total_quantity_animals: u64,
    pub total_animals_arrived: u64,
    pub total_animals_gone: u64,
    pub animals_analytics: Vec<AnimalTypeAnalyticsResponse>,
}
