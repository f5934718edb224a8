// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the animal tracking service.
//!
//! This crate owns authorization, the wire DTOs and the translation of
//! domain, engine and storage failures into API errors. It knows nothing
//! about HTTP; the server crate maps [`ApiError`] to status codes.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    add_animal_type, add_sighting, area_analytics, create_account, create_animal,
    create_animal_type, create_area, create_location, delete_account, delete_animal,
    delete_animal_type, delete_area, delete_location, delete_sighting, find_location, get_account,
    get_animal, get_animal_type, get_area, get_location, list_sightings, register_account,
    remove_animal_type, replace_animal_type, search_accounts, search_animals, update_account,
    update_animal, update_animal_type, update_area, update_location, update_sighting,
};
pub use request_response::{
    AccountRequest, AccountResponse, AccountSearchQuery, AnimalResponse, AnimalSearchQuery,
    AnimalTypeAnalyticsResponse, AnimalTypeRequest, AnimalTypeResponse, AreaAnalyticsQuery,
    AreaAnalyticsResponse, AreaPointRequest, AreaPointResponse, AreaRequest, AreaResponse,
    CreateAnimalRequest, DEFAULT_FROM, DEFAULT_SIZE, LocationRequest, LocationResponse,
    ReplaceAnimalTypeRequest, SightingResponse, SightingSearchQuery, UpdateAnimalRequest,
    UpdateSightingRequest,
};
