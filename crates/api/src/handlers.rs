// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers are synchronous and take the persistence layer by mutable
//! reference. Every handler authorizes first, then validates input, then
//! touches storage. Trail and animal edits go through the core engine so
//! the revision discipline applies to them.

use std::str::FromStr;

use chipwatch::{TrailCommand, TrailOutcome, apply, compute_area_analytics};
use chipwatch_domain::{
    Account, AccountFields, Animal, AnimalAttributes, AnimalType, Area, AreaAnalytics,
    Coordinates, DateWindow, DomainError, Gender, LifeStatus, Location, NewAnimal, Polygon, Role,
    Sighting, Trail, polygon_from_points, validate_account_fields, validate_animal_attributes,
    validate_area_placement, validate_id, validate_new_animal, validate_non_blank,
    validate_password,
};
use chipwatch_persistence::{AccountSearch, AnimalSearch, Persistence, SightingSearch};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::{debug, info};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    AccountRequest, AccountResponse, AccountSearchQuery, AnimalResponse, AnimalSearchQuery,
    AnimalTypeAnalyticsResponse, AnimalTypeRequest, AnimalTypeResponse, AreaAnalyticsQuery,
    AreaAnalyticsResponse, AreaPointResponse, AreaRequest, AreaResponse, CreateAnimalRequest,
    DEFAULT_FROM, DEFAULT_SIZE, LocationRequest, LocationResponse, ReplaceAnimalTypeRequest,
    SightingResponse, SightingSearchQuery, UpdateAnimalRequest, UpdateSightingRequest,
};

// ============================================================================
// Input helpers
// ============================================================================

fn required<T>(field: &str, value: Option<T>) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::InvalidInput {
        field: field.to_string(),
        message: String::from("is required"),
    })
}

fn check_id(field: &'static str, id: i64) -> Result<i64, ApiError> {
    validate_id(field, id).map_err(translate_domain_error)?;
    Ok(id)
}

/// Resolves paging parameters, applying defaults.
fn page(from: Option<i64>, size: Option<i64>) -> Result<(i64, i64), ApiError> {
    let from: i64 = from.unwrap_or(DEFAULT_FROM);
    let size: i64 = size.unwrap_or(DEFAULT_SIZE);
    if from < 0 {
        return Err(ApiError::InvalidInput {
            field: String::from("from"),
            message: String::from("must not be negative"),
        });
    }
    if size < 1 {
        return Err(ApiError::InvalidInput {
            field: String::from("size"),
            message: String::from("must be at least 1"),
        });
    }
    Ok((from, size))
}

fn parse_date_time(field: &str, value: Option<&str>) -> Result<Option<OffsetDateTime>, ApiError> {
    value
        .map(|raw| {
            OffsetDateTime::parse(raw, &Rfc3339).map_err(|e| ApiError::InvalidInput {
                field: field.to_string(),
                message: format!("expected an RFC 3339 date-time: {e}"),
            })
        })
        .transpose()
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<Date>, ApiError> {
    value
        .map(|raw| {
            Date::parse(raw, format_description!("[year]-[month]-[day]")).map_err(|e| {
                ApiError::InvalidInput {
                    field: field.to_string(),
                    message: format!("expected a YYYY-MM-DD date: {e}"),
                }
            })
        })
        .transpose()
}

fn parse_enum<T: FromStr<Err = DomainError>>(value: &str) -> Result<T, ApiError> {
    T::from_str(value).map_err(translate_domain_error)
}

fn parse_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Coordinates, ApiError> {
    let latitude: f64 = required("latitude", latitude)?;
    let longitude: f64 = required("longitude", longitude)?;
    Coordinates::new(latitude, longitude).map_err(translate_domain_error)
}

fn account_fields(request: &AccountRequest) -> Result<(AccountFields, String), ApiError> {
    let fields: AccountFields = AccountFields {
        first_name: required("firstName", request.first_name.clone())?,
        last_name: required("lastName", request.last_name.clone())?,
        email: required("email", request.email.clone())?,
    };
    validate_account_fields(&fields).map_err(translate_domain_error)?;

    let password: String = required("password", request.password.clone())?;
    validate_password(&password).map_err(translate_domain_error)?;
    Ok((fields, password))
}

type ParsedArea = (String, Vec<Coordinates>, Polygon<f64>);

fn area_points(request: &AreaRequest) -> Result<ParsedArea, ApiError> {
    let name: String = required("name", request.name.clone())?;
    validate_non_blank("name", &name).map_err(translate_domain_error)?;

    let points: Vec<Coordinates> = required("areaPoints", request.area_points.as_ref())?
        .iter()
        .map(|point| parse_coordinates(point.latitude, point.longitude))
        .collect::<Result<Vec<Coordinates>, ApiError>>()?;
    let polygon: Polygon<f64> = polygon_from_points(&points).map_err(translate_domain_error)?;
    Ok((name, points, polygon))
}

/// Checks a candidate polygon against every other stored area.
fn check_area_placement(
    persistence: &mut Persistence,
    candidate: &Polygon<f64>,
    exclude: Option<i64>,
) -> Result<(), ApiError> {
    let others: Vec<(i64, Polygon<f64>)> = persistence
        .list_other_areas(exclude)?
        .iter()
        .map(|area| {
            polygon_from_points(&area.points)
                .map(|polygon| (area.area_id, polygon))
                .map_err(|e| ApiError::Internal {
                    message: format!("Stored area {} is invalid: {e}", area.area_id),
                })
        })
        .collect::<Result<Vec<(i64, Polygon<f64>)>, ApiError>>()?;

    validate_area_placement(candidate, &others).map_err(translate_domain_error)
}

fn run_trail_command(
    persistence: &mut Persistence,
    animal_id: i64,
    command: &TrailCommand,
) -> Result<TrailOutcome, ApiError> {
    apply(persistence, animal_id, command, OffsetDateTime::now_utc()).map_err(translate_core_error)
}

// ============================================================================
// Response builders
// ============================================================================

fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, ApiError> {
    timestamp.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

fn account_response(account: Account) -> AccountResponse {
    AccountResponse {
        id: account.account_id,
        first_name: account.first_name,
        last_name: account.last_name,
        email: account.email,
        role: account.role.to_string(),
    }
}

const fn location_response(location: &Location) -> LocationResponse {
    LocationResponse {
        id: location.location_id,
        latitude: location.coordinates.latitude(),
        longitude: location.coordinates.longitude(),
    }
}

fn animal_type_response(animal_type: AnimalType) -> AnimalTypeResponse {
    AnimalTypeResponse {
        id: animal_type.type_id,
        name: animal_type.name,
    }
}

fn animal_response(animal: Animal, trail: &[Sighting]) -> Result<AnimalResponse, ApiError> {
    Ok(AnimalResponse {
        id: animal.animal_id,
        animal_types: animal.type_ids,
        weight: animal.weight,
        length: animal.length,
        height: animal.height,
        gender: animal.gender.to_string(),
        life_status: animal.life_status.to_string(),
        chipping_date_time: format_timestamp(animal.chipping_date_time)?,
        chipper_id: animal.chipper_id,
        chipping_location_id: animal.chipping_location_id,
        visited_locations: trail.iter().map(|sighting| sighting.sighting_id).collect(),
        death_date_time: animal.death_date_time.map(format_timestamp).transpose()?,
    })
}

/// Builds an animal response, loading the trail for it.
fn load_animal_response(
    persistence: &mut Persistence,
    animal: Animal,
) -> Result<AnimalResponse, ApiError> {
    let trail: Vec<Sighting> = persistence.get_trail(animal.animal_id)?;
    animal_response(animal, &trail)
}

fn sighting_response(sighting: &Sighting) -> Result<SightingResponse, ApiError> {
    Ok(SightingResponse {
        id: sighting.sighting_id,
        date_time_of_visit_location_point: format_timestamp(sighting.visited_at)?,
        location_point_id: sighting.location_id,
    })
}

fn area_response(area: Area) -> AreaResponse {
    AreaResponse {
        id: area.area_id,
        name: area.name,
        area_points: area
            .points
            .iter()
            .map(|point| AreaPointResponse {
                latitude: point.latitude(),
                longitude: point.longitude(),
            })
            .collect(),
    }
}

fn analytics_response(analytics: AreaAnalytics) -> AreaAnalyticsResponse {
    AreaAnalyticsResponse {
        total_quantity_animals: analytics.total_quantity_animals,
        total_animals_arrived: analytics.total_animals_arrived,
        total_animals_gone: analytics.total_animals_gone,
        animals_analytics: analytics
            .animals_analytics
            .into_iter()
            .map(|entry| AnimalTypeAnalyticsResponse {
                animal_type: entry.type_name,
                animal_type_id: entry.type_id,
                quantity_animals: entry.quantity_animals,
                animals_arrived: entry.animals_arrived,
                animals_gone: entry.animals_gone,
            })
            .collect(),
    }
}

fn unexpected_outcome(outcome: &TrailOutcome) -> ApiError {
    ApiError::Internal {
        message: format!("Unexpected trail outcome: {outcome:?}"),
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// Registers a new account with the USER role.
///
/// Only anonymous callers may register.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is authenticated
/// - A field is missing or invalid
/// - The email is already registered
pub fn register_account(
    persistence: &mut Persistence,
    request: &AccountRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<AccountResponse, ApiError> {
    AuthorizationService::require_anonymous(actor, "register_account")?;
    let (fields, password) = account_fields(request)?;

    let account: Account = persistence.create_account(&fields, &password, Role::User)?;
    info!(account_id = account.account_id, "Registered account");
    Ok(account_response(account))
}

/// Creates an account with an explicit role.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an admin
/// - A field, including the role, is missing or invalid
/// - The email is already registered
pub fn create_account(
    persistence: &mut Persistence,
    request: &AccountRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<AccountResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "create_account")?;
    let (fields, password) = account_fields(request)?;
    let role: Role = parse_enum(&required("role", request.role.clone())?)?;

    let account: Account = persistence.create_account(&fields, &password, role)?;
    info!(account_id = account.account_id, role = %role, "Created account");
    Ok(account_response(account))
}

/// Retrieves an account.
///
/// # Errors
///
/// Returns an error if the caller is anonymous, the id is invalid, or the
/// account does not exist.
pub fn get_account(
    persistence: &mut Persistence,
    account_id: i64,
    actor: Option<&AuthenticatedActor>,
) -> Result<AccountResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::User, "get_account")?;
    let account_id: i64 = check_id("accountId", account_id)?;

    let account: Account = persistence
        .get_account(account_id)?
        .ok_or(DomainError::AccountNotFound(account_id))?;
    Ok(account_response(account))
}

/// Searches accounts by case-insensitive name and email substrings.
///
/// # Errors
///
/// Returns an error if the caller is anonymous or paging is invalid.
pub fn search_accounts(
    persistence: &mut Persistence,
    query: &AccountSearchQuery,
    actor: Option<&AuthenticatedActor>,
) -> Result<Vec<AccountResponse>, ApiError> {
    AuthorizationService::require_role(actor, Role::User, "search_accounts")?;
    let (from, size) = page(query.from, query.size)?;

    let search: AccountSearch = AccountSearch {
        first_name: query.first_name.clone(),
        last_name: query.last_name.clone(),
        email: query.email.clone(),
        from,
        size,
    };
    let accounts: Vec<Account> = persistence.search_accounts(&search)?;
    debug!(count = accounts.len(), "Account search");
    Ok(accounts.into_iter().map(account_response).collect())
}

/// Replaces an account's names, email and password.
///
/// Callers may only update their own account unless they are admins. The
/// role is only changed when an admin supplies one.
///
/// # Errors
///
/// Returns an error if:
/// - The caller may not change this account
/// - The account does not exist
/// - A field is missing or invalid
/// - The email belongs to another account
pub fn update_account(
    persistence: &mut Persistence,
    account_id: i64,
    request: &AccountRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<AccountResponse, ApiError> {
    let account_id: i64 = check_id("accountId", account_id)?;
    let actor: &AuthenticatedActor =
        AuthorizationService::authorize_self_or_admin(actor, account_id, "update_account")?;

    if persistence.get_account(account_id)?.is_none() {
        return Err(DomainError::AccountNotFound(account_id).into());
    }

    let (fields, password) = account_fields(request)?;
    let role: Option<Role> = match (&request.role, actor.role) {
        (Some(role), Role::Admin) => Some(parse_enum(role)?),
        _ => None,
    };

    let account: Account = persistence.update_account(account_id, &fields, &password, role)?;
    info!(account_id, actor_id = actor.account_id, "Updated account");
    Ok(account_response(account))
}

/// Deletes an account that has not chipped any animal.
///
/// # Errors
///
/// Returns an error if:
/// - The caller may not change this account
/// - The account does not exist
/// - The account is the chipper of an animal
pub fn delete_account(
    persistence: &mut Persistence,
    account_id: i64,
    actor: Option<&AuthenticatedActor>,
) -> Result<(), ApiError> {
    let account_id: i64 = check_id("accountId", account_id)?;
    let actor: &AuthenticatedActor =
        AuthorizationService::authorize_self_or_admin(actor, account_id, "delete_account")?;

    if persistence.get_account(account_id)?.is_none() {
        return Err(DomainError::AccountNotFound(account_id).into());
    }
    if persistence.is_account_chipper(account_id)? {
        return Err(DomainError::AccountInUse(account_id).into());
    }

    persistence.delete_account(account_id)?;
    info!(account_id, actor_id = actor.account_id, "Deleted account");
    Ok(())
}

// ============================================================================
// Locations
// ============================================================================

/// Stores a new location.
///
/// # Errors
///
/// Returns an error if the caller is not a chipper, the coordinates are
/// missing or out of range, or a location already exists there.
pub fn create_location(
    persistence: &mut Persistence,
    request: &LocationRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<LocationResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Chipper, "create_location")?;
    let coordinates: Coordinates = parse_coordinates(request.latitude, request.longitude)?;

    let location: Location = persistence.create_location(coordinates)?;
    info!(location_id = location.location_id, "Created location");
    Ok(location_response(&location))
}

/// Retrieves a location.
///
/// # Errors
///
/// Returns an error if the caller is anonymous, the id is invalid, or the
/// location does not exist.
pub fn get_location(
    persistence: &mut Persistence,
    location_id: i64,
    actor: Option<&AuthenticatedActor>,
) -> Result<LocationResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::User, "get_location")?;
    let location_id: i64 = check_id("pointId", location_id)?;

    let location: Location = persistence
        .get_location(location_id)?
        .ok_or(DomainError::LocationNotFound(location_id))?;
    Ok(location_response(&location))
}

/// Finds the id of the location at exactly these coordinates.
///
/// # Errors
///
/// Returns an error if the caller is anonymous, the coordinates are
/// invalid, or no location exists there.
pub fn find_location(
    persistence: &mut Persistence,
    query: &LocationRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<i64, ApiError> {
    AuthorizationService::require_role(actor, Role::User, "find_location")?;
    let coordinates: Coordinates = parse_coordinates(query.latitude, query.longitude)?;

    persistence
        .find_location(&coordinates)?
        .map(|location| location.location_id)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Location"),
            message: format!(
                "No location at ({}, {})",
                coordinates.latitude(),
                coordinates.longitude()
            ),
        })
}

/// Moves a location.
///
/// # Errors
///
/// Returns an error if the caller is not a chipper, the location does not
/// exist, the coordinates are invalid, or another location sits there.
pub fn update_location(
    persistence: &mut Persistence,
    location_id: i64,
    request: &LocationRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<LocationResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Chipper, "update_location")?;
    let location_id: i64 = check_id("pointId", location_id)?;
    let coordinates: Coordinates = parse_coordinates(request.latitude, request.longitude)?;

    if persistence.get_location(location_id)?.is_none() {
        return Err(DomainError::LocationNotFound(location_id).into());
    }

    let location: Location = persistence.update_location(location_id, coordinates)?;
    info!(location_id, "Updated location");
    Ok(location_response(&location))
}

/// Deletes a location no animal or sighting refers to.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the location does not
/// exist, or it is still referenced.
pub fn delete_location(
    persistence: &mut Persistence,
    location_id: i64,
    actor: Option<&AuthenticatedActor>,
) -> Result<(), ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "delete_location")?;
    let location_id: i64 = check_id("pointId", location_id)?;

    if persistence.get_location(location_id)?.is_none() {
        return Err(DomainError::LocationNotFound(location_id).into());
    }
    if persistence.is_location_referenced(location_id)? {
        return Err(DomainError::LocationInUse(location_id).into());
    }

    persistence.delete_location(location_id)?;
    info!(location_id, "Deleted location");
    Ok(())
}

// ============================================================================
// Animal types
// ============================================================================

fn animal_type_name(request: &AnimalTypeRequest) -> Result<String, ApiError> {
    let name: String = required("type", request.name.clone())?;
    validate_non_blank("type", &name).map_err(translate_domain_error)?;
    Ok(name)
}

/// Creates an animal type.
///
/// # Errors
///
/// Returns an error if the caller is not a chipper, the name is blank, or
/// the name is taken.
pub fn create_animal_type(
    persistence: &mut Persistence,
    request: &AnimalTypeRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<AnimalTypeResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Chipper, "create_animal_type")?;
    let name: String = animal_type_name(request)?;

    let animal_type: AnimalType = persistence.create_animal_type(&name)?;
    info!(type_id = animal_type.type_id, name = %animal_type.name, "Created animal type");
    Ok(animal_type_response(animal_type))
}

/// Retrieves an animal type.
///
/// # Errors
///
/// Returns an error if the caller is anonymous, the id is invalid, or the
/// type does not exist.
pub fn get_animal_type(
    persistence: &mut Persistence,
    type_id: i64,
    actor: Option<&AuthenticatedActor>,
) -> Result<AnimalTypeResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::User, "get_animal_type")?;
    let type_id: i64 = check_id("typeId", type_id)?;

    let animal_type: AnimalType = persistence
        .get_animal_type(type_id)?
        .ok_or(DomainError::AnimalTypeNotFound(type_id))?;
    Ok(animal_type_response(animal_type))
}

/// Renames an animal type.
///
/// # Errors
///
/// Returns an error if the caller is not a chipper, the type does not
/// exist, the name is blank, or the name is taken.
pub fn update_animal_type(
    persistence: &mut Persistence,
    type_id: i64,
    request: &AnimalTypeRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<AnimalTypeResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Chipper, "update_animal_type")?;
    let type_id: i64 = check_id("typeId", type_id)?;
    let name: String = animal_type_name(request)?;

    if persistence.get_animal_type(type_id)?.is_none() {
        return Err(DomainError::AnimalTypeNotFound(type_id).into());
    }

    let animal_type: AnimalType = persistence.update_animal_type(type_id, &name)?;
    info!(type_id, name = %animal_type.name, "Renamed animal type");
    Ok(animal_type_response(animal_type))
}

/// Deletes an animal type no animal carries.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the type does not
/// exist, or an animal still carries it.
pub fn delete_animal_type(
    persistence: &mut Persistence,
    type_id: i64,
    actor: Option<&AuthenticatedActor>,
) -> Result<(), ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "delete_animal_type")?;
    let type_id: i64 = check_id("typeId", type_id)?;

    if persistence.get_animal_type(type_id)?.is_none() {
        return Err(DomainError::AnimalTypeNotFound(type_id).into());
    }
    if persistence.is_animal_type_in_use(type_id)? {
        return Err(DomainError::AnimalTypeInUse(type_id).into());
    }

    persistence.delete_animal_type(type_id)?;
    info!(type_id, "Deleted animal type");
    Ok(())
}

// ============================================================================
// Animals
// ============================================================================

/// Chips a new animal. It starts alive, chipped now, with an empty trail.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a chipper
/// - A field is missing or invalid, or a type id is repeated
/// - A referenced type, chipper or location does not exist
pub fn create_animal(
    persistence: &mut Persistence,
    request: &CreateAnimalRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<AnimalResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Chipper, "create_animal")?;

    let new_animal: NewAnimal = NewAnimal {
        type_ids: required("animalTypes", request.animal_types.clone())?,
        weight: required("weight", request.weight)?,
        length: required("length", request.length)?,
        height: required("height", request.height)?,
        gender: parse_enum(&required("gender", request.gender.clone())?)?,
        chipper_id: required("chipperId", request.chipper_id)?,
        chipping_location_id: required("chippingLocationId", request.chipping_location_id)?,
    };
    validate_new_animal(&new_animal).map_err(translate_domain_error)?;

    for &type_id in &new_animal.type_ids {
        if persistence.get_animal_type(type_id)?.is_none() {
            return Err(DomainError::AnimalTypeNotFound(type_id).into());
        }
    }
    if persistence.get_account(new_animal.chipper_id)?.is_none() {
        return Err(DomainError::AccountNotFound(new_animal.chipper_id).into());
    }
    if persistence
        .get_location(new_animal.chipping_location_id)?
        .is_none()
    {
        return Err(DomainError::LocationNotFound(new_animal.chipping_location_id).into());
    }

    let animal: Animal = persistence.create_animal(&new_animal, OffsetDateTime::now_utc())?;
    info!(
        animal_id = animal.animal_id,
        chipper_id = animal.chipper_id,
        "Chipped animal"
    );
    animal_response(animal, &[])
}

/// Retrieves an animal with its type ids and sighting ids.
///
/// # Errors
///
/// Returns an error if the caller is anonymous, the id is invalid, or the
/// animal does not exist.
pub fn get_animal(
    persistence: &mut Persistence,
    animal_id: i64,
    actor: Option<&AuthenticatedActor>,
) -> Result<AnimalResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::User, "get_animal")?;
    let animal_id: i64 = check_id("animalId", animal_id)?;

    let animal: Animal = persistence
        .get_animal(animal_id)?
        .ok_or(DomainError::AnimalNotFound(animal_id))?;
    load_animal_response(persistence, animal)
}

/// Searches animals by chipping time, chipper, location, status and gender.
///
/// # Errors
///
/// Returns an error if the caller is anonymous or a filter is invalid.
pub fn search_animals(
    persistence: &mut Persistence,
    query: &AnimalSearchQuery,
    actor: Option<&AuthenticatedActor>,
) -> Result<Vec<AnimalResponse>, ApiError> {
    AuthorizationService::require_role(actor, Role::User, "search_animals")?;
    let (from, size) = page(query.from, query.size)?;

    let search: AnimalSearch = AnimalSearch {
        start_date_time: parse_date_time("startDateTime", query.start_date_time.as_deref())?,
        end_date_time: parse_date_time("endDateTime", query.end_date_time.as_deref())?,
        chipper_id: query
            .chipper_id
            .map(|id| check_id("chipperId", id))
            .transpose()?,
        chipping_location_id: query
            .chipping_location_id
            .map(|id| check_id("chippingLocationId", id))
            .transpose()?,
        life_status: query
            .life_status
            .as_deref()
            .map(parse_enum::<LifeStatus>)
            .transpose()?,
        gender: query
            .gender
            .as_deref()
            .map(parse_enum::<Gender>)
            .transpose()?,
        from,
        size,
    };

    let animals: Vec<Animal> = persistence.search_animals(&search)?;
    debug!(count = animals.len(), "Animal search");
    animals
        .into_iter()
        .map(|animal| load_animal_response(persistence, animal))
        .collect()
}

/// Replaces an animal's attributes through the trail engine.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a chipper
/// - A field is missing or invalid
/// - The animal, chipper or chipping location does not exist
/// - The change would revive a dead animal or clash with the first sighting
/// - The animal kept changing concurrently
pub fn update_animal(
    persistence: &mut Persistence,
    animal_id: i64,
    request: &UpdateAnimalRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<AnimalResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Chipper, "update_animal")?;
    let animal_id: i64 = check_id("animalId", animal_id)?;

    let attributes: AnimalAttributes = AnimalAttributes {
        weight: required("weight", request.weight)?,
        length: required("length", request.length)?,
        height: required("height", request.height)?,
        gender: parse_enum(&required("gender", request.gender.clone())?)?,
        life_status: parse_enum(&required("lifeStatus", request.life_status.clone())?)?,
        chipper_id: required("chipperId", request.chipper_id)?,
        chipping_location_id: required("chippingLocationId", request.chipping_location_id)?,
    };
    validate_animal_attributes(&attributes).map_err(translate_domain_error)?;

    match run_trail_command(
        persistence,
        animal_id,
        &TrailCommand::UpdateAnimal { attributes },
    )? {
        TrailOutcome::AnimalUpdated(animal) => load_animal_response(persistence, animal),
        other => Err(unexpected_outcome(&other)),
    }
}

/// Deletes an animal that has no sightings.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the animal does not
/// exist, it still has sightings, or it changed while being deleted.
pub fn delete_animal(
    persistence: &mut Persistence,
    animal_id: i64,
    actor: Option<&AuthenticatedActor>,
) -> Result<(), ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "delete_animal")?;
    let animal_id: i64 = check_id("animalId", animal_id)?;

    let animal: Animal = persistence
        .get_animal(animal_id)?
        .ok_or(DomainError::AnimalNotFound(animal_id))?;
    let sightings: Vec<Sighting> = persistence.get_trail(animal_id)?;
    Trail::new(&animal, sightings)
        .check_deletable()
        .map_err(translate_domain_error)?;

    persistence.delete_animal(animal_id, animal.revision)?;
    info!(animal_id, "Deleted animal");
    Ok(())
}

// ============================================================================
// Animal type assignments
// ============================================================================

/// Adds a type to an animal.
///
/// # Errors
///
/// Returns an error if the caller is not a chipper, the animal or type does
/// not exist, or the animal already carries the type.
pub fn add_animal_type(
    persistence: &mut Persistence,
    animal_id: i64,
    type_id: i64,
    actor: Option<&AuthenticatedActor>,
) -> Result<AnimalResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Chipper, "add_animal_type")?;
    let animal_id: i64 = check_id("animalId", animal_id)?;
    let type_id: i64 = check_id("typeId", type_id)?;

    match run_trail_command(persistence, animal_id, &TrailCommand::AddAnimalType { type_id })? {
        TrailOutcome::AnimalUpdated(animal) => load_animal_response(persistence, animal),
        other => Err(unexpected_outcome(&other)),
    }
}

/// Swaps one of an animal's types for another, keeping its position.
///
/// # Errors
///
/// Returns an error if the caller is not a chipper, an id is missing or
/// unknown, the old type is not assigned, or the new one already is.
pub fn replace_animal_type(
    persistence: &mut Persistence,
    animal_id: i64,
    request: &ReplaceAnimalTypeRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<AnimalResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Chipper, "replace_animal_type")?;
    let animal_id: i64 = check_id("animalId", animal_id)?;
    let old_type_id: i64 = check_id("oldTypeId", required("oldTypeId", request.old_type_id)?)?;
    let new_type_id: i64 = check_id("newTypeId", required("newTypeId", request.new_type_id)?)?;

    let command: TrailCommand = TrailCommand::ReplaceAnimalType {
        old_type_id,
        new_type_id,
    };
    match run_trail_command(persistence, animal_id, &command)? {
        TrailOutcome::AnimalUpdated(animal) => load_animal_response(persistence, animal),
        other => Err(unexpected_outcome(&other)),
    }
}

/// Removes a type from an animal.
///
/// # Errors
///
/// Returns an error if the caller is not a chipper, the animal or type does
/// not exist, the type is not assigned, or it is the animal's last type.
pub fn remove_animal_type(
    persistence: &mut Persistence,
    animal_id: i64,
    type_id: i64,
    actor: Option<&AuthenticatedActor>,
) -> Result<AnimalResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Chipper, "remove_animal_type")?;
    let animal_id: i64 = check_id("animalId", animal_id)?;
    let type_id: i64 = check_id("typeId", type_id)?;

    match run_trail_command(
        persistence,
        animal_id,
        &TrailCommand::RemoveAnimalType { type_id },
    )? {
        TrailOutcome::AnimalUpdated(animal) => load_animal_response(persistence, animal),
        other => Err(unexpected_outcome(&other)),
    }
}

// ============================================================================
// Sightings
// ============================================================================

/// Pages through an animal's sightings, oldest first.
///
/// # Errors
///
/// Returns an error if the caller is anonymous, a filter is invalid, or the
/// animal does not exist.
pub fn list_sightings(
    persistence: &mut Persistence,
    animal_id: i64,
    query: &SightingSearchQuery,
    actor: Option<&AuthenticatedActor>,
) -> Result<Vec<SightingResponse>, ApiError> {
    AuthorizationService::require_role(actor, Role::User, "list_sightings")?;
    let animal_id: i64 = check_id("animalId", animal_id)?;
    let (from, size) = page(query.from, query.size)?;

    let search: SightingSearch = SightingSearch {
        start_date_time: parse_date_time("startDateTime", query.start_date_time.as_deref())?,
        end_date_time: parse_date_time("endDateTime", query.end_date_time.as_deref())?,
        from,
        size,
    };

    if persistence.get_animal(animal_id)?.is_none() {
        return Err(DomainError::AnimalNotFound(animal_id).into());
    }

    persistence
        .search_sightings(animal_id, &search)?
        .iter()
        .map(sighting_response)
        .collect()
}

/// Records that an animal was seen at a location now.
///
/// # Errors
///
/// Returns an error if the caller is not a chipper, the animal or location
/// does not exist, the animal is dead, or the location repeats the current
/// one.
pub fn add_sighting(
    persistence: &mut Persistence,
    animal_id: i64,
    location_id: i64,
    actor: Option<&AuthenticatedActor>,
) -> Result<SightingResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Chipper, "add_sighting")?;
    let animal_id: i64 = check_id("animalId", animal_id)?;
    let location_id: i64 = check_id("pointId", location_id)?;

    match run_trail_command(persistence, animal_id, &TrailCommand::AddSighting { location_id })? {
        TrailOutcome::SightingCreated(sighting) => sighting_response(&sighting),
        other => Err(unexpected_outcome(&other)),
    }
}

/// Points an existing sighting at another location.
///
/// # Errors
///
/// Returns an error if the caller is not a chipper, an id is missing or
/// unknown, or the new location repeats a neighbour on the trail.
pub fn update_sighting(
    persistence: &mut Persistence,
    animal_id: i64,
    request: &UpdateSightingRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<SightingResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Chipper, "update_sighting")?;
    let animal_id: i64 = check_id("animalId", animal_id)?;
    let sighting_id: i64 = check_id(
        "visitedLocationPointId",
        required("visitedLocationPointId", request.visited_location_point_id)?,
    )?;
    let location_id: i64 = check_id(
        "locationPointId",
        required("locationPointId", request.location_point_id)?,
    )?;

    let command: TrailCommand = TrailCommand::UpdateSighting {
        sighting_id,
        location_id,
    };
    match run_trail_command(persistence, animal_id, &command)? {
        TrailOutcome::SightingRelocated(sighting) => sighting_response(&sighting),
        other => Err(unexpected_outcome(&other)),
    }
}

/// Deletes a sighting, and its successor when the removal would leave the
/// chipping location repeated.
///
/// Returns the ids of every deleted sighting, the requested one first.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the animal or
/// sighting does not exist.
pub fn delete_sighting(
    persistence: &mut Persistence,
    animal_id: i64,
    sighting_id: i64,
    actor: Option<&AuthenticatedActor>,
) -> Result<Vec<i64>, ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "delete_sighting")?;
    let animal_id: i64 = check_id("animalId", animal_id)?;
    let sighting_id: i64 = check_id("visitedPointId", sighting_id)?;

    match run_trail_command(
        persistence,
        animal_id,
        &TrailCommand::DeleteSighting { sighting_id },
    )? {
        TrailOutcome::SightingsDeleted(deleted) => Ok(deleted),
        other => Err(unexpected_outcome(&other)),
    }
}

// ============================================================================
// Areas
// ============================================================================

/// Stores a new area.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an admin
/// - The name is blank or the polygon is malformed
/// - The polygon touches any existing area
/// - The name is taken
pub fn create_area(
    persistence: &mut Persistence,
    request: &AreaRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<AreaResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "create_area")?;
    let (name, points, polygon) = area_points(request)?;
    check_area_placement(persistence, &polygon, None)?;

    let area: Area = persistence.create_area(&name, &points)?;
    info!(area_id = area.area_id, vertices = points.len(), "Created area");
    Ok(area_response(area))
}

/// Retrieves an area with its vertices in order.
///
/// # Errors
///
/// Returns an error if the caller is anonymous, the id is invalid, or the
/// area does not exist.
pub fn get_area(
    persistence: &mut Persistence,
    area_id: i64,
    actor: Option<&AuthenticatedActor>,
) -> Result<AreaResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::User, "get_area")?;
    let area_id: i64 = check_id("areaId", area_id)?;

    let area: Area = persistence
        .get_area(area_id)?
        .ok_or(DomainError::AreaNotFound(area_id))?;
    Ok(area_response(area))
}

/// Renames an area and replaces its polygon.
///
/// The area's own current polygon does not count as a collision.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the area does not
/// exist, or the new name or polygon is rejected.
pub fn update_area(
    persistence: &mut Persistence,
    area_id: i64,
    request: &AreaRequest,
    actor: Option<&AuthenticatedActor>,
) -> Result<AreaResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "update_area")?;
    let area_id: i64 = check_id("areaId", area_id)?;
    let (name, points, polygon) = area_points(request)?;

    if persistence.get_area(area_id)?.is_none() {
        return Err(DomainError::AreaNotFound(area_id).into());
    }
    check_area_placement(persistence, &polygon, Some(area_id))?;

    let area: Area = persistence.update_area(area_id, &name, &points)?;
    info!(area_id, vertices = points.len(), "Updated area");
    Ok(area_response(area))
}

/// Deletes an area.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the area does not
/// exist.
pub fn delete_area(
    persistence: &mut Persistence,
    area_id: i64,
    actor: Option<&AuthenticatedActor>,
) -> Result<(), ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "delete_area")?;
    let area_id: i64 = check_id("areaId", area_id)?;

    if persistence.get_area(area_id)?.is_none() {
        return Err(DomainError::AreaNotFound(area_id).into());
    }

    persistence.delete_area(area_id)?;
    info!(area_id, "Deleted area");
    Ok(())
}

/// Counts animals present in, arriving at and leaving an area.
///
/// `startDate` is exclusive and `endDate` covers its whole day; either may
/// be omitted.
///
/// # Errors
///
/// Returns an error if the caller is anonymous, a date is malformed, or the
/// area does not exist.
pub fn area_analytics(
    persistence: &mut Persistence,
    area_id: i64,
    query: &AreaAnalyticsQuery,
    actor: Option<&AuthenticatedActor>,
) -> Result<AreaAnalyticsResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::User, "area_analytics")?;
    let area_id: i64 = check_id("areaId", area_id)?;
    let window: DateWindow = DateWindow::new(
        parse_date("startDate", query.start_date.as_deref())?,
        parse_date("endDate", query.end_date.as_deref())?,
    );

    debug!(area_id, start = ?window.start, end = ?window.end, "Area analytics requested");
    let analytics: AreaAnalytics =
        compute_area_analytics(persistence, area_id, &window).map_err(translate_core_error)?;
    Ok(analytics_response(analytics))
}
