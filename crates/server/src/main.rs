// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chipwatch_api::{
    AccountRequest, AccountResponse, AccountSearchQuery, AnimalResponse, AnimalSearchQuery,
    AnimalTypeRequest, AnimalTypeResponse, ApiError, AreaAnalyticsQuery, AreaAnalyticsResponse,
    AreaRequest, AreaResponse, CreateAnimalRequest, LocationRequest, LocationResponse,
    ReplaceAnimalTypeRequest, SightingResponse, SightingSearchQuery, UpdateAnimalRequest,
    UpdateSightingRequest, add_animal_type, add_sighting, area_analytics, create_account,
    create_animal, create_animal_type, create_area, create_location, delete_account,
    delete_animal, delete_animal_type, delete_area, delete_location, delete_sighting,
    find_location, get_account, get_animal, get_animal_type, get_area, get_location,
    list_sightings, register_account, remove_animal_type, replace_animal_type, search_accounts,
    search_animals, update_account, update_animal, update_animal_type, update_area,
    update_location, update_sighting,
};
use chipwatch_persistence::Persistence;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use session::SessionActor;

/// Chipwatch Server - HTTP server for the Chipwatch animal tracking service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "CHIPWATCH_DATABASE")]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "CHIPWATCH_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, env = "CHIPWATCH_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,
}

/// Application state shared across handlers.
///
/// The single `SQLite` connection is serialized behind a Mutex; the
/// revision checks in the store guard each animal's trail on top of that.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
}

// ============================================================================
// Errors
// ============================================================================

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } | ApiError::InvalidInput { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid request body: {}", rejection.body_text()),
        }
    }
}

/// Unwraps a JSON body, reporting every malformed body as a 400.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    let Json(body) = payload?;
    Ok(body)
}

// ============================================================================
// Accounts
// ============================================================================

/// Handler for POST `/registration` endpoint.
///
/// Registers a new USER account. Only anonymous callers may register.
async fn handle_register_account(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    payload: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountResponse>), HttpError> {
    let req: AccountRequest = json_body(payload)?;
    info!("Handling register_account request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AccountResponse = register_account(&mut persistence, &req, actor.as_ref())?;
    drop(persistence);

    info!(account_id = response.id, "Registered account");
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/accounts` endpoint.
///
/// Creates an account with an explicit role.
async fn handle_create_account(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    payload: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountResponse>), HttpError> {
    let req: AccountRequest = json_body(payload)?;
    info!(role = ?req.role, "Handling create_account request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AccountResponse = create_account(&mut persistence, &req, actor.as_ref())?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/accounts/{account_id}` endpoint.
async fn handle_get_account(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(account_id): Path<i64>,
) -> Result<Json<AccountResponse>, HttpError> {
    info!(account_id, "Handling get_account request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AccountResponse = get_account(&mut persistence, account_id, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for GET `/accounts/search` endpoint.
async fn handle_search_accounts(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Query(query): Query<AccountSearchQuery>,
) -> Result<Json<Vec<AccountResponse>>, HttpError> {
    info!(from = ?query.from, size = ?query.size, "Handling search_accounts request");

    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<AccountResponse> = search_accounts(&mut persistence, &query, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for PUT `/accounts/{account_id}` endpoint.
async fn handle_update_account(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(account_id): Path<i64>,
    payload: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>, HttpError> {
    let req: AccountRequest = json_body(payload)?;
    info!(account_id, "Handling update_account request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AccountResponse =
        update_account(&mut persistence, account_id, &req, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for DELETE `/accounts/{account_id}` endpoint.
async fn handle_delete_account(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(account_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(account_id, "Handling delete_account request");

    let mut persistence = app_state.persistence.lock().await;
    delete_account(&mut persistence, account_id, actor.as_ref())?;

    Ok(StatusCode::OK)
}

// ============================================================================
// Locations
// ============================================================================

/// Handler for POST `/locations` endpoint.
async fn handle_create_location(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    payload: Result<Json<LocationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LocationResponse>), HttpError> {
    let req: LocationRequest = json_body(payload)?;
    info!(
        latitude = ?req.latitude,
        longitude = ?req.longitude,
        "Handling create_location request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: LocationResponse = create_location(&mut persistence, &req, actor.as_ref())?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/locations` endpoint.
///
/// Resolves a coordinate pair to the id of the stored location.
async fn handle_find_location(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Query(query): Query<LocationRequest>,
) -> Result<Json<i64>, HttpError> {
    info!(
        latitude = ?query.latitude,
        longitude = ?query.longitude,
        "Handling find_location request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let location_id: i64 = find_location(&mut persistence, &query, actor.as_ref())?;

    Ok(Json(location_id))
}

/// Handler for GET `/locations/{point_id}` endpoint.
async fn handle_get_location(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(point_id): Path<i64>,
) -> Result<Json<LocationResponse>, HttpError> {
    info!(point_id, "Handling get_location request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LocationResponse = get_location(&mut persistence, point_id, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for PUT `/locations/{point_id}` endpoint.
async fn handle_update_location(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(point_id): Path<i64>,
    payload: Result<Json<LocationRequest>, JsonRejection>,
) -> Result<Json<LocationResponse>, HttpError> {
    let req: LocationRequest = json_body(payload)?;
    info!(point_id, "Handling update_location request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LocationResponse =
        update_location(&mut persistence, point_id, &req, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for DELETE `/locations/{point_id}` endpoint.
async fn handle_delete_location(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(point_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(point_id, "Handling delete_location request");

    let mut persistence = app_state.persistence.lock().await;
    delete_location(&mut persistence, point_id, actor.as_ref())?;

    Ok(StatusCode::OK)
}

// ============================================================================
// Animal types
// ============================================================================

/// Handler for POST `/animals/types` endpoint.
async fn handle_create_animal_type(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    payload: Result<Json<AnimalTypeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AnimalTypeResponse>), HttpError> {
    let req: AnimalTypeRequest = json_body(payload)?;
    info!(name = ?req.name, "Handling create_animal_type request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AnimalTypeResponse = create_animal_type(&mut persistence, &req, actor.as_ref())?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/animals/types/{type_id}` endpoint.
async fn handle_get_animal_type(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(type_id): Path<i64>,
) -> Result<Json<AnimalTypeResponse>, HttpError> {
    info!(type_id, "Handling get_animal_type request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AnimalTypeResponse = get_animal_type(&mut persistence, type_id, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for PUT `/animals/types/{type_id}` endpoint.
async fn handle_update_animal_type(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(type_id): Path<i64>,
    payload: Result<Json<AnimalTypeRequest>, JsonRejection>,
) -> Result<Json<AnimalTypeResponse>, HttpError> {
    let req: AnimalTypeRequest = json_body(payload)?;
    info!(type_id, name = ?req.name, "Handling update_animal_type request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AnimalTypeResponse =
        update_animal_type(&mut persistence, type_id, &req, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for DELETE `/animals/types/{type_id}` endpoint.
async fn handle_delete_animal_type(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(type_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(type_id, "Handling delete_animal_type request");

    let mut persistence = app_state.persistence.lock().await;
    delete_animal_type(&mut persistence, type_id, actor.as_ref())?;

    Ok(StatusCode::OK)
}

// ============================================================================
// Animals
// ============================================================================

/// Handler for POST `/animals` endpoint.
async fn handle_create_animal(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    payload: Result<Json<CreateAnimalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AnimalResponse>), HttpError> {
    let req: CreateAnimalRequest = json_body(payload)?;
    info!(
        chipper_id = ?req.chipper_id,
        chipping_location_id = ?req.chipping_location_id,
        "Handling create_animal request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: AnimalResponse = create_animal(&mut persistence, &req, actor.as_ref())?;
    drop(persistence);

    info!(animal_id = response.id, "Chipped animal");
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/animals/{animal_id}` endpoint.
async fn handle_get_animal(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(animal_id): Path<i64>,
) -> Result<Json<AnimalResponse>, HttpError> {
    info!(animal_id, "Handling get_animal request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AnimalResponse = get_animal(&mut persistence, animal_id, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for GET `/animals/search` endpoint.
async fn handle_search_animals(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Query(query): Query<AnimalSearchQuery>,
) -> Result<Json<Vec<AnimalResponse>>, HttpError> {
    info!(from = ?query.from, size = ?query.size, "Handling search_animals request");

    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<AnimalResponse> = search_animals(&mut persistence, &query, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for PUT `/animals/{animal_id}` endpoint.
async fn handle_update_animal(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(animal_id): Path<i64>,
    payload: Result<Json<UpdateAnimalRequest>, JsonRejection>,
) -> Result<Json<AnimalResponse>, HttpError> {
    let req: UpdateAnimalRequest = json_body(payload)?;
    info!(
        animal_id,
        life_status = ?req.life_status,
        "Handling update_animal request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: AnimalResponse =
        update_animal(&mut persistence, animal_id, &req, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for DELETE `/animals/{animal_id}` endpoint.
async fn handle_delete_animal(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(animal_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(animal_id, "Handling delete_animal request");

    let mut persistence = app_state.persistence.lock().await;
    delete_animal(&mut persistence, animal_id, actor.as_ref())?;

    Ok(StatusCode::OK)
}

/// Handler for POST `/animals/{animal_id}/types/{type_id}` endpoint.
async fn handle_add_animal_type(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path((animal_id, type_id)): Path<(i64, i64)>,
) -> Result<(StatusCode, Json<AnimalResponse>), HttpError> {
    info!(animal_id, type_id, "Handling add_animal_type request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AnimalResponse =
        add_animal_type(&mut persistence, animal_id, type_id, actor.as_ref())?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for PUT `/animals/{animal_id}/types` endpoint.
async fn handle_replace_animal_type(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(animal_id): Path<i64>,
    payload: Result<Json<ReplaceAnimalTypeRequest>, JsonRejection>,
) -> Result<Json<AnimalResponse>, HttpError> {
    let req: ReplaceAnimalTypeRequest = json_body(payload)?;
    info!(
        animal_id,
        old_type_id = ?req.old_type_id,
        new_type_id = ?req.new_type_id,
        "Handling replace_animal_type request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: AnimalResponse =
        replace_animal_type(&mut persistence, animal_id, &req, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for DELETE `/animals/{animal_id}/types/{type_id}` endpoint.
async fn handle_remove_animal_type(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path((animal_id, type_id)): Path<(i64, i64)>,
) -> Result<Json<AnimalResponse>, HttpError> {
    info!(animal_id, type_id, "Handling remove_animal_type request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AnimalResponse =
        remove_animal_type(&mut persistence, animal_id, type_id, actor.as_ref())?;

    Ok(Json(response))
}

// ============================================================================
// Sightings
// ============================================================================

/// Handler for GET `/animals/{animal_id}/locations` endpoint.
async fn handle_list_sightings(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(animal_id): Path<i64>,
    Query(query): Query<SightingSearchQuery>,
) -> Result<Json<Vec<SightingResponse>>, HttpError> {
    info!(animal_id, "Handling list_sightings request");

    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<SightingResponse> =
        list_sightings(&mut persistence, animal_id, &query, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for POST `/animals/{animal_id}/locations/{point_id}` endpoint.
async fn handle_add_sighting(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path((animal_id, point_id)): Path<(i64, i64)>,
) -> Result<(StatusCode, Json<SightingResponse>), HttpError> {
    info!(animal_id, point_id, "Handling add_sighting request");

    let mut persistence = app_state.persistence.lock().await;
    let response: SightingResponse =
        add_sighting(&mut persistence, animal_id, point_id, actor.as_ref())?;
    drop(persistence);

    info!(animal_id, sighting_id = response.id, "Recorded sighting");
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for PUT `/animals/{animal_id}/locations` endpoint.
async fn handle_update_sighting(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(animal_id): Path<i64>,
    payload: Result<Json<UpdateSightingRequest>, JsonRejection>,
) -> Result<Json<SightingResponse>, HttpError> {
    let req: UpdateSightingRequest = json_body(payload)?;
    info!(
        animal_id,
        sighting_id = ?req.visited_location_point_id,
        point_id = ?req.location_point_id,
        "Handling update_sighting request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SightingResponse =
        update_sighting(&mut persistence, animal_id, &req, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for DELETE `/animals/{animal_id}/locations/{sighting_id}` endpoint.
///
/// Shares its route with [`handle_add_sighting`]; the second segment is the
/// sighting to remove rather than a location.
async fn handle_delete_sighting(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path((animal_id, sighting_id)): Path<(i64, i64)>,
) -> Result<StatusCode, HttpError> {
    info!(animal_id, sighting_id, "Handling delete_sighting request");

    let mut persistence = app_state.persistence.lock().await;
    let removed: Vec<i64> =
        delete_sighting(&mut persistence, animal_id, sighting_id, actor.as_ref())?;
    drop(persistence);

    info!(animal_id, removed = ?removed, "Deleted sightings");
    Ok(StatusCode::OK)
}

// ============================================================================
// Areas
// ============================================================================

/// Handler for POST `/areas` endpoint.
async fn handle_create_area(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    payload: Result<Json<AreaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AreaResponse>), HttpError> {
    let req: AreaRequest = json_body(payload)?;
    info!(name = ?req.name, "Handling create_area request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AreaResponse = create_area(&mut persistence, &req, actor.as_ref())?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/areas/{area_id}` endpoint.
async fn handle_get_area(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(area_id): Path<i64>,
) -> Result<Json<AreaResponse>, HttpError> {
    info!(area_id, "Handling get_area request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AreaResponse = get_area(&mut persistence, area_id, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for PUT `/areas/{area_id}` endpoint.
async fn handle_update_area(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(area_id): Path<i64>,
    payload: Result<Json<AreaRequest>, JsonRejection>,
) -> Result<Json<AreaResponse>, HttpError> {
    let req: AreaRequest = json_body(payload)?;
    info!(area_id, name = ?req.name, "Handling update_area request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AreaResponse = update_area(&mut persistence, area_id, &req, actor.as_ref())?;

    Ok(Json(response))
}

/// Handler for DELETE `/areas/{area_id}` endpoint.
async fn handle_delete_area(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(area_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(area_id, "Handling delete_area request");

    let mut persistence = app_state.persistence.lock().await;
    delete_area(&mut persistence, area_id, actor.as_ref())?;

    Ok(StatusCode::OK)
}

/// Handler for GET `/areas/{area_id}/analytics` endpoint.
async fn handle_area_analytics(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(area_id): Path<i64>,
    Query(query): Query<AreaAnalyticsQuery>,
) -> Result<Json<AreaAnalyticsResponse>, HttpError> {
    info!(
        area_id,
        start_date = ?query.start_date,
        end_date = ?query.end_date,
        "Handling area_analytics request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: AreaAnalyticsResponse =
        area_analytics(&mut persistence, area_id, &query, actor.as_ref())?;

    Ok(Json(response))
}

// ============================================================================
// Server
// ============================================================================

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/registration", post(handle_register_account))
        .route("/accounts", post(handle_create_account))
        .route("/accounts/search", get(handle_search_accounts))
        .route(
            "/accounts/{account_id}",
            get(handle_get_account)
                .put(handle_update_account)
                .delete(handle_delete_account),
        )
        .route(
            "/locations",
            get(handle_find_location).post(handle_create_location),
        )
        .route(
            "/locations/{point_id}",
            get(handle_get_location)
                .put(handle_update_location)
                .delete(handle_delete_location),
        )
        .route("/animals", post(handle_create_animal))
        .route("/animals/search", get(handle_search_animals))
        .route("/animals/types", post(handle_create_animal_type))
        .route(
            "/animals/types/{type_id}",
            get(handle_get_animal_type)
                .put(handle_update_animal_type)
                .delete(handle_delete_animal_type),
        )
        .route(
            "/animals/{animal_id}",
            get(handle_get_animal)
                .put(handle_update_animal)
                .delete(handle_delete_animal),
        )
        .route(
            "/animals/{animal_id}/types",
            put(handle_replace_animal_type),
        )
        .route(
            "/animals/{animal_id}/types/{type_id}",
            post(handle_add_animal_type).delete(handle_remove_animal_type),
        )
        .route(
            "/animals/{animal_id}/locations",
            get(handle_list_sightings).put(handle_update_sighting),
        )
        .route(
            "/animals/{animal_id}/locations/{point_id}",
            post(handle_add_sighting).delete(handle_delete_sighting),
        )
        .route("/areas", post(handle_create_area))
        .route(
            "/areas/{area_id}",
            get(handle_get_area)
                .put(handle_update_area)
                .delete(handle_delete_area),
        )
        .route("/areas/{area_id}/analytics", get(handle_area_analytics))
        .with_state(app_state)
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Chipwatch Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
