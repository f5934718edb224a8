// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the chipwatch animal tracking service.
//!
//! This crate stores accounts, locations, animal types, animals, their
//! trails and geofence areas in `SQLite` through Diesel. It also provides the
//! [`chipwatch::TrailStore`] implementation used by the trail engine and
//! the analytics engine.
//!
//! ## Storage conventions
//!
//! - Timestamps are fixed-width UTC text with microsecond precision, so
//!   lexical order equals time order. Trail order is `(visited_at, sighting_id)`.
//! - Every animal row carries a `revision`. Writes to an animal or its trail
//!   claim the revision they were validated against, inside the same
//!   transaction, and fail with [`PersistenceError::RevisionConflict`] if
//!   another writer got there first.
//! - Passwords are hashed with bcrypt before they reach the database.
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] hands out a fresh shared-cache in-memory
//! database per call, so tests never observe each other's data.

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

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chipwatch_domain::{
    Account, AccountFields, Animal, AnimalType, Area, Coordinates, Location, NewAnimal, Role,
    Sighting,
};
use diesel::{Connection, SqliteConnection};
use time::OffsetDateTime;
use tracing::debug;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod timestamps;
mod trail_store;

#[cfg(test)]
mod tests;

pub use data_models::{AccountSearch, AnimalSearch, SightingSearch};
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
    hash_cost: u32,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database, so adapters created
    /// by different tests are isolated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn,
            hash_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn,
            hash_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Sets the bcrypt cost used for new password hashes.
    #[must_use]
    pub const fn with_password_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Creates an account.
    ///
    /// # Arguments
    ///
    /// * `fields` - Names and email, already validated
    /// * `password` - The plain-text password (will be hashed)
    /// * `role` - The role to grant
    ///
    /// # Errors
    ///
    /// Returns `UniqueViolation` if the email is taken.
    pub fn create_account(
        &mut self,
        fields: &AccountFields,
        password: &str,
        role: Role,
    ) -> Result<Account, PersistenceError> {
        mutations::accounts::create_account(&mut self.conn, fields, password, role, self.hash_cost)
    }

    /// Retrieves an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_account(&mut self, account_id: i64) -> Result<Option<Account>, PersistenceError> {
        queries::accounts::get_account(&mut self.conn, account_id)
    }

    /// Checks an email and password pair.
    ///
    /// Returns `Ok(None)` when the email is unknown or the password does not
    /// match.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or hash verification fails.
    pub fn verify_credentials(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, PersistenceError> {
        let Some(row) = queries::accounts::get_account_row_by_email(&mut self.conn, email)? else {
            debug!(email, "Unknown email");
            return Ok(None);
        };

        if !bcrypt::verify(password, &row.password_hash)? {
            debug!(account_id = row.account_id, "Password mismatch");
            return Ok(None);
        }

        row.into_account().map(Some)
    }

    /// Searches accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn search_accounts(
        &mut self,
        search: &AccountSearch,
    ) -> Result<Vec<Account>, PersistenceError> {
        queries::accounts::search_accounts(&mut self.conn, search)
    }

    /// Replaces an account's fields and password, and its role if given.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown account and `UniqueViolation` if
    /// the email is taken by another account.
    pub fn update_account(
        &mut self,
        account_id: i64,
        fields: &AccountFields,
        password: &str,
        role: Option<Role>,
    ) -> Result<Account, PersistenceError> {
        let hash_cost: u32 = self.hash_cost;
        self.conn.transaction::<_, PersistenceError, _>(|conn| {
            mutations::accounts::update_account(
                conn, account_id, fields, password, role, hash_cost,
            )?;
            queries::accounts::get_account(conn, account_id)?
                .ok_or_else(|| PersistenceError::NotFound(format!("Account {account_id}")))
        })
    }

    /// Deletes an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown account, or `ForeignKeyViolation`
    /// if it is the chipper of an animal.
    pub fn delete_account(&mut self, account_id: i64) -> Result<(), PersistenceError> {
        mutations::accounts::delete_account(&mut self.conn, account_id)
    }

    /// Returns whether the account chipped at least one animal.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn is_account_chipper(&mut self, account_id: i64) -> Result<bool, PersistenceError> {
        queries::accounts::is_account_chipper(&mut self.conn, account_id)
    }

    // ========================================================================
    // Locations
    // ========================================================================

    /// Stores a new location.
    ///
    /// # Errors
    ///
    /// Returns `UniqueViolation` if a location already exists there.
    pub fn create_location(
        &mut self,
        coordinates: Coordinates,
    ) -> Result<Location, PersistenceError> {
        mutations::locations::create_location(&mut self.conn, coordinates)
    }

    /// Retrieves a location by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_location(&mut self, location_id: i64) -> Result<Option<Location>, PersistenceError> {
        queries::locations::get_location(&mut self.conn, location_id)
    }

    /// Finds the location at exactly these coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_location(
        &mut self,
        coordinates: &Coordinates,
    ) -> Result<Option<Location>, PersistenceError> {
        queries::locations::find_location(&mut self.conn, coordinates)
    }

    /// Moves a location.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown location and `UniqueViolation` if
    /// another location already sits at these coordinates.
    pub fn update_location(
        &mut self,
        location_id: i64,
        coordinates: Coordinates,
    ) -> Result<Location, PersistenceError> {
        mutations::locations::update_location(&mut self.conn, location_id, coordinates)
    }

    /// Deletes a location.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown location, or `ForeignKeyViolation`
    /// if it is still referenced.
    pub fn delete_location(&mut self, location_id: i64) -> Result<(), PersistenceError> {
        mutations::locations::delete_location(&mut self.conn, location_id)
    }

    /// Returns whether any animal was chipped or sighted at the location.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn is_location_referenced(&mut self, location_id: i64) -> Result<bool, PersistenceError> {
        queries::locations::is_location_referenced(&mut self.conn, location_id)
    }

    // ========================================================================
    // Animal types
    // ========================================================================

    /// Creates an animal type.
    ///
    /// # Errors
    ///
    /// Returns `UniqueViolation` if the name is taken.
    pub fn create_animal_type(&mut self, name: &str) -> Result<AnimalType, PersistenceError> {
        mutations::animal_types::create_animal_type(&mut self.conn, name)
    }

    /// Retrieves an animal type by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_animal_type(&mut self, type_id: i64) -> Result<Option<AnimalType>, PersistenceError> {
        queries::animal_types::get_animal_type(&mut self.conn, type_id)
    }

    /// Renames an animal type.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown type and `UniqueViolation` if the
    /// name is taken.
    pub fn update_animal_type(
        &mut self,
        type_id: i64,
        name: &str,
    ) -> Result<AnimalType, PersistenceError> {
        mutations::animal_types::update_animal_type(&mut self.conn, type_id, name)
    }

    /// Deletes an animal type.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown type, or `ForeignKeyViolation` if
    /// an animal still carries it.
    pub fn delete_animal_type(&mut self, type_id: i64) -> Result<(), PersistenceError> {
        mutations::animal_types::delete_animal_type(&mut self.conn, type_id)
    }

    /// Returns whether any animal carries the type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn is_animal_type_in_use(&mut self, type_id: i64) -> Result<bool, PersistenceError> {
        queries::animal_types::is_animal_type_in_use(&mut self.conn, type_id)
    }

    // ========================================================================
    // Animals and sightings
    // ========================================================================

    /// Chips a new animal at `now`.
    ///
    /// # Errors
    ///
    /// Returns `ForeignKeyViolation` if a referenced record is missing.
    pub fn create_animal(
        &mut self,
        animal: &NewAnimal,
        now: OffsetDateTime,
    ) -> Result<Animal, PersistenceError> {
        mutations::animals::create_animal(&mut self.conn, animal, now)
    }

    /// Retrieves an animal by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_animal(&mut self, animal_id: i64) -> Result<Option<Animal>, PersistenceError> {
        queries::animals::get_animal(&mut self.conn, animal_id)
    }

    /// Searches animals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn search_animals(&mut self, search: &AnimalSearch) -> Result<Vec<Animal>, PersistenceError> {
        queries::animals::search_animals(&mut self.conn, search)
    }

    /// Deletes an animal if its revision is still `expected_revision`.
    ///
    /// # Errors
    ///
    /// Returns `RevisionConflict` on a lost race, or `ForeignKeyViolation`
    /// if sightings still reference the animal.
    pub fn delete_animal(
        &mut self,
        animal_id: i64,
        expected_revision: i64,
    ) -> Result<(), PersistenceError> {
        mutations::animals::delete_animal(&mut self.conn, animal_id, expected_revision)
    }

    /// Returns an animal's trail, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_trail(&mut self, animal_id: i64) -> Result<Vec<Sighting>, PersistenceError> {
        queries::sightings::get_trail(&mut self.conn, animal_id)
    }

    /// Pages through an animal's trail.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn search_sightings(
        &mut self,
        animal_id: i64,
        search: &SightingSearch,
    ) -> Result<Vec<Sighting>, PersistenceError> {
        queries::sightings::search_sightings(&mut self.conn, animal_id, search)
    }

    // ========================================================================
    // Areas
    // ========================================================================

    /// Stores an area.
    ///
    /// # Errors
    ///
    /// Returns `UniqueViolation` if the name is taken.
    pub fn create_area(
        &mut self,
        name: &str,
        points: &[Coordinates],
    ) -> Result<Area, PersistenceError> {
        mutations::areas::create_area(&mut self.conn, name, points)
    }

    /// Retrieves an area by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_area(&mut self, area_id: i64) -> Result<Option<Area>, PersistenceError> {
        queries::areas::get_area(&mut self.conn, area_id)
    }

    /// Lists every area except `exclude`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_other_areas(&mut self, exclude: Option<i64>) -> Result<Vec<Area>, PersistenceError> {
        queries::areas::list_other_areas(&mut self.conn, exclude)
    }

    /// Renames an area and replaces its vertices.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown area and `UniqueViolation` if the
    /// name is taken.
    pub fn update_area(
        &mut self,
        area_id: i64,
        name: &str,
        points: &[Coordinates],
    ) -> Result<Area, PersistenceError> {
        mutations::areas::update_area(&mut self.conn, area_id, name, points)
    }

    /// Deletes an area.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown area.
    pub fn delete_area(&mut self, area_id: i64) -> Result<(), PersistenceError> {
        mutations::areas::delete_area(&mut self.conn, area_id)
    }
}
