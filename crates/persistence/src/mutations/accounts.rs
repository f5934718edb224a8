// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::{Account, AccountFields, Role};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::accounts;
use crate::error::PersistenceError;

/// Creates an account, hashing the password with bcrypt.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `fields` - Names and email
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The role to grant
/// * `hash_cost` - The bcrypt cost factor
///
/// # Errors
///
/// Returns an error if hashing fails or the email is already taken.
pub fn create_account(
    conn: &mut SqliteConnection,
    fields: &AccountFields,
    password: &str,
    role: Role,
    hash_cost: u32,
) -> Result<Account, PersistenceError> {
    let password_hash: String = bcrypt::hash(password, hash_cost)?;

    diesel::insert_into(accounts::table)
        .values((
            accounts::first_name.eq(&fields.first_name),
            accounts::last_name.eq(&fields.last_name),
            accounts::email.eq(&fields.email),
            accounts::password_hash.eq(&password_hash),
            accounts::role.eq(role.as_str()),
        ))
        .execute(conn)?;

    let account_id: i64 = conn.get_last_insert_rowid()?;
    info!(account_id, role = %role, "Account created");

    Ok(Account {
        account_id,
        first_name: fields.first_name.clone(),
        last_name: fields.last_name.clone(),
        email: fields.email.clone(),
        role,
    })
}

/// Replaces an account's fields and password. The role changes only when
/// `role` is given.
///
/// # Errors
///
/// Returns an error if hashing fails, the account does not exist, or the
/// email is taken by another account.
pub fn update_account(
    conn: &mut SqliteConnection,
    account_id: i64,
    fields: &AccountFields,
    password: &str,
    role: Option<Role>,
    hash_cost: u32,
) -> Result<(), PersistenceError> {
    let password_hash: String = bcrypt::hash(password, hash_cost)?;

    let updated: usize = diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set((
            accounts::first_name.eq(&fields.first_name),
            accounts::last_name.eq(&fields.last_name),
            accounts::email.eq(&fields.email),
            accounts::password_hash.eq(&password_hash),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Account {account_id}")));
    }

    if let Some(role) = role {
        diesel::update(accounts::table)
            .filter(accounts::account_id.eq(account_id))
            .set(accounts::role.eq(role.as_str()))
            .execute(conn)?;
    }

    info!(account_id, "Account updated");
    Ok(())
}

/// Deletes an account.
///
/// # Errors
///
/// Returns an error if the account does not exist or is still referenced.
pub fn delete_account(conn: &mut SqliteConnection, account_id: i64) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!("Account {account_id}")));
    }

    info!(account_id, "Account deleted");
    Ok(())
}
