// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::Account;
use diesel::SqliteConnection;
use diesel::dsl::exists;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{AccountRow, AccountSearch};
use crate::diesel_schema::{accounts, animals};
use crate::error::PersistenceError;

/// Retrieves an account by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the account is not found.
pub fn get_account(
    conn: &mut SqliteConnection,
    account_id: i64,
) -> Result<Option<Account>, PersistenceError> {
    accounts::table
        .filter(accounts::account_id.eq(account_id))
        .select(AccountRow::as_select())
        .first(conn)
        .optional()?
        .map(AccountRow::into_account)
        .transpose()
}

/// Retrieves the stored row, password hash included, for an email.
///
/// Emails are compared exactly.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_account_row_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<AccountRow>, PersistenceError> {
    debug!(email, "Looking up account by email");

    Ok(accounts::table
        .filter(accounts::email.eq(email))
        .select(AccountRow::as_select())
        .first(conn)
        .optional()?)
}

/// Searches accounts by case-insensitive name and email fragments.
///
/// Results are ordered by account ID and paged with `from`/`size`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn search_accounts(
    conn: &mut SqliteConnection,
    search: &AccountSearch,
) -> Result<Vec<Account>, PersistenceError> {
    let mut query = accounts::table
        .select(AccountRow::as_select())
        .into_boxed();

    // SQLite LIKE folds ASCII case
    if let Some(first_name) = &search.first_name {
        query = query.filter(accounts::first_name.like(format!("%{first_name}%")));
    }
    if let Some(last_name) = &search.last_name {
        query = query.filter(accounts::last_name.like(format!("%{last_name}%")));
    }
    if let Some(email) = &search.email {
        query = query.filter(accounts::email.like(format!("%{email}%")));
    }

    let rows: Vec<AccountRow> = query
        .order(accounts::account_id.asc())
        .offset(search.from)
        .limit(search.size)
        .load(conn)?;

    rows.into_iter().map(AccountRow::into_account).collect()
}

/// Returns whether the account chipped at least one animal.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn is_account_chipper(
    conn: &mut SqliteConnection,
    account_id: i64,
) -> Result<bool, PersistenceError> {
    Ok(diesel::select(exists(
        animals::table.filter(animals::chipper_id.eq(account_id)),
    ))
    .get_result(conn)?)
}
