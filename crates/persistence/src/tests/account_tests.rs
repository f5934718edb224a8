// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chipwatch_domain::{Account, Role};

use super::helpers::{account_fields, new_store, seed_animal, seed_animal_type, seed_chipper, seed_location};
use crate::{AccountSearch, Persistence, PersistenceError};

fn search(first_name: Option<&str>, email: Option<&str>, from: i64, size: i64) -> AccountSearch {
    AccountSearch {
        first_name: first_name.map(String::from),
        last_name: None,
        email: email.map(String::from),
        from,
        size,
    }
}

#[test]
fn test_create_account_assigns_id_and_role() {
    let mut persistence: Persistence = new_store();

    let account: Account = persistence
        .create_account(&account_fields("Grace", "Hopper", "grace@navy.mil"), "cobol", Role::Admin)
        .unwrap();

    let stored: Account = persistence.get_account(account.account_id).unwrap().unwrap();
    assert_eq!(stored, account);
    assert_eq!(stored.role, Role::Admin);
}

#[test]
fn test_duplicate_email_is_rejected() {
    let mut persistence: Persistence = new_store();
    seed_chipper(&mut persistence);

    let result = persistence.create_account(
        &account_fields("Other", "Person", "ada@park.org"),
        "secret",
        Role::User,
    );

    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));
}

#[test]
fn test_verify_credentials_checks_the_password_hash() {
    let mut persistence: Persistence = new_store();
    let chipper: Account = seed_chipper(&mut persistence);

    let verified = persistence
        .verify_credentials("ada@park.org", "secret")
        .unwrap();
    assert_eq!(verified, Some(chipper));

    assert!(
        persistence
            .verify_credentials("ada@park.org", "wrong")
            .unwrap()
            .is_none()
    );
    assert!(
        persistence
            .verify_credentials("nobody@park.org", "secret")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_search_matches_case_insensitive_fragments_in_id_order() {
    let mut persistence: Persistence = new_store();
    let anna: Account = persistence
        .create_account(&account_fields("Anna", "Berg", "anna@park.org"), "pw", Role::User)
        .unwrap();
    persistence
        .create_account(&account_fields("Bob", "Stone", "bob@lake.org"), "pw", Role::User)
        .unwrap();
    let joanna: Account = persistence
        .create_account(&account_fields("Joanna", "Field", "jo@park.org"), "pw", Role::User)
        .unwrap();

    let by_name: Vec<Account> = persistence
        .search_accounts(&search(Some("ANNA"), None, 0, 10))
        .unwrap();
    assert_eq!(by_name, vec![anna.clone(), joanna.clone()]);

    let by_email: Vec<Account> = persistence
        .search_accounts(&search(None, Some("park"), 1, 10))
        .unwrap();
    assert_eq!(by_email, vec![joanna]);

    let first_page: Vec<Account> = persistence.search_accounts(&search(None, None, 0, 1)).unwrap();
    assert_eq!(first_page, vec![anna]);
}

#[test]
fn test_update_account_keeps_role_unless_given() {
    let mut persistence: Persistence = new_store();
    let chipper: Account = seed_chipper(&mut persistence);

    let updated: Account = persistence
        .update_account(
            chipper.account_id,
            &account_fields("Ada", "Lovelace", "ada@engine.org"),
            "new-secret",
            None,
        )
        .unwrap();
    assert_eq!(updated.last_name, "Lovelace");
    assert_eq!(updated.role, Role::Chipper);

    assert!(
        persistence
            .verify_credentials("ada@engine.org", "new-secret")
            .unwrap()
            .is_some()
    );

    let promoted: Account = persistence
        .update_account(
            chipper.account_id,
            &account_fields("Ada", "Lovelace", "ada@engine.org"),
            "new-secret",
            Some(Role::Admin),
        )
        .unwrap();
    assert_eq!(promoted.role, Role::Admin);
}

#[test]
fn test_update_unknown_account_is_not_found() {
    let mut persistence: Persistence = new_store();

    let result = persistence.update_account(
        42,
        &account_fields("No", "Body", "no@body.org"),
        "pw",
        None,
    );

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_chipper_account_cannot_be_deleted() {
    let mut persistence: Persistence = new_store();
    let chipper: Account = seed_chipper(&mut persistence);
    let location = seed_location(&mut persistence, 1.0, 1.0);
    let type_id: i64 = seed_animal_type(&mut persistence, "wolf");
    seed_animal(&mut persistence, type_id, chipper.account_id, location.location_id);

    assert!(persistence.is_account_chipper(chipper.account_id).unwrap());
    assert!(matches!(
        persistence.delete_account(chipper.account_id),
        Err(PersistenceError::ForeignKeyViolation(_))
    ));
}

#[test]
fn test_delete_account_removes_it() {
    let mut persistence: Persistence = new_store();
    let chipper: Account = seed_chipper(&mut persistence);

    assert!(!persistence.is_account_chipper(chipper.account_id).unwrap());
    persistence.delete_account(chipper.account_id).unwrap();

    assert!(persistence.get_account(chipper.account_id).unwrap().is_none());
    assert!(matches!(
        persistence.delete_account(chipper.account_id),
        Err(PersistenceError::NotFound(_))
    ));
}
