// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router fixtures driven through `tower::ServiceExt::oneshot`.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use chipwatch_domain::{AccountFields, Role};
use chipwatch_persistence::Persistence;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::{AppState, build_router};

/// Cheapest cost bcrypt accepts; keeps the suite fast.
const TEST_HASH_COST: u32 = 4;

pub const PASSWORD: &str = "secret";
pub const ADMIN: &str = "admin@park.org";
pub const CHIPPER: &str = "chipper@park.org";
pub const USER: &str = "user@park.org";

/// A router over a fresh database holding one account per role.
pub fn create_test_app() -> Router {
    let mut persistence: Persistence = Persistence::new_in_memory()
        .expect("Failed to create in-memory persistence")
        .with_password_hash_cost(TEST_HASH_COST);

    for (first_name, email, role) in [
        ("Admin", ADMIN, Role::Admin),
        ("Chipper", CHIPPER, Role::Chipper),
        ("User", USER, Role::User),
    ] {
        let fields: AccountFields = AccountFields {
            first_name: String::from(first_name),
            last_name: String::from("Tester"),
            email: String::from(email),
        };
        persistence
            .create_account(&fields, PASSWORD, role)
            .expect("Failed to seed account");
    }

    build_router(AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    })
}

pub fn basic(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{email}:{password}")))
}

/// Sends one request, authenticating as `email` when given.
///
/// Returns the status and the decoded JSON body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    email: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(email) = email {
        builder = builder.header(header::AUTHORIZATION, basic(email, PASSWORD));
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(app, request).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Creates a location as the chipper and returns its id.
pub async fn location(app: &Router, latitude: f64, longitude: f64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/locations",
        Some(CHIPPER),
        Some(json!({ "latitude": latitude, "longitude": longitude })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

/// Creates an animal type as the chipper and returns its id.
pub async fn animal_type(app: &Router, name: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/animals/types",
        Some(CHIPPER),
        Some(json!({ "type": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

/// The seeded chipper's account id.
pub async fn chipper_id(app: &Router) -> i64 {
    let (status, body) = send(
        app,
        "GET",
        "/accounts/search?email=chipper",
        Some(USER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body[0]["id"].as_i64().unwrap()
}

/// Chips an animal of the given types at `location_id` and returns its id.
pub async fn animal(app: &Router, type_ids: &[i64], location_id: i64) -> i64 {
    let chipper_id: i64 = chipper_id(app).await;
    let (status, body) = send(
        app,
        "POST",
        "/animals",
        Some(CHIPPER),
        Some(json!({
            "animalTypes": type_ids,
            "weight": 40.0,
            "length": 1.5,
            "height": 0.8,
            "gender": "FEMALE",
            "chipperId": chipper_id,
            "chippingLocationId": location_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}
