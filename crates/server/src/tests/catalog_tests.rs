// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Locations and animal types over HTTP.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::json;

use super::helpers::{
    ADMIN, CHIPPER, PASSWORD, USER, animal_type, basic, create_test_app, location, send,
    send_request,
};

#[tokio::test]
async fn test_location_round_trip_and_lookup() {
    let app = create_test_app();
    let point_id: i64 = location(&app, 45.5, -73.5).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/locations/{point_id}"),
        Some(USER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["latitude"], 45.5);

    let (status, body) = send(
        &app,
        "GET",
        "/locations?latitude=45.5&longitude=-73.5",
        Some(USER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_i64(), Some(point_id));

    let (status, _) = send(
        &app,
        "GET",
        "/locations?latitude=1.0&longitude=1.0",
        Some(USER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_location_errors_map_to_statuses() {
    let app = create_test_app();
    location(&app, 1.0, 1.0).await;

    let (status, _) = send(
        &app,
        "POST",
        "/locations",
        Some(CHIPPER),
        Some(json!({ "latitude": 1.0, "longitude": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        "POST",
        "/locations",
        Some(CHIPPER),
        Some(json!({ "latitude": 95.0, "longitude": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);

    let (status, _) = send(&app, "GET", "/locations/0", Some(USER), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/locations/999", Some(USER), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = create_test_app();

    let request: Request<Body> = Request::builder()
        .method("POST")
        .uri("/locations")
        .header(header::AUTHORIZATION, basic(CHIPPER, PASSWORD))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"latitude\": "))
        .unwrap();
    let (status, _) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request: Request<Body> = Request::builder()
        .method("POST")
        .uri("/locations")
        .header(header::AUTHORIZATION, basic(CHIPPER, PASSWORD))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"latitude\": \"north\"}"))
        .unwrap();
    let (status, _) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_animal_type_routes_sit_beside_animal_routes() {
    let app = create_test_app();
    let type_id: i64 = animal_type(&app, "wolf").await;
    let uri: String = format!("/animals/types/{type_id}");

    let (status, body) = send(&app, "GET", &uri, Some(USER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "wolf");

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(CHIPPER),
        Some(json!({ "type": "grey wolf" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "grey wolf");

    let (status, _) = send(
        &app,
        "POST",
        "/animals/types",
        Some(CHIPPER),
        Some(json!({ "type": "grey wolf" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "DELETE", &uri, Some(CHIPPER), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &uri, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &uri, Some(USER), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
