// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feedback and location route tests.

use axum::http::StatusCode;
use cleanstreet::models::Role;
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_feedback_submit_is_public() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/feedback",
            None,
            Some(json!({
                "subject": "  Map  ",
                "message": " The map takes a long time to load. ",
                "contactName": "   ",
                "contactEmail": null
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = common::body_json(response).await;
    assert_eq!(body["subject"], "Map");
    assert_eq!(body["message"], "The map takes a long time to load.");
    assert!(body["contactName"].is_null());
    assert!(body["contactEmail"].is_null());
    assert_eq!(state.db.list_feedback().len(), 1);
}

#[tokio::test]
async fn test_feedback_validation() {
    let (app, _) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/feedback",
            None,
            Some(json!({ "subject": "   ", "message": "Something useful." })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/feedback",
            None,
            Some(json!({
                "subject": "App",
                "message": "Something useful.",
                "contactName": "Pat",
                "contactEmail": "pat-at-example"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        common::body_json(response).await["message"],
        "contact_email: contactEmail must be a valid address"
    );
}

#[tokio::test]
async fn test_feedback_listing_is_admin_only() {
    let (app, state) = common::create_test_app();
    let (_, user_token) =
        common::seed_with_token(&state, "Asha Rao", "asha@example.com", Role::User);
    let (_, admin_token) =
        common::seed_with_token(&state, "Admin", "admin@example.com", Role::Admin);

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/feedback",
            None,
            Some(json!({
                "subject": "Thanks",
                "message": "The pothole outside my house was fixed in a day.",
                "contactName": "Asha",
                "contactEmail": "asha@example.com"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(common::json_request("GET", "/api/feedback", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(common::json_request("GET", "/api/feedback", Some(&user_token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(common::json_request("GET", "/api/feedback", Some(&admin_token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body[0]["subject"], "Thanks");
    assert_eq!(body[0]["contactEmail"], "asha@example.com");
}

#[tokio::test]
async fn test_location_management() {
    let (app, state) = common::create_test_app();
    let (_, user_token) =
        common::seed_with_token(&state, "Asha Rao", "asha@example.com", Role::User);
    let (_, admin_token) =
        common::seed_with_token(&state, "Admin", "admin@example.com", Role::Admin);

    let koramangala = json!({ "areaName": " Koramangala ", "city": "Bengaluru", "pincode": "560034" });

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/locations",
            Some(&user_token),
            Some(koramangala.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/locations",
            Some(&admin_token),
            Some(koramangala.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = common::body_json(response).await;
    assert_eq!(created["areaName"], "Koramangala");
    let id = created["id"].as_u64().unwrap();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/locations",
            Some(&admin_token),
            Some(koramangala),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(common::json_request(
            "PUT",
            &format!("/api/locations/{}", id),
            Some(&admin_token),
            Some(json!({ "areaName": "Koramangala 5th Block", "city": "Bengaluru" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = common::body_json(response).await;
    assert_eq!(updated["areaName"], "Koramangala 5th Block");
    assert!(updated["pincode"].is_null());

    // Any signed-in user can read
    let response = app
        .clone()
        .oneshot(common::json_request(
            "GET",
            &format!("/api/locations/{}", id),
            Some(&user_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(common::json_request(
            "DELETE",
            &format!("/api/locations/{}", id),
            Some(&admin_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(common::json_request(
            "GET",
            &format!("/api/locations/{}", id),
            Some(&user_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_location_in_use_not_deleted() {
    let (app, state) = common::create_test_app();
    let (_, user_token) =
        common::seed_with_token(&state, "Asha Rao", "asha@example.com", Role::User);
    let (_, admin_token) =
        common::seed_with_token(&state, "Admin", "admin@example.com", Role::Admin);

    let complaint = json!({
        "title": "Overflowing bin",
        "description": "The bin at the park gate has not been emptied in days.",
        "locationAddress": "Cubbon Park"
    });
    let response = app
        .clone()
        .oneshot(common::complaint_request(
            "POST",
            "/api/complaints",
            &user_token,
            common::complaint_multipart(&complaint, None),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let location_id = common::body_json(response).await["location"]["id"]
        .as_u64()
        .unwrap();

    let response = app
        .clone()
        .oneshot(common::json_request("GET", "/api/locations", Some(&user_token), None))
        .await
        .unwrap();
    let locations = common::body_json(response).await;
    assert_eq!(locations[0]["areaName"], "Cubbon Park");

    let response = app
        .oneshot(common::json_request(
            "DELETE",
            &format!("/api/locations/{}", location_id),
            Some(&admin_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
