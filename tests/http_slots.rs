//! Committee Slot HTTP Tests
//!
//! Drives the full router through `oneshot` against an in-memory database:
//! - Create increments the committee total
//! - Update applies the signed delta
//! - Delete leaves the total untouched (default policy)
//! - Constraint, not-found and validation failures map to 409 / 404 / 400

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use committee_api::http_server::{AppState, HttpServer, HttpServerConfig};
use committee_api::slots::SlotPolicy;
use committee_api::store::Database;

// =============================================================================
// Test Utilities
// =============================================================================

async fn app(policy: SlotPolicy) -> Router {
    let db = Arc::new(Database::in_memory());
    db.ensure_schema().await.unwrap();
    let state = Arc::new(AppState::new(db, policy));
    HttpServer::with_config(HttpServerConfig::default(), state).router()
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, json)
}

async fn send_raw(router: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Committee 1 "Budget" and divisions AO, AS, LA
async fn seed(router: &Router) {
    let (status, _, _) = send(
        router,
        Method::POST,
        "/committees",
        Some(json!({"name": "Budget", "description": "Budget review"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    for (short_name, name) in [
        ("AO", "Academic Organization"),
        ("AS", "Arts and Sciences"),
        ("LA", "Liberal Arts"),
    ] {
        let (status, _, _) = send(
            router,
            Method::POST,
            "/senate-divisions",
            Some(json!({"shortName": short_name, "name": name})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

async fn create_slot(router: &Router, committee_id: i64, division: &str, n: i64) -> Value {
    let (status, _, body) = send(
        router,
        Method::POST,
        "/committee-slots",
        Some(json!({
            "committeeId": committee_id,
            "senateDivision": division,
            "slotRequirements": n
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

async fn total_slots(router: &Router, committee_id: i64) -> i64 {
    let (status, _, body) = send(
        router,
        Method::GET,
        &format!("/committees/{}", committee_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["totalSlots"].as_i64().unwrap()
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_returns_location_and_increments_total() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;

    let (status, headers, body) = send(
        &router,
        Method::POST,
        "/committee-slots",
        Some(json!({"committeeId": 1, "senateDivision": "AO", "slotRequirements": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        headers.get(header::LOCATION).unwrap(),
        "/committee-slots/1/AO"
    );
    assert_eq!(body["committeeId"], 1);
    assert_eq!(body["senateDivision"], "AO");
    assert_eq!(body["slotRequirements"], 5);
    assert_eq!(body["totalSlots"], 5);

    create_slot(&router, 1, "AS", 3).await;
    assert_eq!(total_slots(&router, 1).await, 8);
}

#[tokio::test]
async fn test_create_with_zero_requirements() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;

    let body = create_slot(&router, 1, "LA", 0).await;
    assert_eq!(body["totalSlots"], 0);
}

#[tokio::test]
async fn test_create_unknown_committee_is_conflict() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;

    let (status, _, body) = send(
        &router,
        Method::POST,
        "/committee-slots",
        Some(json!({"committeeId": 999, "senateDivision": "AO", "slotRequirements": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "FOREIGN_KEY_VIOLATION");
    assert_eq!(body["code"], 409);
    assert!(body.get("detail").is_none());

    // no slot row, no aggregate change
    let (status, _, _) = send(&router, Method::GET, "/committee-slots/999/AO", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(total_slots(&router, 1).await, 0);
}

#[tokio::test]
async fn test_create_unknown_division_is_conflict() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;

    let (status, _, body) = send(
        &router,
        Method::POST,
        "/committee-slots",
        Some(json!({"committeeId": 1, "senateDivision": "ZZ", "slotRequirements": 4})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "FOREIGN_KEY_VIOLATION");
    assert_eq!(total_slots(&router, 1).await, 0);
}

#[tokio::test]
async fn test_duplicate_slot_is_conflict_and_total_unchanged() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;
    create_slot(&router, 1, "AO", 5).await;

    let (status, _, body) = send(
        &router,
        Method::POST,
        "/committee-slots",
        Some(json!({"committeeId": 1, "senateDivision": "AO", "slotRequirements": 7})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "DUPLICATE_SLOT");
    assert_eq!(total_slots(&router, 1).await, 5);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_missing_and_negative_requirements_are_bad_requests() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;

    let (status, _, body) = send(
        &router,
        Method::POST,
        "/committee-slots",
        Some(json!({"committeeId": 1, "senateDivision": "AO"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "slotRequirements is required");

    let (status, _, _) = send(
        &router,
        Method::POST,
        "/committee-slots",
        Some(json!({"committeeId": 1, "senateDivision": "AO", "slotRequirements": -3})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &router,
        Method::PUT,
        "/committee-slots/1/AO",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(total_slots(&router, 1).await, 0);
}

#[tokio::test]
async fn test_malformed_bodies_are_bad_requests() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;

    let (status, body) = send_raw(&router, Method::POST, "/committee-slots", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "VALIDATION_ERROR");

    let (status, _) = send_raw(
        &router,
        Method::POST,
        "/committee-slots",
        r#"{"committeeId": 1, "senateDivision": "AO", "slotRequirements": "five"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_numeric_committee_id_is_bad_request() {
    let router = app(SlotPolicy::default()).await;

    let (status, _, body) = send(&router, Method::DELETE, "/committee-slots/abc/AO", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "VALIDATION_ERROR");
}

// =============================================================================
// Location and division names
// =============================================================================

async fn create_division(router: &Router, short_name: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(
        router,
        Method::POST,
        "/senate-divisions",
        Some(json!({"shortName": short_name, "name": "Joint Division"})),
    )
    .await;
    (status, body)
}

#[tokio::test]
async fn test_location_with_space_resolves_to_the_slot() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;
    let (status, _) = create_division(&router, "Arts Sci").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, headers, _) = send(
        &router,
        Method::POST,
        "/committee-slots",
        Some(json!({"committeeId": 1, "senateDivision": "Arts Sci", "slotRequirements": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let location = headers[header::LOCATION].to_str().unwrap().to_string();
    assert_eq!(location, "/committee-slots/1/Arts%20Sci");

    let (status, _, body) = send(&router, Method::GET, &location, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["senateDivision"], "Arts Sci");
    assert_eq!(body["slotRequirements"], 2);

    let (status, _, body) = send(
        &router,
        Method::PUT,
        &location,
        Some(json!({"slotRequirements": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["aggregateDelta"], 3);
    assert_eq!(total_slots(&router, 1).await, 5);
}

#[tokio::test]
async fn test_location_of_seeded_division_round_trips() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;

    let (_, headers, _) = send(
        &router,
        Method::POST,
        "/committee-slots",
        Some(json!({"committeeId": 1, "senateDivision": "LA", "slotRequirements": 1})),
    )
    .await;
    let location = headers[header::LOCATION].to_str().unwrap().to_string();

    let (status, _, body) = send(&router, Method::GET, &location, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["committeeId"], 1);
    assert_eq!(body["senateDivision"], "LA");
}

#[tokio::test]
async fn test_division_with_slash_is_rejected_before_any_write() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;

    let (status, body) = create_division(&router, "A/B").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "VALIDATION_ERROR");

    let (status, _, body) = send(
        &router,
        Method::POST,
        "/committee-slots",
        Some(json!({"committeeId": 1, "senateDivision": "A/B", "slotRequirements": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "senateDivision must not contain '/'");
    assert_eq!(total_slots(&router, 1).await, 0);

    let (status, _, _) = send(&router, Method::GET, "/committee-slots/1/A%2FB", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_division_with_control_character_is_rejected_before_any_write() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;

    let (status, body) = create_division(&router, "A\u{1}B").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "shortName must not contain control characters");

    let (status, _, body) = send(
        &router,
        Method::POST,
        "/committee-slots",
        Some(json!({"committeeId": 1, "senateDivision": "A\u{1}B", "slotRequirements": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "VALIDATION_ERROR");
    assert_eq!(total_slots(&router, 1).await, 0);

    let (status, _, body) = send(
        &router,
        Method::POST,
        "/committees",
        Some(json!({"name": "Bud\u{7}get"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name must not contain control characters");
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_applies_signed_delta() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;
    create_slot(&router, 1, "AO", 10).await;
    create_slot(&router, 1, "AS", 10).await;
    assert_eq!(total_slots(&router, 1).await, 20);

    let (status, _, body) = send(
        &router,
        Method::PUT,
        "/committee-slots/1/AO",
        Some(json!({"slotRequirements": 15})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rowCount"], 1);
    assert_eq!(body["previous"], 10);
    assert_eq!(body["slotRequirements"], 15);
    assert_eq!(body["delta"], 5);
    assert_eq!(body["totalSlots"], 25);

    let (status, _, body) = send(
        &router,
        Method::PUT,
        "/committee-slots/1/AS",
        Some(json!({"slotRequirements": 8})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["delta"], -2);
    assert_eq!(body["totalSlots"], 23);

    let (_, _, slot) = send(&router, Method::GET, "/committee-slots/1/AS", None).await;
    assert_eq!(slot["slotRequirements"], 8);
}

#[tokio::test]
async fn test_update_missing_slot_is_not_found() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;

    let (status, _, body) = send(
        &router,
        Method::PUT,
        "/committee-slots/999/ZZ",
        Some(json!({"slotRequirements": 3})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "SLOT_NOT_FOUND");
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_update_below_minimum_is_rejected() {
    let policy = SlotPolicy {
        min_total_slots: Some(15),
        ..SlotPolicy::default()
    };
    let router = app(policy).await;
    seed(&router).await;
    create_slot(&router, 1, "AO", 10).await;
    create_slot(&router, 1, "AS", 10).await;

    let (status, _, body) = send(
        &router,
        Method::PUT,
        "/committee-slots/1/AS",
        Some(json!({"slotRequirements": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "SLOT_MINIMUM_VIOLATION");
    assert_eq!(total_slots(&router, 1).await, 20);

    // reductions that stay at or above the minimum go through
    let (status, _, body) = send(
        &router,
        Method::PUT,
        "/committee-slots/1/AS",
        Some(json!({"slotRequirements": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalSlots"], 15);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_keeps_total_by_default() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;
    create_slot(&router, 1, "AO", 6).await;

    let (status, _, body) = send(&router, Method::DELETE, "/committee-slots/1/AO", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);
    assert_eq!(body["rowCount"], 1);
    assert_eq!(body["aggregateDelta"], 0);

    // the aggregate is not decremented on delete
    assert_eq!(total_slots(&router, 1).await, 6);

    let (status, _, body) = send(&router, Method::DELETE, "/committee-slots/1/AO", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "SLOT_NOT_FOUND");
}

#[tokio::test]
async fn test_delete_decrements_when_enabled() {
    let policy = SlotPolicy {
        decrement_on_delete: true,
        ..SlotPolicy::default()
    };
    let router = app(policy).await;
    seed(&router).await;
    create_slot(&router, 1, "AO", 6).await;
    create_slot(&router, 1, "LA", 2).await;

    let (status, _, body) = send(&router, Method::DELETE, "/committee-slots/1/AO", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["aggregateDelta"], -6);
    assert_eq!(total_slots(&router, 1).await, 2);
}

// =============================================================================
// Metrics
// =============================================================================

#[tokio::test]
async fn test_metrics_count_outcomes() {
    let router = app(SlotPolicy::default()).await;
    seed(&router).await;
    create_slot(&router, 1, "AO", 4).await;

    send(
        &router,
        Method::PUT,
        "/committee-slots/1/AO",
        Some(json!({"slotRequirements": 6})),
    )
    .await;
    send(&router, Method::DELETE, "/committee-slots/1/AO", None).await;
    send(&router, Method::DELETE, "/committee-slots/1/AO", None).await;
    send(
        &router,
        Method::POST,
        "/committee-slots",
        Some(json!({"committeeId": 1})),
    )
    .await;

    let (status, _, metrics) = send(&router, Method::GET, "/observability/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics["slots_created"], 1);
    assert_eq!(metrics["slots_updated"], 1);
    assert_eq!(metrics["slots_deleted"], 1);
    assert_eq!(metrics["not_found"], 1);
    assert_eq!(metrics["validation_rejections"], 1);
    assert_eq!(metrics["conflicts"], 0);
}
