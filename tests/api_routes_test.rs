//! HTTP surface: registration, auth guards, and the booking flow end-to-end
//! through the router.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use matchfit::api::routes::create_routes;
use matchfit::store::MemoryStore;

fn test_app() -> Router {
    create_routes(Arc::new(MemoryStore::new()), "test_secret_key_for_testing_only")
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(
            body.map(|b| b.to_string()).unwrap_or_default(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, name: &str, email: &str, role: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": "SecurePass123!",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registration failed: {body}");
    (
        body["access_token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    let app = test_app();
    let (status, _) = send(&app, Method::GET, "/api/sessions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/sessions",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_round_trip() {
    let app = test_app();
    register(&app, "Jordan Reyes", "jordan@example.com", "client").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({
            "email": "Jordan@Example.com",
            "password": "SecurePass123!",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({
            "email": "jordan@example.com",
            "password": "WrongPass123!",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_booking_flow_over_http() {
    let app = test_app();
    let (trainer_token, trainer_id) =
        register(&app, "Maya Chen", "maya@example.com", "trainer").await;
    let (client_token, _) = register(&app, "Jordan Reyes", "jordan@example.com", "client").await;

    // The trainer advertises a slot.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/trainers/{trainer_id}/availability"),
        Some(&trainer_token),
        Some(json!({"slot": "Mon 10:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // A client may not mutate someone else's schedule.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/trainers/{trainer_id}/availability"),
        Some(&client_token),
        Some(json!({"slot": "Tue 09:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The client books it.
    let date = (Utc::now().date_naive() + Duration::days(1)).to_string();
    let (status, booked) = send(
        &app,
        Method::POST,
        "/api/sessions",
        Some(&client_token),
        Some(json!({
            "trainer_id": trainer_id,
            "date": date,
            "time": "Mon 10:00",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "booking failed: {booked}");
    assert_eq!(booked["status"], "booked");
    assert_eq!(booked["trainer_name"], "Maya Chen");

    // The slot is consumed.
    let (status, slots) = send(
        &app,
        Method::GET,
        &format!("/api/trainers/{trainer_id}/availability"),
        Some(&client_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slots, json!([]));

    // A second booking for the same slot is contention, not success.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/sessions",
        Some(&client_token),
        Some(json!({
            "trainer_id": trainer_id,
            "date": date,
            "time": "Mon 10:00",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Both sides see the session and the relationship.
    let (status, sessions) = send(&app, Method::GET, "/api/sessions", Some(&client_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sessions.as_array().unwrap().len(), 1);

    let (status, dashboard) = send(
        &app,
        Method::GET,
        "/api/dashboard/trainer",
        Some(&trainer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["client_count"], 1);
}

#[tokio::test]
async fn test_certification_endpoints_enforce_uniqueness() {
    let app = test_app();
    let (trainer_token, trainer_id) =
        register(&app, "Maya Chen", "maya@example.com", "trainer").await;

    let uri = format!("/api/trainers/{trainer_id}/certifications");
    let (status, _) = send(
        &app,
        Method::POST,
        &uri,
        Some(&trainer_token),
        Some(json!({"name": "NASM-CPT"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        &uri,
        Some(&trainer_token),
        Some(json!({"name": "NASM-CPT"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, listed) = send(&app, Method::GET, &uri, Some(&trainer_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!(["NASM-CPT"]));
}
