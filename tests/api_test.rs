//! Integration tests for API endpoints.
//!
//! The router runs over the real services and an in-memory SQLite
//! database. Redis and the mail queue are replaced by in-process doubles.

mod common;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use dcim_api::api::create_router;
use dcim_api::errors::{AppError, AppResult};
use dcim_api::infra::{Database, MailQueue, RateLimitStore};
use dcim_api::{AppState, Config};

use common::{seeded_database, RecordingMailQueue, ADMIN_ID, PASSWORD, REQUESTER_ID};

// =============================================================================
// Test doubles
// =============================================================================

/// Counter store that admits the first `limit` requests.
struct CountingLimiter {
    limit: u64,
    seen: AtomicU64,
}

impl CountingLimiter {
    fn unlimited() -> Self {
        Self::with_limit(u64::MAX)
    }

    fn with_limit(limit: u64) -> Self {
        Self {
            limit,
            seen: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl RateLimitStore for CountingLimiter {
    async fn check_rate_limit(
        &self,
        _identifier: &str,
        _max_requests: u64,
        _window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let count = self.seen.fetch_add(1, Ordering::SeqCst) + 1;
        Ok((count, count <= self.limit))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Counter store whose backend is down.
struct UnreachableLimiter;

#[async_trait]
impl RateLimitStore for UnreachableLimiter {
    async fn check_rate_limit(&self, _: &str, _: u64, _: u64) -> AppResult<(u64, bool)> {
        Err(AppError::internal("connection refused"))
    }

    async fn ping(&self) -> AppResult<()> {
        Err(AppError::internal("connection refused"))
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

async fn app_with(cache: Arc<dyn RateLimitStore>) -> (Router, Arc<RecordingMailQueue>) {
    let db = seeded_database().await;
    let mail = RecordingMailQueue::new();
    let state = AppState::from_config(
        Arc::new(Database::from_connection(db)),
        cache,
        mail.clone() as Arc<dyn MailQueue>,
        Config::with_secret("test-secret-key-for-testing-only-32chars"),
    );
    (create_router(state), mail)
}

async fn app() -> Router {
    app_with(Arc::new(CountingLimiter::unlimited())).await.0
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn login(app: &Router, user_id: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/sessions",
        None,
        Some(json!({ "userID": user_id, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["access_token"].as_str().unwrap().to_string()
}

// =============================================================================
// Public endpoints
// =============================================================================

#[tokio::test]
async fn test_root_endpoint_returns_banner() {
    let app = app().await;

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"DCIM API");
}

#[tokio::test]
async fn test_health_reports_each_backend() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_health_degrades_when_redis_is_down() {
    let (app, _) = app_with(Arc::new(UnreachableLimiter)).await;

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["redis"]["status"], "unhealthy");
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_protected_route_needs_token() {
    let app = app().await;

    let (status, _) = send(&app, Method::GET, "/cabinets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/cabinets", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/sessions",
        None,
        Some(json!({ "userID": REQUESTER_ID, "password": "nope" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = app().await;
    let token = login(&app, REQUESTER_ID).await;

    let (status, body) = send(&app, Method::GET, "/sessions/current", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userID"], REQUESTER_ID);

    let (status, _) = send(&app, Method::DELETE, "/sessions/current", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/sessions/current", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rate_limit_rejects_excess_requests() {
    let (app, _) = app_with(Arc::new(CountingLimiter::with_limit(1))).await;

    let (first, _) = send(
        &app,
        Method::POST,
        "/sessions",
        None,
        Some(json!({ "userID": REQUESTER_ID, "password": "nope" })),
    )
    .await;
    let (second, _) = send(
        &app,
        Method::POST,
        "/sessions",
        None,
        Some(json!({ "userID": REQUESTER_ID, "password": "nope" })),
    )
    .await;

    assert_eq!(first, StatusCode::UNAUTHORIZED);
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
}

// =============================================================================
// Inventory
// =============================================================================

#[tokio::test]
async fn test_cabinet_lifecycle() {
    let app = app().await;
    let token = login(&app, REQUESTER_ID).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/cabinets",
        Some(&token),
        Some(json!({ "location": "A-01", "dataCenter": "DC1", "zone": "Hall A" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/cabinets/{}", id),
        Some(&token),
        Some(json!({ "notes": "cold aisle" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notes"], "cold aisle");
    assert_eq!(body["zone"], "Hall A");

    let (status, body) = send(
        &app,
        Method::GET,
        "/cabinets/by-datacenter/DC1",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([format!("{} - A-01", id)]));

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/cabinets/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/cabinets/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_body_is_bad_request() {
    let app = app().await;
    let token = login(&app, REQUESTER_ID).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/cabinets",
        Some(&token),
        Some(json!({ "location": "", "dataCenter": "DC1" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reference_lists() {
    let app = app().await;
    let token = login(&app, REQUESTER_ID).await;

    let (_, data_centers) = send(&app, Method::GET, "/datacenters", Some(&token), None).await;
    let (_, people) = send(&app, Method::GET, "/people", Some(&token), None).await;
    let (_, models) = send(
        &app,
        Method::GET,
        "/manufacturers/Cisco/models",
        Some(&token),
        None,
    )
    .await;
    let (_, statuses) = send(&app, Method::GET, "/devices/statuses", Some(&token), None).await;

    assert_eq!(data_centers, json!(["DC1", "DC2"]));
    assert_eq!(people, json!(["jdoe, Doe"]));
    assert_eq!(models, json!(["C9300"]));
    assert!(statuses.as_array().unwrap().contains(&json!("Reserved")));
}

// =============================================================================
// Approval workflow
// =============================================================================

#[tokio::test]
async fn test_request_then_approve() {
    let (app, mail) = app_with(Arc::new(CountingLimiter::unlimited())).await;
    let requester = login(&app, REQUESTER_ID).await;
    let admin = login(&app, ADMIN_ID).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/cabinets/approval-requests",
        Some(&requester),
        Some(json!({ "location": "B-07", "dataCenter": "DC2" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED, "{body}");
    let request_id = body["requestID"].as_i64().unwrap();
    assert_eq!(mail.sent().len(), 1);

    // Only a Super-Admin may decide
    let decision = json!({ "status": "Approved" });
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/requests/{}/decision", request_id),
        Some(&requester),
        Some(decision.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/requests/{}/decision", request_id),
        Some(&admin),
        Some(decision),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "Approved");

    let (status, _) = send(
        &app,
        Method::GET,
        "/cabinets/by-location/B-07",
        Some(&requester),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn test_account_admin_is_super_admin_only() {
    let app = app().await;
    let requester = login(&app, REQUESTER_ID).await;
    let admin = login(&app, ADMIN_ID).await;

    let (status, _) = send(&app, Method::GET, "/useraccounts", Some(&requester), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::GET, "/useraccounts", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert!(body[0].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_super_admin_cannot_remove_own_account() {
    let app = app().await;
    let admin = login(&app, ADMIN_ID).await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/useraccounts/{}", ADMIN_ID),
        Some(&admin),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_password_change_is_own_account_only() {
    let app = app().await;
    let admin = login(&app, ADMIN_ID).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/useraccounts/{}/password", REQUESTER_ID),
        Some(&admin),
        Some(json!({ "currentPassword": PASSWORD, "newPassword": "another-password-1" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
