use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, state};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

/// Request carrying the credential headers every SDK call sends.
fn authed_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header("pat", "project-token")
        .header("secret", "dev-secret")
        .body(body.to_string())
        .unwrap()
}

fn bare_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- check-limits ---

#[tokio::test]
async fn check_limits_reports_limit_not_reached() {
    let db = state();
    let resp = app(db.clone())
        .oneshot(authed_request(
            "GET",
            "/api/v1/account/check-limits/dev-secret",
            "",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["limitReached"], false);

    let state = db.read().await;
    assert_eq!(state.check_limit_hits, 1);
    assert_eq!(state.last_path_secret.as_deref(), Some("dev-secret"));
    assert_eq!(state.last_pat.as_deref(), Some("project-token"));
}

#[tokio::test]
async fn check_limits_reports_limit_reached_when_scripted() {
    let db = state();
    db.write().await.limit_reached = true;
    let resp = app(db)
        .oneshot(authed_request(
            "GET",
            "/api/v1/account/check-limits/dev-secret",
            "",
        ))
        .await
        .unwrap();

    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["limitReached"], true);
}

#[tokio::test]
async fn check_limits_without_credentials_returns_401() {
    let db = state();
    let resp = app(db.clone())
        .oneshot(bare_request(
            "GET",
            "/api/v1/account/check-limits/dev-secret",
            "",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(db.read().await.check_limit_hits, 0);
}

#[tokio::test]
async fn check_limits_honors_status_override() {
    let db = state();
    db.write().await.check_status = 500;
    let resp = app(db)
        .oneshot(authed_request(
            "GET",
            "/api/v1/account/check-limits/dev-secret",
            "",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn check_limits_honors_body_override() {
    let db = state();
    db.write().await.check_body_override = Some("not json".to_string());
    let resp = app(db)
        .oneshot(authed_request(
            "GET",
            "/api/v1/account/check-limits/dev-secret",
            "",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await.as_ref(), b"not json");
}

// --- register event ---

#[tokio::test]
async fn register_event_records_payload() {
    let db = state();
    let resp = app(db.clone())
        .oneshot(authed_request(
            "POST",
            "/api/v1/register/event",
            r#"{"title":"Payment","sessionID":"s-1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let state = db.read().await;
    assert_eq!(state.events.len(), 1);
    assert_eq!(state.events[0]["title"], "Payment");
    assert_eq!(state.events[0]["sessionID"], "s-1");
}

#[tokio::test]
async fn register_event_without_credentials_returns_401() {
    let db = state();
    let resp = app(db.clone())
        .oneshot(bare_request(
            "POST",
            "/api/v1/register/event",
            r#"{"title":"Payment"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(db.read().await.events.is_empty());
}

#[tokio::test]
async fn register_event_honors_status_override() {
    let db = state();
    db.write().await.event_status = 503;
    let resp = app(db.clone())
        .oneshot(authed_request(
            "POST",
            "/api/v1/register/event",
            r#"{"title":"Payment"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    // The request still reached the endpoint.
    assert_eq!(db.read().await.events.len(), 1);
}

// --- register user ---

#[tokio::test]
async fn register_user_records_payload() {
    let db = state();
    let resp = app(db.clone())
        .oneshot(authed_request(
            "POST",
            "/api/v1/register/user",
            r#"{"id":"u-1","full_name":"Ada Lovelace"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let state = db.read().await;
    assert_eq!(state.users.len(), 1);
    assert_eq!(state.users[0]["full_name"], "Ada Lovelace");
}

#[tokio::test]
async fn register_user_honors_status_override() {
    let db = state();
    db.write().await.user_status = 500;
    let resp = app(db)
        .oneshot(authed_request(
            "POST",
            "/api/v1/register/user",
            r#"{"id":"u-1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
