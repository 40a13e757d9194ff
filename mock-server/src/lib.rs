//! In-process stand-in for the Evntaly API, used by the client's
//! integration tests.
//!
//! # Design
//! State is shared behind `Arc<RwLock<_>>` and doubles as the test harness:
//! the write half scripts server behavior (limit flag, status overrides, a
//! raw-body override for malformed-response tests) and the read half records
//! what the client actually sent (hit counts, payloads, credential headers).
//! Requests without the `pat` and `secret` headers are rejected with 401, so
//! a passing client test also proves the default headers are attached.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Scriptable behavior plus a record of everything received.
#[derive(Debug)]
pub struct ServerState {
    /// Value of `limitReached` in the check-limits response.
    pub limit_reached: bool,
    /// Status returned by the check-limits endpoint.
    pub check_status: u16,
    /// When set, returned verbatim as the check-limits body.
    pub check_body_override: Option<String>,
    /// Status returned by the register-event endpoint.
    pub event_status: u16,
    /// Status returned by the register-user endpoint.
    pub user_status: u16,

    /// Number of check-limits requests received.
    pub check_limit_hits: usize,
    /// Developer secret seen in the last check-limits path.
    pub last_path_secret: Option<String>,
    /// `pat` header value from the most recent request.
    pub last_pat: Option<String>,
    /// `secret` header value from the most recent request.
    pub last_secret: Option<String>,
    /// Event payloads received, in order.
    pub events: Vec<Value>,
    /// User payloads received, in order.
    pub users: Vec<Value>,
}

impl Default for ServerState {
    fn default() -> Self {
        Self {
            limit_reached: false,
            check_status: 200,
            check_body_override: None,
            event_status: 200,
            user_status: 200,
            check_limit_hits: 0,
            last_path_secret: None,
            last_pat: None,
            last_secret: None,
            events: Vec::new(),
            users: Vec::new(),
        }
    }
}

pub type Db = Arc<RwLock<ServerState>>;

/// Fresh shared state with default behavior (limit not reached, all 200s).
pub fn state() -> Db {
    Arc::new(RwLock::new(ServerState::default()))
}

pub fn app(db: Db) -> Router {
    Router::new()
        .route("/api/v1/account/check-limits/{secret}", get(check_limits))
        .route("/api/v1/register/event", post(register_event))
        .route("/api/v1/register/user", post(register_user))
        .with_state(db)
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app(db)).await
}

/// Pull the credential headers out of a request, or `None` if either is
/// missing or not valid UTF-8.
fn credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let pat = headers.get("pat")?.to_str().ok()?.to_string();
    let secret = headers.get("secret")?.to_str().ok()?.to_string();
    Some((pat, secret))
}

async fn check_limits(
    State(db): State<Db>,
    Path(secret): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let Some((pat, header_secret)) = credentials(&headers) else {
        return (StatusCode::UNAUTHORIZED, String::new());
    };
    let mut state = db.write().await;
    state.check_limit_hits += 1;
    state.last_path_secret = Some(secret);
    state.last_pat = Some(pat);
    state.last_secret = Some(header_secret);

    let status =
        StatusCode::from_u16(state.check_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = match &state.check_body_override {
        Some(raw) => raw.clone(),
        None => json!({ "limitReached": state.limit_reached }).to_string(),
    };
    (status, body)
}

async fn register_event(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some((pat, secret)) = credentials(&headers) else {
        return (StatusCode::UNAUTHORIZED, Json(Value::Null));
    };
    let mut state = db.write().await;
    state.last_pat = Some(pat);
    state.last_secret = Some(secret);
    state.events.push(payload);

    let status =
        StatusCode::from_u16(state.event_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "message": "Event received" })))
}

async fn register_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some((pat, secret)) = credentials(&headers) else {
        return (StatusCode::UNAUTHORIZED, Json(Value::Null));
    };
    let mut state = db.write().await;
    state.last_pat = Some(pat);
    state.last_secret = Some(secret);
    state.users.push(payload);

    let status =
        StatusCode::from_u16(state.user_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "message": "User registered" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_allows_tracking() {
        let state = ServerState::default();
        assert!(!state.limit_reached);
        assert_eq!(state.check_status, 200);
        assert_eq!(state.event_status, 200);
        assert_eq!(state.check_limit_hits, 0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn check_limits_body_matches_wire_shape() {
        let body = json!({ "limitReached": true }).to_string();
        assert_eq!(body, r#"{"limitReached":true}"#);
    }

    #[test]
    fn credentials_require_both_headers() {
        let mut headers = HeaderMap::new();
        assert!(credentials(&headers).is_none());
        headers.insert("pat", "token".parse().unwrap());
        assert!(credentials(&headers).is_none());
        headers.insert("secret", "dev".parse().unwrap());
        let (pat, secret) = credentials(&headers).unwrap();
        assert_eq!(pat, "token");
        assert_eq!(secret, "dev");
    }
}
