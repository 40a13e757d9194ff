//! The Evntaly tracking client.
//!
//! # Design
//! `EvntalyClient` holds the two credentials, one reusable `reqwest::Client`
//! configured with them as default headers, and the tracking toggle. Each
//! operation issues a single request and maps the response to a boolean:
//! `false` covers every handled failure (non-success status, quota reached,
//! tracking disabled), so callers that need the distinction must read the
//! log output.

use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::types::{CheckLimits, Event, UserProfile};

/// Production endpoint. All API paths hang off this root.
const BASE_URL: &str = "https://evntaly.com/prod";

/// Async client for the Evntaly tracking API.
///
/// Construct once and reuse; the underlying HTTP transport is long-lived and
/// shared across all calls. Operations take `&self` and may be issued
/// concurrently — the only shared state is the tracking flag.
#[derive(Debug)]
pub struct EvntalyClient {
    developer_secret: String,
    base_url: String,
    http: reqwest::Client,
    tracking_enabled: AtomicBool,
}

impl EvntalyClient {
    /// Create a client for the production endpoint.
    ///
    /// Fails if either credential is empty or cannot be carried as an HTTP
    /// header value. Tracking starts enabled.
    pub fn new(
        developer_secret: impl Into<String>,
        project_token: impl Into<String>,
    ) -> Result<Self, Error> {
        Self::with_base_url(developer_secret, project_token, BASE_URL)
    }

    /// Create a client against a non-production endpoint. Used by the
    /// integration tests and self-hosted deployments.
    #[doc(hidden)]
    pub fn with_base_url(
        developer_secret: impl Into<String>,
        project_token: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, Error> {
        let developer_secret = developer_secret.into();
        let project_token = project_token.into();
        if developer_secret.is_empty() {
            return Err(Error::MissingCredential("developer secret"));
        }
        if project_token.is_empty() {
            return Err(Error::MissingCredential("project token"));
        }

        let mut headers = HeaderMap::new();
        headers.insert("pat", HeaderValue::from_str(&project_token)?);
        headers.insert("secret", HeaderValue::from_str(&developer_secret)?);
        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            developer_secret,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            tracking_enabled: AtomicBool::new(true),
        })
    }

    /// Ask the server whether this account can still send events.
    ///
    /// Returns `Ok(true)` iff the server reports `limitReached: false`.
    /// A non-success status is treated as "do not proceed" and yields
    /// `Ok(false)` without inspecting the body; a success status with a body
    /// that does not contain a boolean `limitReached` is an error.
    pub async fn check_limit(&self) -> Result<bool, Error> {
        let response = self.http.get(self.check_limits_url()).send().await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "check-limits request failed");
            return Ok(false);
        }
        let body = response.text().await?;
        let limits: CheckLimits = serde_json::from_str(&body)?;
        Ok(!limits.limit_reached)
    }

    /// Send one event to the register-event endpoint.
    ///
    /// Short-circuits to `Ok(false)` when tracking is disabled (no request)
    /// or when [`check_limit`](Self::check_limit) reports the quota as
    /// reached. The limit check and the event POST are two independent
    /// requests; concurrent calls may each pass the check before either
    /// submission lands.
    pub async fn track_event(&self, event: &Event) -> Result<bool, Error> {
        if !self.tracking_enabled.load(Ordering::Relaxed) {
            info!("tracking is disabled, event not sent");
            return Ok(false);
        }
        if !self.check_limit().await? {
            warn!("tracking limit reached, event not sent");
            return Ok(false);
        }

        let url = format!("{}/api/v1/register/event", self.base_url);
        let response = self.http.post(&url).json(event).send().await?;
        if response.status().is_success() {
            debug!(title = %event.title, "event tracked");
            Ok(true)
        } else {
            warn!(status = %response.status(), "event registration failed");
            Ok(false)
        }
    }

    /// Register or update a user profile.
    ///
    /// Runs unconditionally: neither the tracking toggle nor the quota check
    /// gates identification.
    pub async fn identify_user(&self, profile: &UserProfile) -> Result<bool, Error> {
        let url = format!("{}/api/v1/register/user", self.base_url);
        let response = self.http.post(&url).json(profile).send().await?;
        if response.status().is_success() {
            debug!(id = %profile.id, "user identified");
            Ok(true)
        } else {
            warn!(status = %response.status(), "user identification failed");
            Ok(false)
        }
    }

    /// Stop `track_event` from sending anything until re-enabled.
    pub fn disable_tracking(&self) {
        self.tracking_enabled.store(false, Ordering::Relaxed);
        info!("tracking disabled");
    }

    /// Allow `track_event` to send again.
    pub fn enable_tracking(&self) {
        self.tracking_enabled.store(true, Ordering::Relaxed);
        info!("tracking enabled");
    }

    /// Current state of the tracking toggle.
    pub fn tracking_enabled(&self) -> bool {
        self.tracking_enabled.load(Ordering::Relaxed)
    }

    /// The quota endpoint keys on the developer secret in the path, not just
    /// the headers.
    fn check_limits_url(&self) -> String {
        format!(
            "{}/api/v1/account/check-limits/{}",
            self.base_url, self.developer_secret
        )
    }
}
