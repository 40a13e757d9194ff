//! Wire DTOs for the Evntaly API.
//!
//! # Design
//! Field names follow the server's JSON schema exactly, which mixes
//! conventions: `apply_rule_only` and `full_name` are snake_case, `sessionID`
//! keeps its capitalization, everything else is lowercase. The renames below
//! are the contract; nothing else in the crate may restate these names.
//! Deserialization is lenient (`serde(default)`) because the server never
//! requires a field to be present, and the `data` payload is an arbitrary
//! JSON value rather than a typed struct.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single trackable occurrence, serialized once and discarded after the
/// send attempt. No field is required to be non-empty; validation is the
/// server's responsibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub title: String,
    pub description: String,
    pub message: String,
    pub data: Value,
    pub tags: Vec<String>,
    pub notify: bool,
    pub icon: String,
    pub apply_rule_only: bool,
    pub user: EventUser,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(rename = "sessionID")]
    pub session_id: String,
    pub feature: String,
    pub topic: String,
}

/// The user an event is attributed to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventUser {
    pub id: String,
}

/// An identifiable user, sent to the register-user endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub organization: String,
    pub data: Value,
}

/// Wire shape of the check-limits response. The client reads `limitReached`
/// and ignores everything else in the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckLimits {
    #[serde(rename = "limitReached")]
    pub limit_reached: bool,
}
