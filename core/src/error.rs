//! Error types for the Evntaly client.
//!
//! # Design
//! Only conditions the client does not recover from become errors: a bad
//! credential at construction, a request that never produced an HTTP
//! response, and a quota response whose body is not the expected shape.
//! Every condition with a defined fallback (non-success status, quota
//! reached, tracking disabled) is reported as `Ok(false)` by the client
//! instead.

use thiserror::Error;

/// Errors returned by [`EvntalyClient`](crate::EvntalyClient).
#[derive(Debug, Error)]
pub enum Error {
    /// A required credential was empty at construction.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    /// A credential cannot be carried as an HTTP header value.
    #[error("credential is not a valid header value")]
    InvalidCredential(#[from] reqwest::header::InvalidHeaderValue),

    /// The request could not be executed or its body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The check-limits response body could not be deserialized.
    #[error("unexpected check-limits response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}
