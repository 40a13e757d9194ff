//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Every operation on the C surface answers with a heap-allocated
//! `FfiEvntalyResult` envelope: an outcome code plus an optional message.
//! `Ok`/`Refused` mirror the core client's `Ok(true)`/`Ok(false)`; the
//! remaining codes cover the error channel and FFI-specific failures.
//! Conversion constructors live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use evntaly_core::Error;

/// Opaque handle to an `EvntalyClient`. C callers receive a pointer to this
/// and pass it back into every FFI function. The embedded single-thread
/// runtime makes the C surface blocking.
pub struct FfiEvntalyClient {
    pub(crate) inner: evntaly_core::EvntalyClient,
    pub(crate) runtime: tokio::runtime::Runtime,
}

/// Outcome codes returned in `FfiEvntalyResult`.
#[repr(C)]
pub enum FfiOutcome {
    /// The operation reported success (`true` from the core client).
    Ok = 0,
    /// The operation completed but reported `false`: tracking disabled,
    /// quota reached, or the server rejected the request.
    Refused = 1,
    /// The request could not be executed at the transport level.
    TransportError = 2,
    /// The check-limits response body was not the expected shape.
    InvalidResponse = 3,
    /// The caller-supplied JSON payload could not be parsed.
    InvalidJson = 4,
    /// A credential was rejected at construction.
    Config = 5,
    NullArg = 6,
    Panic = 7,
}

/// Result envelope for all FFI operations.
///
/// On `Ok`/`Refused` the message is null; on any other outcome it carries a
/// human-readable C string. The caller frees the envelope (and the message
/// with it) via `evntaly_free_result`.
#[repr(C)]
pub struct FfiEvntalyResult {
    pub outcome: FfiOutcome,
    pub error_message: *mut c_char,
}

impl FfiEvntalyResult {
    fn boxed(outcome: FfiOutcome, message: Option<String>) -> *mut Self {
        let error_message = match message {
            Some(msg) => CString::new(msg).unwrap_or_default().into_raw(),
            None => std::ptr::null_mut(),
        };
        Box::into_raw(Box::new(FfiEvntalyResult {
            outcome,
            error_message,
        }))
    }

    pub(crate) fn ok() -> *mut Self {
        Self::boxed(FfiOutcome::Ok, None)
    }

    pub(crate) fn refused() -> *mut Self {
        Self::boxed(FfiOutcome::Refused, None)
    }

    pub(crate) fn from_error(err: Error) -> *mut Self {
        let outcome = match &err {
            Error::MissingCredential(_) | Error::InvalidCredential(_) => FfiOutcome::Config,
            Error::Transport(_) => FfiOutcome::TransportError,
            Error::InvalidResponse(_) => FfiOutcome::InvalidResponse,
        };
        Self::boxed(outcome, Some(err.to_string()))
    }

    pub(crate) fn invalid_json(err: serde_json::Error) -> *mut Self {
        Self::boxed(FfiOutcome::InvalidJson, Some(err.to_string()))
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(FfiOutcome::NullArg, Some(format!("null argument: {name}")))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiOutcome::Panic, Some(msg.to_string()))
    }
}
