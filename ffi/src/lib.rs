//! C-ABI wrapper around `evntaly-core`.
//!
//! # Overview
//! Exposes the Evntaly client through `extern "C"` functions so any language
//! with a C FFI can check the quota, track events, and identify users.
//! Payloads cross the boundary as JSON strings in the server's wire format.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - The client handle owns a single-thread tokio runtime; each call blocks
//!   on the corresponding async core operation.
//! - A single `FfiEvntalyResult` envelope with an outcome code conveys both
//!   the boolean contract (`Ok`/`Refused`) and errors uniformly.
//! - The C caller owns returned pointers and must release them with the
//!   matching `evntaly_*_free` function.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use evntaly_core::{Event, EvntalyClient, UserProfile};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

fn build_client(
    developer_secret: *const c_char,
    project_token: *const c_char,
    base_url: Option<*const c_char>,
) -> *mut FfiEvntalyClient {
    if developer_secret.is_null() || project_token.is_null() {
        return std::ptr::null_mut();
    }
    let secret = unsafe { CStr::from_ptr(developer_secret) }
        .to_str()
        .unwrap_or("");
    let token = unsafe { CStr::from_ptr(project_token) }
        .to_str()
        .unwrap_or("");

    let inner = match base_url {
        None => EvntalyClient::new(secret, token),
        Some(url) => {
            if url.is_null() {
                return std::ptr::null_mut();
            }
            let url = unsafe { CStr::from_ptr(url) }.to_str().unwrap_or("");
            EvntalyClient::with_base_url(secret, token, url)
        }
    };
    let inner = match inner {
        Ok(client) => client,
        Err(_) => return std::ptr::null_mut(),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(_) => return std::ptr::null_mut(),
    };

    Box::into_raw(Box::new(FfiEvntalyClient { inner, runtime }))
}

/// Create a client for the production endpoint.
///
/// Returns null if either credential is null, empty, or not a valid header
/// value. The caller must free the returned pointer with
/// `evntaly_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn evntaly_client_new(
    developer_secret: *const c_char,
    project_token: *const c_char,
) -> *mut FfiEvntalyClient {
    catch_unwind(|| build_client(developer_secret, project_token, None))
        .unwrap_or(std::ptr::null_mut())
}

/// Create a client against a non-production endpoint (tests, self-hosted).
#[unsafe(no_mangle)]
pub extern "C" fn evntaly_client_with_base_url(
    developer_secret: *const c_char,
    project_token: *const c_char,
    base_url: *const c_char,
) -> *mut FfiEvntalyClient {
    catch_unwind(|| build_client(developer_secret, project_token, Some(base_url)))
        .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `evntaly_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn evntaly_client_free(client: *mut FfiEvntalyClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

fn envelope(result: Result<bool, evntaly_core::Error>) -> *mut FfiEvntalyResult {
    match result {
        Ok(true) => FfiEvntalyResult::ok(),
        Ok(false) => FfiEvntalyResult::refused(),
        Err(err) => FfiEvntalyResult::from_error(err),
    }
}

/// Ask the server whether this account can still send events.
///
/// `Ok` means quota available, `Refused` means the limit is reached or the
/// check failed with a non-success status.
#[unsafe(no_mangle)]
pub extern "C" fn evntaly_check_limit(client: *const FfiEvntalyClient) -> *mut FfiEvntalyResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiEvntalyResult::null_arg("client");
        }
        let client = unsafe { &*client };
        envelope(client.runtime.block_on(client.inner.check_limit()))
    }))
    .unwrap_or_else(|_| FfiEvntalyResult::panic("panic in evntaly_check_limit"))
}

/// Track one event, supplied as a JSON string in the server's wire format
/// (`title`, `sessionID`, `apply_rule_only`, ...). Missing fields default.
///
/// `Ok` means the event was accepted; `Refused` means tracking is disabled,
/// the quota is reached, or the server rejected the event.
#[unsafe(no_mangle)]
pub extern "C" fn evntaly_track_event(
    client: *const FfiEvntalyClient,
    event_json: *const c_char,
) -> *mut FfiEvntalyResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiEvntalyResult::null_arg("client");
        }
        if event_json.is_null() {
            return FfiEvntalyResult::null_arg("event_json");
        }
        let client = unsafe { &*client };
        let raw = unsafe { CStr::from_ptr(event_json) }.to_str().unwrap_or("");
        let event: Event = match serde_json::from_str(raw) {
            Ok(event) => event,
            Err(err) => return FfiEvntalyResult::invalid_json(err),
        };
        envelope(client.runtime.block_on(client.inner.track_event(&event)))
    }))
    .unwrap_or_else(|_| FfiEvntalyResult::panic("panic in evntaly_track_event"))
}

/// Register or update a user profile, supplied as a JSON string in the
/// server's wire format (`id`, `email`, `full_name`, `organization`, `data`).
#[unsafe(no_mangle)]
pub extern "C" fn evntaly_identify_user(
    client: *const FfiEvntalyClient,
    user_json: *const c_char,
) -> *mut FfiEvntalyResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiEvntalyResult::null_arg("client");
        }
        if user_json.is_null() {
            return FfiEvntalyResult::null_arg("user_json");
        }
        let client = unsafe { &*client };
        let raw = unsafe { CStr::from_ptr(user_json) }.to_str().unwrap_or("");
        let profile: UserProfile = match serde_json::from_str(raw) {
            Ok(profile) => profile,
            Err(err) => return FfiEvntalyResult::invalid_json(err),
        };
        envelope(
            client
                .runtime
                .block_on(client.inner.identify_user(&profile)),
        )
    }))
    .unwrap_or_else(|_| FfiEvntalyResult::panic("panic in evntaly_identify_user"))
}

// ---------------------------------------------------------------------------
// Tracking toggle
// ---------------------------------------------------------------------------

/// Stop `evntaly_track_event` from sending. Safe to call with null (no-op).
#[unsafe(no_mangle)]
pub extern "C" fn evntaly_disable_tracking(client: *const FfiEvntalyClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            unsafe { &*client }.inner.disable_tracking();
        }));
    }
}

/// Allow `evntaly_track_event` to send again. Safe to call with null (no-op).
#[unsafe(no_mangle)]
pub extern "C" fn evntaly_enable_tracking(client: *const FfiEvntalyClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            unsafe { &*client }.inner.enable_tracking();
        }));
    }
}

/// Current state of the tracking toggle. Returns false for a null client.
#[unsafe(no_mangle)]
pub extern "C" fn evntaly_tracking_enabled(client: *const FfiEvntalyClient) -> bool {
    if client.is_null() {
        return false;
    }
    catch_unwind(AssertUnwindSafe(|| unsafe { &*client }.inner.tracking_enabled()))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a result returned by any operation. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn evntaly_free_result(result: *mut FfiEvntalyResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { std::ffi::CString::from_raw(result.error_message) });
        }
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
