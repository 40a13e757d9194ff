//! Async API client core for the Evntaly tracking service.
//!
//! # Overview
//! `EvntalyClient` wraps the three Evntaly operations — quota check, event
//! tracking, user identification — behind a single long-lived HTTP transport
//! carrying the project token and developer secret as static headers.
//!
//! # Design
//! - Every operation issues exactly one HTTP request and maps the response
//!   to a boolean; there is no retry, batching, or queuing.
//! - Handled failures (non-success status, quota reached, tracking disabled)
//!   surface as `Ok(false)` plus a log line; `Err` is reserved for transport
//!   failures and a malformed quota response.
//! - The tracking toggle is an `AtomicBool` so calls may run concurrently
//!   without any further coordination.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod types;

pub use client::EvntalyClient;
pub use error::Error;
pub use types::{Event, EventUser, UserProfile};
