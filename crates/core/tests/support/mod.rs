//! Shared test helpers for `freeagent-core` integration tests.
//!
//! Provides an in-memory `AuthenticatedClient` that serves canned GET bodies
//! and records every call, so service tests can focus on behaviour.

pub mod client;

pub use client::{Call, RecordingClient};

use freeagent_common::wire::WireRecord;
use serde_json::Value;

/// Turn a `json!` object literal into a wire record
pub fn record(value: Value) -> WireRecord {
    match value {
        Value::Object(map) => map,
        other => panic!("expected JSON object, got {other}"),
    }
}
