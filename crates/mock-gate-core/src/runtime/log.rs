// crates/mock-gate-core/src/runtime/log.rs
// ============================================================================
// Module: Request Log Entry
// Description: Structured record emitted once per completed request.
// Purpose: Capture request metadata, final status, and every check outcome.
// Dependencies: serde
// ============================================================================

//! Structured request log entries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

use crate::core::ValidationSummary;
use crate::runtime::adjudicator::IncomingRequest;

// ============================================================================
// SECTION: Entry
// ============================================================================

/// One completed request, as written to the request log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestLogEntry {
    /// Event name.
    pub event: String,
    /// Completion time in Unix milliseconds.
    pub timestamp_ms: u64,
    /// HTTP method.
    pub method: String,
    /// Raw request target.
    pub path: String,
    /// Peer address, when known.
    pub peer_ip: Option<String>,
    /// Final response status.
    pub status: u16,
    /// Response body, truncated.
    pub response_body: Option<String>,
    /// Summaries of every registered check.
    pub validations: Vec<ValidationSummary>,
}

impl RequestLogEntry {
    /// Builds an entry stamped with the current time.
    #[must_use]
    pub fn new(
        request: &IncomingRequest,
        status: u16,
        body: Option<&str>,
        body_max_length: usize,
        validations: Vec<ValidationSummary>,
    ) -> Self {
        Self {
            event: "request_completed".to_string(),
            timestamp_ms: unix_millis(),
            method: request.method.clone(),
            path: request.raw_target.clone(),
            peer_ip: request.peer_ip.clone(),
            status,
            response_body: body.map(|body| truncate_chars(body, body_max_length)),
            validations,
        }
    }
}

/// Returns the first `max` characters of `text`.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((index, _)) => text[.. index].to_string(),
        None => text.to_string(),
    }
}

/// Current Unix time in milliseconds.
fn unix_millis() -> u64 {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
