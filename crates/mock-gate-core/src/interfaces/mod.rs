// crates/mock-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Mock Gate Interfaces
// Description: Collaborator contracts for file lookup, responses, and logging.
// Purpose: Keep the adjudication pipeline free of transport and disk I/O.
// Dependencies: crate::runtime, serde_json
// ============================================================================

//! ## Overview
//! The adjudicator depends on three collaborators: a [`FileResolver`] that
//! maps endpoints onto response files, a [`Responder`] that sends exactly one
//! response, and a [`LogSink`] that receives one structured entry per
//! completed request. Implementations live in the server crate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use serde_json::Value;

use crate::runtime::RequestLogEntry;

// ============================================================================
// SECTION: File Resolution
// ============================================================================

/// Response file located for an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// File name as listed in the endpoint mapping.
    pub file_name: String,
    /// Absolute or root-relative path to the file.
    pub path: PathBuf,
}

/// Maps endpoints onto response files.
pub trait FileResolver: Send + Sync {
    /// Returns the mapped file name for an endpoint key, if any.
    fn file_for_endpoint(&self, endpoint: &str) -> Option<String>;

    /// Returns the file for a mapped file name when it exists on disk.
    fn resolve_file(&self, file_name: &str) -> Option<ResolvedFile>;
}

// ============================================================================
// SECTION: Responder
// ============================================================================

/// Single-shot response writer.
///
/// # Invariants
/// - After the first send, [`Responder::headers_sent`] returns true and
///   further sends are ignored by the adjudicator.
pub trait Responder {
    /// Returns true once a response has been committed.
    fn headers_sent(&self) -> bool;

    /// Sends a JSON body with the given status.
    fn send_json(&mut self, status: u16, body: Value);

    /// Sends a file with a success status.
    fn send_file(&mut self, file: &ResolvedFile);
}

// ============================================================================
// SECTION: Log Sink
// ============================================================================

/// Receives one entry per completed request.
pub trait LogSink: Send + Sync {
    /// Records a completed request.
    fn record(&self, entry: &RequestLogEntry);
}

/// Sink that discards entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    fn record(&self, _entry: &RequestLogEntry) {}
}
