// crates/mock-gate-server/src/lib.rs
// ============================================================================
// Module: Mock Gate Server Library
// Description: HTTP(S) front end for the Mock Gate adjudication pipeline.
// Purpose: Wire configuration, collaborators, and log sinks into an axum app.
// Dependencies: axum, axum-server, mock-gate-config, mock-gate-core, tokio
// ============================================================================

//! ## Overview
//! `mock-gate-server` serves mapped response files behind the Mock Gate
//! checks. It supplies the collaborators the core depends on: transport
//! context from trusted proxy headers, a directory-backed file resolver, MIME
//! resolution, and JSON-lines request log sinks.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod files;
pub mod guided;
pub mod mime;
pub mod proxy;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FanoutLogSink;
pub use audit::FileLogSink;
pub use audit::REQUEST_LOG_FILE;
pub use audit::StdoutLogSink;
pub use audit::build_log_sink;
pub use files::DirectoryFileResolver;
pub use guided::GuidedPlan;
pub use guided::GuidedPlanError;
pub use server::MockServer;
pub use server::ServerError;
