// crates/mock-gate-config/src/lib.rs
// ============================================================================
// Module: Mock Gate Config Library
// Description: Configuration model, validation, and endpoint mapping table.
// Purpose: Single source of truth for mock-gate.toml semantics.
// Dependencies: mock-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `mock-gate-config` defines the `mock-gate.toml` model and the
//! endpoint-to-file mapping table. Both are loaded fail-closed: size limits,
//! UTF-8, and semantic validation run before anything is handed to the
//! server.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod mapping;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use mapping::EndpointMapping;
pub use mapping::MappingEntry;
pub use mapping::MappingError;
