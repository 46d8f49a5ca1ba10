// crates/mock-gate-core/src/core/mod.rs
// ============================================================================
// Module: Mock Gate Core Types
// Description: Check records, registries, outcomes, and request-level rules.
// Purpose: Provide the per-request validation model shared by all validators.
// Dependencies: serde, thiserror, url, urlencoding
// ============================================================================

//! ## Overview
//! Core types model one request's validation state: a [`ValidationRegistry`]
//! owns ordered [`ValidationRecord`]s, applies the operator suppression
//! policy, and projects serializable [`ValidationSummary`] values for logs
//! and failure payloads. Request-level rules (transport identity, path
//! encoding) live beside the registry because the adjudicator runs them
//! inline.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod ids;
pub mod outcome;
pub mod path;
pub mod record;
pub mod registry;
pub mod status;
pub mod time;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use outcome::Outcome;
pub use path::EndpointMode;
pub use path::PathRuleError;
pub use path::normalize_endpoint;
pub use record::ValidationRecord;
pub use record::ValidationSummary;
pub use registry::RegistryError;
pub use registry::SuppressionPolicy;
pub use registry::ValidationRegistry;
pub use time::Clock;
pub use time::FixedClock;
pub use time::SystemClock;
pub use transport::CertificateInfo;
pub use transport::TransportContext;
pub use transport::TransportRejection;
pub use transport::check_transport_identity;
