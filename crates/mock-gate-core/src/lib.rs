// crates/mock-gate-core/src/lib.rs
// ============================================================================
// Module: Mock Gate Core Library
// Description: Public API surface for the Mock Gate validation engine.
// Purpose: Expose check registries, claim validators, and the adjudicator.
// Dependencies: crate::{core, interfaces, runtime, validators}
// ============================================================================

//! ## Overview
//! Mock Gate core runs every incoming mock-server request through an ordered,
//! named set of independent checks (transport identity, path encoding, bearer
//! token claims), records each outcome without short-circuiting the others,
//! and derives a verdict plus a structured diagnostic payload. Collaborators
//! (listener, file lookup, log output) plug in through [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;
pub mod validators;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::FileResolver;
pub use interfaces::LogSink;
pub use interfaces::NoopLogSink;
pub use interfaces::ResolvedFile;
pub use interfaces::Responder;
pub use runtime::Adjudication;
pub use runtime::AdjudicationError;
pub use runtime::Adjudicator;
pub use runtime::AdjudicatorConfig;
pub use runtime::IncomingRequest;
pub use runtime::RequestLogEntry;
pub use runtime::Verdict;
pub use validators::BearerHeaderValidator;
pub use validators::ClaimValidator;
pub use validators::JwtValidator;
pub use validators::JwtVerification;
pub use validators::RequestMaterial;

/// Returns the identifiers of every check the built-in pipeline can register.
#[must_use]
pub fn builtin_validation_ids() -> Vec<&'static str> {
    let mut ids = vec![
        crate::core::ids::RESPONSE_CODE,
        crate::core::ids::TRANSPORT_IDENTITY,
        crate::core::ids::REQUEST_PATH,
        crate::core::ids::AUTHORIZATION_HEADER,
    ];
    ids.extend(validators::jwt::JWT_VALIDATION_IDS);
    ids
}
