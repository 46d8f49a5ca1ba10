// crates/mock-gate-core/src/core/ids.rs
// ============================================================================
// Module: Check Identifiers
// Description: Stable identifiers for checks registered by the adjudicator.
// Purpose: Give operators fixed names to reference in suppression lists.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Identifiers for the request-level checks the adjudicator registers itself.
//! Claim validators publish their own identifiers beside their rules.

/// Top-level check reflecting whether the final response was 2XX.
pub const RESPONSE_CODE: &str = "response-code";
/// Transport identity (client certificate) check.
pub const TRANSPORT_IDENTITY: &str = "transport-identity";
/// Request path encoding check.
pub const REQUEST_PATH: &str = "request-path";
/// Authorization header shape check.
pub const AUTHORIZATION_HEADER: &str = "authorization-header";
