// crates/mock-gate-core/src/core/path.rs
// ============================================================================
// Module: Endpoint Path Rules
// Description: Request-target normalization for local and integration modes.
// Purpose: Turn a raw request target into the endpoint key used for lookups.
// Dependencies: serde, thiserror, url, urlencoding
// ============================================================================

//! ## Overview
//! In `local` mode the whole provider URL is carried percent-encoded in a
//! single path segment, so an unescaped `/` is a client error. The segment is
//! decoded and must parse as an absolute URL. In `integration` mode the path
//! is used as-is.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Types
// ============================================================================

/// How request targets map onto endpoint keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointMode {
    /// The provider URL is percent-encoded into one path segment.
    #[default]
    Local,
    /// The request path is the endpoint key.
    Integration,
}

/// Path rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathRuleError {
    /// Local-mode target contains an unescaped forward slash.
    #[error("Provider URL must be percent-encoded (cannot contain unescaped forward-slashes)")]
    UnescapedSlash,
    /// Target has malformed percent escapes or decodes to invalid UTF-8.
    #[error("{0} cannot be percent-decoded")]
    Undecodable(String),
    /// Decoded target is not an absolute URL.
    #[error("{0} is not a valid URL")]
    InvalidUrl(String),
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Normalizes a raw request target (without its leading `/`) into an
/// endpoint key.
///
/// # Errors
///
/// Returns [`PathRuleError`] when the target violates the rules for `mode`.
pub fn normalize_endpoint(raw: &str, mode: EndpointMode) -> Result<String, PathRuleError> {
    match mode {
        EndpointMode::Integration => Ok(format!("/{raw}")),
        EndpointMode::Local => {
            if raw.contains('/') {
                return Err(PathRuleError::UnescapedSlash);
            }
            if !has_well_formed_escapes(raw) {
                return Err(PathRuleError::Undecodable(raw.to_string()));
            }
            let decoded = urlencoding::decode(raw)
                .map_err(|_| PathRuleError::Undecodable(raw.to_string()))?
                .into_owned();
            if Url::parse(&decoded).is_err() {
                return Err(PathRuleError::InvalidUrl(decoded));
            }
            Ok(decoded)
        }
    }
}

/// Returns true when every `%` is followed by two hex digits.
fn has_well_formed_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            let valid = bytes
                .get(index + 1 .. index + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return false;
            }
            index += 3;
        } else {
            index += 1;
        }
    }
    true
}

// ============================================================================
// SECTION: Tests
// ============================================================================
