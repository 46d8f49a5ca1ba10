// crates/mock-gate-core/src/validators/mod.rs
// ============================================================================
// Module: Claim Validators
// Description: Validators that register and resolve checks for one concern.
// Purpose: Define the validator seam and the request material they inspect.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! A [`ClaimValidator`] registers every check it owns up front and then
//! resolves each one independently, so a client receives every violation in
//! a single round trip. Validators run sequentially in the order the
//! adjudicator holds them.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod bearer;
pub mod jwt;
pub mod patterns;

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::RegistryError;
use crate::core::ValidationRegistry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use bearer::BearerHeaderValidator;
pub use jwt::JwtParseError;
pub use jwt::JwtValidator;
pub use jwt::JwtVerification;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted Authorization header length in bytes.
pub const MAX_AUTH_HEADER_BYTES: usize = 8 * 1024;

// ============================================================================
// SECTION: Request Material
// ============================================================================

/// Request data that claim validators are allowed to inspect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMaterial {
    /// Raw Authorization header value.
    pub authorization: Option<String>,
}

impl RequestMaterial {
    /// Builds material from an optional Authorization header.
    #[must_use]
    pub const fn new(authorization: Option<String>) -> Self {
        Self {
            authorization,
        }
    }

    /// Returns the bearer token when the header uses the Bearer scheme and
    /// carries a non-empty token within the size limit.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        let header = self.authorization.as_deref()?;
        if header.len() > MAX_AUTH_HEADER_BYTES {
            return None;
        }
        let (scheme, token) = header.trim().split_once(' ')?;
        let token = token.trim();
        if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
            return None;
        }
        Some(token)
    }
}

// ============================================================================
// SECTION: Validator Trait
// ============================================================================

/// Populates a registry with the outcomes of one concern's checks.
pub trait ClaimValidator: Send + Sync {
    /// Short label used in diagnostics.
    fn name(&self) -> &'static str;

    /// Registers this validator's checks and resolves them.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] only on wiring defects (duplicate or unknown
    /// check identifiers); client-input problems are recorded as failures.
    fn validate(
        &self,
        registry: &mut ValidationRegistry,
        material: &RequestMaterial,
    ) -> Result<(), RegistryError>;
}

// ============================================================================
// SECTION: Tests
// ============================================================================
