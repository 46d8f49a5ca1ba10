// crates/mock-gate-core/src/validators/bearer.rs
// ============================================================================
// Module: Bearer Header Validator
// Description: Checks the shape of the Authorization header.
// Purpose: Report a missing or malformed bearer header as its own failure.
// Dependencies: crate::core
// ============================================================================

//! Validator for the Authorization header envelope around the JWT.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Outcome;
use crate::core::RegistryError;
use crate::core::ValidationRegistry;
use crate::core::ids::AUTHORIZATION_HEADER;
use crate::validators::ClaimValidator;
use crate::validators::MAX_AUTH_HEADER_BYTES;
use crate::validators::RequestMaterial;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Checks that the request carries `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerHeaderValidator;

impl ClaimValidator for BearerHeaderValidator {
    fn name(&self) -> &'static str {
        "authorization"
    }

    fn validate(
        &self,
        registry: &mut ValidationRegistry,
        material: &RequestMaterial,
    ) -> Result<(), RegistryError> {
        registry.register(
            AUTHORIZATION_HEADER,
            "The Authorization header must carry a Bearer token",
        )?;
        let outcome = match material.authorization.as_deref() {
            None => Outcome::Fail("The Authorization header is missing".to_string()),
            Some(header) if header.len() > MAX_AUTH_HEADER_BYTES => Outcome::Fail(format!(
                "The Authorization header exceeds {MAX_AUTH_HEADER_BYTES} bytes"
            )),
            Some(_) => Outcome::fail_if(
                material.bearer_token().is_none(),
                "The Authorization header must use the Bearer scheme with a non-empty token",
            ),
        };
        registry.resolve(AUTHORIZATION_HEADER, outcome)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
