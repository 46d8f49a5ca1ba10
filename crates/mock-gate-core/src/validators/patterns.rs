// crates/mock-gate-core/src/validators/patterns.rs
// ============================================================================
// Module: Identifier Patterns
// Description: Format matchers for requesting system and organization claims.
// Purpose: Centralize the identifier grammars used by the JWT validator.
// Dependencies: regex
// ============================================================================

//! ## Overview
//! Requesting systems are identified by an accredited-system ASID (digits);
//! organizations by an ODS code (alphanumeric). Both are carried as a system
//! URI and a value joined by `|`. If a pattern failed to compile every value
//! is rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::LazyLock;

use regex::Regex;

// ============================================================================
// SECTION: Patterns
// ============================================================================

/// Grammar for `requesting_system`.
pub const REQUESTING_SYSTEM_PATTERN: &str =
    r"^https://fhir\.nhs\.uk/Id/accredited-system\|[0-9]+$";

/// Grammar for `requesting_organization`.
pub const REQUESTING_ORGANIZATION_PATTERN: &str =
    r"^https://fhir\.nhs\.uk/Id/ods-organization-code\|[A-Za-z0-9]+$";

/// Compiled `requesting_system` matcher.
static REQUESTING_SYSTEM: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(REQUESTING_SYSTEM_PATTERN).ok());

/// Compiled `requesting_organization` matcher.
static REQUESTING_ORGANIZATION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(REQUESTING_ORGANIZATION_PATTERN).ok());

// ============================================================================
// SECTION: Matchers
// ============================================================================

/// Returns true when `value` is `https://fhir.nhs.uk/Id/accredited-system|<ASID>`.
#[must_use]
pub fn is_requesting_system(value: &str) -> bool {
    REQUESTING_SYSTEM.as_ref().is_some_and(|pattern| pattern.is_match(value))
}

/// Returns true when `value` is `https://fhir.nhs.uk/Id/ods-organization-code|<ODSCode>`.
#[must_use]
pub fn is_requesting_organization(value: &str) -> bool {
    REQUESTING_ORGANIZATION.as_ref().is_some_and(|pattern| pattern.is_match(value))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
