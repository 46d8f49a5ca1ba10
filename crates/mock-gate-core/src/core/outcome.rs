// crates/mock-gate-core/src/core/outcome.rs
// ============================================================================
// Module: Check Outcomes
// Description: Pass/fail outcome type for a single named check.
// Purpose: Replace failure-string overloading with an explicit sum type.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Every rule computes exactly one [`Outcome`]. A failure always carries a
//! human-readable reason that is surfaced verbatim to clients.

// ============================================================================
// SECTION: Types
// ============================================================================

/// Result of evaluating one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The check passed.
    Pass,
    /// The check failed with a reason.
    Fail(String),
}

impl Outcome {
    /// Builds an outcome from a failure state, where an absent or empty
    /// description means the check passed.
    #[must_use]
    pub fn from_failure_state(failure: Option<impl Into<String>>) -> Self {
        match failure.map(Into::into) {
            Some(reason) if !reason.is_empty() => Self::Fail(reason),
            _ => Self::Pass,
        }
    }

    /// Builds a failing outcome when `failed` is true, passing otherwise.
    #[must_use]
    pub fn fail_if(failed: bool, reason: &str) -> Self {
        if failed { Self::Fail(reason.to_string()) } else { Self::Pass }
    }

    /// Returns true when the outcome is a pass.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Splits the outcome into the stored `(success, details)` pair.
    #[must_use]
    pub fn into_parts(self) -> (bool, Option<String>) {
        match self {
            Self::Pass => (true, None),
            Self::Fail(reason) => (false, Some(reason)),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
